//! Fixed-width text rendering of a unified table.

use crate::types::{Row, Schema};

/// Renders a header line, a type line, a rule and one line per row.
pub fn render_table(schema: &Schema, rows: &[Row]) -> String {
    let header: Vec<String> = schema.columns.iter().map(|c| c.name.clone()).collect();
    let types: Vec<String> = schema.columns.iter().map(|c| c.ty.to_string()).collect();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|r| r.iter().map(|v| v.to_string()).collect())
        .collect();

    let mut widths: Vec<usize> = header
        .iter()
        .zip(&types)
        .map(|(h, t)| h.chars().count().max(t.chars().count()))
        .collect();
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &header, &widths);
    push_line(&mut out, &types, &widths);

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');

    for row in &cells {
        push_line(&mut out, row, &widths);
    }

    out.push_str(&format!(
        "({} row{})\n",
        rows.len(),
        if rows.len() == 1 { "" } else { "s" }
    ));
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(c, w)| format!("{c:<w$}", w = *w))
        .collect();
    out.push_str(padded.join(" | ").trim_end());
    out.push('\n');
}
