use std::fmt;

use crate::concat::ConcatStats;
use crate::output::pretty::render_table;
use crate::types::{Row, Schema, Value};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MergeStats {
    /// Sources merged
    pub sources: usize,

    /// Rows in the merged table
    pub rows_out: u64,

    /// Null cells inserted for absent columns
    pub nulls_filled: u64,

    /// Values converted to a wider column type
    pub values_coerced: u64,

    /// Unconvertible values replaced by Null (lenient mode only)
    pub coercion_failures_nulled: u64,
}

impl From<&ConcatStats> for MergeStats {
    fn from(s: &ConcatStats) -> Self {
        Self {
            sources: s.sources_done,
            rows_out: s.rows_out,
            nulls_filled: s.nulls_filled,
            values_coerced: s.values_coerced,
            coercion_failures_nulled: s.coercion_failures_nulled,
        }
    }
}

/// A fully materialized merge result.
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedTable {
    schema: Schema,
    rows: Vec<Row>,
    stats: MergeStats,
}

impl UnifiedTable {
    pub fn new(schema: Schema, rows: Vec<Row>, stats: MergeStats) -> Self {
        Self {
            schema,
            rows,
            stats,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn columns(&self) -> Vec<&str> {
        self.schema.names()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First `n` rows (fewer if the table is shorter).
    pub fn head(&self, n: usize) -> &[Row] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Every value of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.schema.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[idx]).collect())
    }

    pub fn stats(&self) -> &MergeStats {
        &self.stats
    }
}

impl fmt::Display for UnifiedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", render_table(&self.schema, &self.rows))
    }
}
