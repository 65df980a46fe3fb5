//! Persisting merged rows as CSV.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::Writer;

use crate::api::errors::MergeResult;
use crate::api::table::UnifiedTable;
use crate::concat::Concatenator;
use crate::debugger::Component;
use crate::output::errors::{OutputError, OutputResult};
use crate::types::{Row, Schema};
use crate::{db_info, db_phase};

struct CsvSink<W: Write> {
    target: String,
    writer: Writer<W>,
    rows: u64,
}

impl<W: Write> CsvSink<W> {
    fn new(target: impl Into<String>, out: W, schema: &Schema) -> OutputResult<Self> {
        let mut sink = Self {
            target: target.into(),
            writer: Writer::from_writer(out),
            rows: 0,
        };
        sink.writer
            .write_record(schema.names())
            .map_err(|e| sink.csv_error(e))?;
        Ok(sink)
    }

    fn csv_error(&self, err: csv::Error) -> OutputError {
        OutputError::Csv {
            target: self.target.clone(),
            message: err.to_string(),
        }
    }

    fn write(&mut self, row: &Row) -> OutputResult<()> {
        let fields: Vec<String> = row.iter().map(|v| v.to_field()).collect();
        if let Err(e) = self.writer.write_record(&fields) {
            return Err(self.csv_error(e));
        }
        self.rows += 1;
        Ok(())
    }

    fn finish(mut self) -> OutputResult<u64> {
        self.writer.flush().map_err(|e| OutputError::Io {
            target: self.target.clone(),
            message: e.to_string(),
        })?;
        Ok(self.rows)
    }
}

/// Writes a header plus `rows`; nulls become empty fields.
pub fn write_csv<'r, W, I>(schema: &Schema, rows: I, out: W) -> OutputResult<u64>
where
    W: Write,
    I: IntoIterator<Item = &'r Row>,
{
    let mut sink = CsvSink::new("<writer>", out, schema)?;
    for row in rows {
        sink.write(row)?;
    }
    sink.finish()
}

pub fn write_table_file(table: &UnifiedTable, path: impl AsRef<Path>) -> OutputResult<u64> {
    let path = path.as_ref();
    let target = path.display().to_string();
    let file = File::create(path).map_err(|e| OutputError::Io {
        target: target.clone(),
        message: e.to_string(),
    })?;

    let mut sink = CsvSink::new(target, file, table.schema())?;
    for row in table.rows() {
        sink.write(row)?;
    }
    let n = sink.finish()?;
    db_info!(Component::Output, "wrote {} row(s) to {}", n, path.display());
    Ok(n)
}

/// Writes rows as they are produced, without holding the merged table in memory.
///
/// A merge failure stops the write; rows already written stay in `out`.
pub fn write_stream<W: Write>(mut rows: Concatenator, out: W) -> MergeResult<u64> {
    let mut sink = CsvSink::new("<stream>", out, rows.schema())?;

    let written: MergeResult<()> = db_phase!("concat", {
        rows.try_for_each(|row| -> MergeResult<()> {
            sink.write(&row?)?;
            Ok(())
        })
    });
    written?;

    Ok(sink.finish()?)
}

/// [`write_stream`] into a file.
///
/// Rows go to a `.partial` sibling that replaces `path` only once the merge
/// has succeeded, so a failed merge leaves no output behind.
pub fn write_stream_file(rows: Concatenator, path: impl AsRef<Path>) -> MergeResult<u64> {
    let path = path.as_ref();
    let partial = partial_path(path);
    let io_error = |target: &Path, e: std::io::Error| OutputError::Io {
        target: target.display().to_string(),
        message: e.to_string(),
    };

    let file = File::create(&partial).map_err(|e| io_error(partial.as_path(), e))?;

    let n = match write_stream(rows, file) {
        Ok(n) => n,
        Err(err) => {
            let _ = fs::remove_file(&partial);
            return Err(err);
        }
    };

    if let Err(e) = fs::rename(&partial, path) {
        let _ = fs::remove_file(&partial);
        return Err(io_error(path, e).into());
    }

    db_info!(Component::Output, "streamed {} row(s) to {}", n, path.display());
    Ok(n)
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}
