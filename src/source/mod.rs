//! Row sources: anything that can hand out a schema and then a finite
//! sequence of rows aligned to it.

pub mod csv_file;
pub mod discover;
pub mod errors;
pub mod in_memory;

mod unit_tests;

pub use csv_file::CsvSource;
pub use discover::discover_csv_files;
pub use errors::{SourceError, SourceResult};
pub use in_memory::InMemorySource;

use crate::types::{Row, Schema};

/// A single-pass producer of rows.
///
/// Rows must have exactly `schema().len()` values. Values may be raw text
/// (`Value::String`) regardless of the declared column type; converting them
/// is the concatenator's job.
pub trait RowSource: Send {
    /// Identifier used in logs and error messages (usually the file path).
    fn name(&self) -> &str;

    fn schema(&self) -> &Schema;

    /// - Ok(Some(row)) → row produced
    /// - Ok(None)      → end of source
    /// - Err(e)        → read failure, the source must not be polled again
    fn next_row(&mut self) -> SourceResult<Option<Row>>;
}

impl<S: RowSource + ?Sized> RowSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn schema(&self) -> &Schema {
        (**self).schema()
    }

    fn next_row(&mut self) -> SourceResult<Option<Row>> {
        (**self).next_row()
    }
}

/// Drains what is left of a source into memory.
pub fn drain<S: RowSource + ?Sized>(source: &mut S) -> SourceResult<Vec<Row>> {
    let mut rows = Vec::new();
    while let Some(row) = source.next_row()? {
        rows.push(row);
    }
    Ok(rows)
}
