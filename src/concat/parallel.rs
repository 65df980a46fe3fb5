//! Drains sources on worker threads, keeping input order.

use rayon::prelude::*;

use crate::concat::cancel::CancelHandle;
use crate::concat::errors::{ConcatError, ConcatResult};
use crate::debugger::Component;
use crate::source::{InMemorySource, RowSource};
use crate::db_debug;

/// Reads every source to the end concurrently and returns in-memory copies in
/// the same order. The first failure (in input order) wins; every source is
/// dropped before returning either way.
pub fn buffer_sources(
    sources: Vec<Box<dyn RowSource>>,
    cancel: &CancelHandle,
) -> ConcatResult<Vec<Box<dyn RowSource>>> {
    let buffered: Vec<ConcatResult<InMemorySource>> = sources
        .into_par_iter()
        .map(|mut source| -> ConcatResult<InMemorySource> {
            let mut rows = Vec::new();
            while let Some(row) = source.next_row()? {
                if cancel.is_cancelled() {
                    return Err(ConcatError::Cancelled);
                }
                rows.push(row);
            }

            db_debug!(Component::Concat, "buffered {} ({} row(s))", source.name(), rows.len());
            Ok(InMemorySource::new(source.name(), source.schema().clone(), rows))
        })
        .collect();

    buffered
        .into_iter()
        .map(|r| r.map(|s| Box::new(s) as Box<dyn RowSource>))
        .collect()
}
