//! Lazy, single-pass concatenation of sources into unified rows.
//!
//! Rows come out source by source, each source in its own order. A source is
//! dropped (closing any file it holds) as soon as it is exhausted, and every
//! remaining source is dropped when the merge aborts.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::concat::cancel::CancelHandle;
use crate::concat::coerce::coerce;
use crate::concat::errors::{ConcatError, ConcatResult};
use crate::config::CoercionMode;
use crate::debugger::Component;
use crate::source::RowSource;
use crate::types::{Row, Schema, Value};
use crate::unify::{ColumnSlot, ResolutionPlan};
use crate::{db_debug, db_error, db_warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcatState {
    NotStarted,
    Emitting,
    Exhausted,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConcatStats {
    /// Unified rows emitted
    pub rows_out: u64,

    /// Sources fully drained
    pub sources_done: usize,

    /// Null cells inserted for absent columns
    pub nulls_filled: u64,

    /// Values whose type changed on the way into the unified column
    pub values_coerced: u64,

    /// Unconvertible values replaced by Null (lenient mode only)
    pub coercion_failures_nulled: u64,
}

struct ActiveSource {
    source: Box<dyn RowSource>,
    plan: ResolutionPlan,
    /// Rows read from this source so far
    rows_read: usize,
}

pub struct Concatenator {
    schema: Arc<Schema>,
    pending: VecDeque<(Box<dyn RowSource>, ResolutionPlan)>,
    current: Option<ActiveSource>,
    mode: CoercionMode,
    cancel: CancelHandle,
    state: ConcatState,
    stats: ConcatStats,
}

impl Concatenator {
    /// `sources[i]` is read through `plans[i]`; both must be in input order.
    pub fn new(
        schema: Arc<Schema>,
        sources: Vec<Box<dyn RowSource>>,
        plans: Vec<ResolutionPlan>,
        mode: CoercionMode,
        cancel: CancelHandle,
    ) -> Self {
        debug_assert_eq!(sources.len(), plans.len(), "one plan per source");
        debug_assert!(
            plans.iter().all(|p| p.width() == schema.len()),
            "plans must cover every unified column"
        );

        Self {
            schema,
            pending: sources.into_iter().zip(plans).collect(),
            current: None,
            mode,
            cancel,
            state: ConcatState::NotStarted,
            stats: ConcatStats::default(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn state(&self) -> ConcatState {
        self.state
    }

    pub fn stats(&self) -> &ConcatStats {
        &self.stats
    }

    /// Stops the merge and releases every source still held.
    fn abort(&mut self) {
        self.current = None;
        self.pending.clear();
        self.state = ConcatState::Exhausted;
    }

    fn fail(&mut self, err: ConcatError) -> Option<ConcatResult<Row>> {
        db_error!(Component::Concat, "{}", err);
        self.abort();
        Some(Err(err))
    }
}

impl Iterator for Concatenator {
    type Item = ConcatResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                ConcatState::Exhausted => return None,
                ConcatState::NotStarted => self.state = ConcatState::Emitting,
                ConcatState::Emitting => {}
            }

            if self.cancel.is_cancelled() {
                db_warn!(Component::Concat, "cancelled after {} row(s)", self.stats.rows_out);
                return self.fail(ConcatError::Cancelled);
            }

            let Some(active) = self.current.as_mut() else {
                match self.pending.pop_front() {
                    Some((source, plan)) => {
                        db_debug!(Component::Concat, "reading {}", source.name());
                        self.current = Some(ActiveSource {
                            source,
                            plan,
                            rows_read: 0,
                        });
                        continue;
                    }
                    None => {
                        self.state = ConcatState::Exhausted;
                        return None;
                    }
                }
            };

            let row = match active.source.next_row() {
                Ok(Some(row)) => row,
                Ok(None) => {
                    db_debug!(
                        Component::Concat,
                        "{} done ({} row(s))",
                        active.source.name(),
                        active.rows_read
                    );
                    self.current = None;
                    self.stats.sources_done += 1;
                    continue;
                }
                Err(err) => return self.fail(ConcatError::SourceRead(err)),
            };

            active.rows_read += 1;

            match project(&self.schema, active, row, self.mode, &mut self.stats) {
                Ok(out) => {
                    self.stats.rows_out += 1;
                    return Some(Ok(out));
                }
                Err(err) => return self.fail(err),
            }
        }
    }
}

/// Maps one source row onto the unified schema.
fn project(
    schema: &Schema,
    active: &ActiveSource,
    row: Row,
    mode: CoercionMode,
    stats: &mut ConcatStats,
) -> ConcatResult<Row> {
    let source = active.source.name();
    let width = active.source.schema().len();

    if row.len() != width {
        return Err(ConcatError::WidthMismatch {
            source: source.to_string(),
            row: active.rows_read,
            expected: width,
            found: row.len(),
        });
    }

    let mut values: Vec<Option<Value>> = row.into_iter().map(Some).collect();
    let mut out = Vec::with_capacity(schema.len());

    for (col, slot) in schema.columns.iter().zip(&active.plan.slots) {
        let idx = match slot {
            ColumnSlot::Present(idx) => *idx,
            ColumnSlot::Absent => {
                stats.nulls_filled += 1;
                out.push(Value::Null);
                continue;
            }
        };

        let raw = values
            .get_mut(idx)
            .and_then(Option::take)
            .unwrap_or(Value::Null);
        let from = raw.type_tag();

        match coerce(raw, col.ty) {
            Ok(value) => {
                if !value.is_null() && from != col.ty {
                    stats.values_coerced += 1;
                }
                out.push(value);
            }
            Err(bad) => match mode {
                CoercionMode::FailFast => {
                    return Err(ConcatError::Coercion {
                        source: source.to_string(),
                        row: active.rows_read,
                        column: col.name.clone(),
                        value: bad.to_string(),
                        target: col.ty,
                    });
                }
                CoercionMode::Lenient => {
                    db_warn!(
                        Component::Concat,
                        "{} row {}: '{}' is not {} in column '{}', using NULL",
                        source,
                        active.rows_read,
                        bad,
                        col.ty,
                        col.name
                    );
                    stats.coercion_failures_nulled += 1;
                    out.push(Value::Null);
                }
            },
        }
    }

    Ok(out)
}
