use std::collections::VecDeque;

use crate::source::RowSource;
use crate::source::errors::SourceResult;
use crate::types::{Row, Schema};

/// A source backed by rows already in memory.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    name: String,
    schema: Schema,
    rows: VecDeque<Row>,
}

impl InMemorySource {
    pub fn new(name: impl Into<String>, schema: Schema, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            schema,
            rows: rows.into(),
        }
    }

    /// Rows not yet handed out.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl RowSource for InMemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn next_row(&mut self) -> SourceResult<Option<Row>> {
        Ok(self.rows.pop_front())
    }
}
