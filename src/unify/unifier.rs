//! Builds the unified schema and one resolution plan per source.
//!
//! 1. Walk sources in input order, appending each new column name.
//! 2. Fold every later occurrence into the column type under the type policy.
//! 3. Optionally sort by name.
//! 4. Resolve each unified column against every source by name.

use std::collections::{HashMap, HashSet};

use crate::config::{ColumnOrder, MergeOptions, TypePolicy};
use crate::debugger::Component;
use crate::types::{ColumnDescriptor, Schema, TypeTag};
use crate::unify::errors::{UnifyError, UnifyResult};
use crate::unify::plan::{ColumnSlot, ResolutionPlan};
use crate::{db_debug, db_info, db_trace};

/// Result of unification. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unification {
    pub schema: Schema,
    pub plans: Vec<ResolutionPlan>,
}

pub struct SchemaUnifier<'a> {
    options: &'a MergeOptions,
}

impl<'a> SchemaUnifier<'a> {
    pub fn new(options: &'a MergeOptions) -> Self {
        Self { options }
    }

    /// Name used for matching across sources.
    fn key(&self, name: &str) -> String {
        if self.options.case_sensitive {
            name.to_string()
        } else {
            name.to_ascii_lowercase()
        }
    }

    pub fn unify<'s, I>(&self, sources: I) -> UnifyResult<Unification>
    where
        I: IntoIterator<Item = (&'s str, &'s Schema)>,
    {
        let sources: Vec<(&str, &Schema)> = sources.into_iter().collect();
        if sources.is_empty() {
            return Err(UnifyError::EmptyInput);
        }

        let mut columns: Vec<ColumnDescriptor> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for (name, schema) in &sources {
            self.check_source(name, schema)?;

            for col in &schema.columns {
                let key = self.key(&col.name);

                match positions.get(&key) {
                    None => {
                        db_trace!(Component::Unify, "{}: new column {}", name, col);
                        positions.insert(key, columns.len());
                        columns.push(col.clone());
                    }
                    Some(&pos) => {
                        let unified = &mut columns[pos];
                        unified.ty = self.merge_types(&unified.name, unified.ty, col.ty)?;
                    }
                }
            }
        }

        if self.options.column_order == ColumnOrder::Alphabetical {
            columns.sort_by(|a, b| {
                self.key(&a.name)
                    .cmp(&self.key(&b.name))
                    .then_with(|| a.name.cmp(&b.name))
            });
        }

        let schema = Schema::new(columns);
        db_info!(
            Component::Unify,
            "unified {} source(s) into {} column(s): {}",
            sources.len(),
            schema.len(),
            schema
        );

        let plans = sources
            .iter()
            .map(|(name, source_schema)| self.plan_for(name, source_schema, &schema))
            .collect();

        Ok(Unification { schema, plans })
    }

    fn check_source(&self, name: &str, schema: &Schema) -> UnifyResult<()> {
        if schema.is_empty() {
            return Err(UnifyError::EmptySchema {
                source: name.to_string(),
            });
        }

        let mut seen = HashSet::with_capacity(schema.len());
        for col in &schema.columns {
            if !seen.insert(self.key(&col.name)) {
                return Err(UnifyError::DuplicateColumn {
                    source: name.to_string(),
                    column: col.name.clone(),
                });
            }
        }

        Ok(())
    }

    fn merge_types(
        &self,
        column: &str,
        current: TypeTag,
        incoming: TypeTag,
    ) -> UnifyResult<TypeTag> {
        match self.options.type_policy {
            TypePolicy::Relaxed => Ok(current.widen(incoming)),
            TypePolicy::Strict if current.is_strictly_compatible(incoming) => {
                Ok(current.widen(incoming))
            }
            TypePolicy::Strict => Err(UnifyError::SchemaConflict {
                column: column.to_string(),
                left: current,
                right: incoming,
            }),
        }
    }

    fn plan_for(&self, name: &str, source: &Schema, unified: &Schema) -> ResolutionPlan {
        let index: HashMap<String, usize> = source
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (self.key(&c.name), i))
            .collect();

        let slots = unified
            .columns
            .iter()
            .map(|col| match index.get(&self.key(&col.name)) {
                Some(&i) => ColumnSlot::Present(i),
                None => ColumnSlot::Absent,
            })
            .collect();

        let plan = ResolutionPlan::new(name, slots);
        db_debug!(Component::Unify, "plan {}", plan);
        plan
    }
}

/// Convenience wrapper around [`SchemaUnifier::unify`].
pub fn unify<'s, I>(sources: I, options: &MergeOptions) -> UnifyResult<Unification>
where
    I: IntoIterator<Item = (&'s str, &'s Schema)>,
{
    SchemaUnifier::new(options).unify(sources)
}
