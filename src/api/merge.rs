use std::path::Path;
use std::sync::Arc;

use crate::api::errors::MergeResult;
use crate::api::table::{MergeStats, UnifiedTable};
use crate::concat::{CancelHandle, ConcatError, Concatenator, buffer_sources};
use crate::config::{CsvOptions, MergeOptions};
use crate::debugger::{Component, DebugLevel};
use crate::source::{CsvSource, RowSource, discover_csv_files};
use crate::types::Row;
use crate::unify::{SchemaUnifier, Unification};
use crate::{db_info, db_phase, db_scope};

/// Collects sources, then unifies and concatenates them.
///
/// ```no_run
/// use csvmerge::api::merge::Merger;
/// use csvmerge::config::MergeOptions;
///
/// let mut merger = Merger::new(MergeOptions::default());
/// merger.add_csv_dir("data").unwrap();
/// let table = merger.collect().unwrap();
/// println!("{}", table.columns().join(", "));
/// ```
pub struct Merger {
    options: MergeOptions,
    csv: CsvOptions,
    sources: Vec<Box<dyn RowSource>>,
    cancel: CancelHandle,
}

impl Merger {
    pub fn new(options: MergeOptions) -> Self {
        Self {
            options,
            csv: CsvOptions::default(),
            sources: Vec::new(),
            cancel: CancelHandle::new(),
        }
    }

    pub fn with_csv_options(mut self, csv: CsvOptions) -> Self {
        self.csv = csv;
        self
    }

    /// Handle that aborts a running [`Merger::stream`] or [`Merger::collect`].
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn add_source(&mut self, source: impl RowSource + 'static) {
        self.sources.push(Box::new(source));
    }

    pub fn add_boxed(&mut self, source: Box<dyn RowSource>) {
        self.sources.push(source);
    }

    pub fn add_csv(&mut self, path: impl AsRef<Path>) -> MergeResult<()> {
        let source = CsvSource::open(path, &self.csv)?;
        self.sources.push(Box::new(source));
        Ok(())
    }

    /// Adds every `.csv` file in `dir`, in path order. Returns how many were added.
    pub fn add_csv_dir(&mut self, dir: impl AsRef<Path>) -> MergeResult<usize> {
        let files = discover_csv_files(dir)?;
        for file in &files {
            self.add_csv(file)?;
        }
        Ok(files.len())
    }

    /// Computes the unified schema and plans without reading any rows.
    pub fn unify(&self) -> MergeResult<Unification> {
        let unifier = SchemaUnifier::new(&self.options);
        let unification = unifier.unify(self.sources.iter().map(|s| (s.name(), s.schema())))?;
        Ok(unification)
    }

    /// Lazy merge. Schema problems surface here, before any row is read.
    pub fn stream(self) -> MergeResult<Concatenator> {
        let unification = db_phase!("unify", {
            db_scope!(DebugLevel::Debug, Component::Merge, "unify", { self.unify() })
        })?;

        db_info!(
            Component::Merge,
            "merging {} source(s), order={}, types={}, coercion={}",
            self.sources.len(),
            self.options.column_order,
            self.options.type_policy,
            self.options.coercion
        );

        let sources = if self.options.parallel {
            db_phase!("buffer", { buffer_sources(self.sources, &self.cancel) })?
        } else {
            self.sources
        };

        Ok(Concatenator::new(
            Arc::new(unification.schema),
            sources,
            unification.plans,
            self.options.coercion,
            self.cancel,
        ))
    }

    /// Eager merge into memory.
    pub fn collect(self) -> MergeResult<UnifiedTable> {
        let mut rows_iter = self.stream()?;

        let rows: Result<Vec<Row>, ConcatError> =
            db_phase!("concat", { rows_iter.by_ref().collect() });
        let rows = rows?;

        let stats = MergeStats::from(rows_iter.stats());
        db_info!(
            Component::Merge,
            "merged {} row(s) from {} source(s)",
            stats.rows_out,
            stats.sources
        );

        Ok(UnifiedTable::new(rows_iter.schema().clone(), rows, stats))
    }
}

/// Merges CSV files in the given order.
pub fn merge_csv_files<P: AsRef<Path>>(
    paths: &[P],
    options: MergeOptions,
    csv: CsvOptions,
) -> MergeResult<UnifiedTable> {
    let mut merger = Merger::new(options).with_csv_options(csv);
    for path in paths {
        merger.add_csv(path)?;
    }
    merger.collect()
}

/// Merges every CSV file found in `dir`.
pub fn merge_csv_dir(
    dir: impl AsRef<Path>,
    options: MergeOptions,
    csv: CsvOptions,
) -> MergeResult<UnifiedTable> {
    let mut merger = Merger::new(options).with_csv_options(csv);
    merger.add_csv_dir(dir)?;
    merger.collect()
}
