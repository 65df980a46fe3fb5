//! Name-aligned concatenation of tabular sources whose column sets overlap
//! but differ.
//!
//! Sources are unified into one schema (missing columns become Null, types
//! widen to a common supertype), then streamed row by row into it.

pub mod config;
pub mod debugger;

pub mod api;
pub mod concat;
pub mod output;
pub mod source;
pub mod types;
pub mod unify;

pub use api::{MergeError, MergeResult, MergeStats, Merger, UnifiedTable};
pub use config::{CoercionMode, ColumnOrder, CsvOptions, MergeOptions, TypePolicy};
pub use types::{ColumnDescriptor, Row, Schema, TypeTag, Value};
