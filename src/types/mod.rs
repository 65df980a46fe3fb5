//! Core type contracts for csvmerge.
//!
//! - No IO
//! - No dependencies on other modules
//!
//! The type set is closed; widening rules live next to the tags.

pub mod datatype;
pub mod schema;
pub mod value;

pub use datatype::TypeTag;
pub use schema::{ColumnDescriptor, Schema};
pub use value::{Row, Value};
