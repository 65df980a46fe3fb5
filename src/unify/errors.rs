use std::fmt;

use crate::types::TypeTag;

pub type UnifyResult<T> = Result<T, UnifyError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnifyError {
    /// No sources were supplied.
    EmptyInput,

    /// A source declared no columns.
    EmptySchema { source: String },

    /// Two columns of one source resolve to the same name.
    DuplicateColumn { source: String, column: String },

    /// Incompatible types for one column under the strict policy.
    SchemaConflict {
        column: String,
        left: TypeTag,
        right: TypeTag,
    },
}

impl fmt::Display for UnifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnifyError::EmptyInput => write!(f, "no sources to merge"),
            UnifyError::EmptySchema { source } => {
                write!(f, "source '{}' has no columns", source)
            }
            UnifyError::DuplicateColumn { source, column } => {
                write!(f, "source '{}' has column '{}' more than once", source, column)
            }
            UnifyError::SchemaConflict {
                column,
                left,
                right,
            } => write!(
                f,
                "schema conflict on column '{}': {} vs {}",
                column, left, right
            ),
        }
    }
}

impl std::error::Error for UnifyError {}
