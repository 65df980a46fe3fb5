use std::fmt;

use crate::source::errors::SourceError;
use crate::types::TypeTag;

pub type ConcatResult<T> = Result<T, ConcatError>;

#[derive(Debug)]
#[non_exhaustive]
pub enum ConcatError {
    /// A value could not be converted to its unified column type.
    Coercion {
        source: String,
        /// 1-based row number within the source.
        row: usize,
        column: String,
        value: String,
        target: TypeTag,
    },

    /// A source produced a row of the wrong width.
    WidthMismatch {
        source: String,
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Reading from a source failed; passed through unchanged.
    SourceRead(SourceError),

    Cancelled,
}

impl From<SourceError> for ConcatError {
    fn from(err: SourceError) -> Self {
        ConcatError::SourceRead(err)
    }
}

impl fmt::Display for ConcatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConcatError::Coercion {
                source,
                row,
                column,
                value,
                target,
            } => write!(
                f,
                "cannot convert '{}' to {} (source '{}', row {}, column '{}')",
                value, target, source, row, column
            ),
            ConcatError::WidthMismatch {
                source,
                row,
                expected,
                found,
            } => write!(
                f,
                "source '{}' row {} has {} values, schema declares {}",
                source, row, found, expected
            ),
            ConcatError::SourceRead(err) => write!(f, "{}", err),
            ConcatError::Cancelled => write!(f, "merge cancelled"),
        }
    }
}

impl std::error::Error for ConcatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConcatError::SourceRead(err) => Some(err),
            _ => None,
        }
    }
}
