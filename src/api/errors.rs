use std::fmt;

use crate::concat::errors::ConcatError;
use crate::output::errors::OutputError;
use crate::source::errors::SourceError;
use crate::unify::errors::UnifyError;

pub type MergeResult<T> = Result<T, MergeError>;

#[derive(Debug)]
pub enum MergeError {
    /// Opening or inspecting a source failed.
    Source(SourceError),
    Unify(UnifyError),
    Concat(ConcatError),
    Output(OutputError),
}

impl MergeError {
    /// True when nothing was given to merge.
    pub fn is_empty_input(&self) -> bool {
        matches!(self, MergeError::Unify(UnifyError::EmptyInput))
    }
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeError::Source(e) => write!(f, "source error: {e}"),
            MergeError::Unify(e) => write!(f, "unify error: {e}"),
            MergeError::Concat(e) => write!(f, "merge error: {e}"),
            MergeError::Output(e) => write!(f, "output error: {e}"),
        }
    }
}

impl std::error::Error for MergeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MergeError::Source(e) => Some(e),
            MergeError::Unify(e) => Some(e),
            MergeError::Concat(e) => Some(e),
            MergeError::Output(e) => Some(e),
        }
    }
}

impl From<SourceError> for MergeError {
    fn from(e: SourceError) -> Self {
        MergeError::Source(e)
    }
}

impl From<UnifyError> for MergeError {
    fn from(e: UnifyError) -> Self {
        MergeError::Unify(e)
    }
}

impl From<ConcatError> for MergeError {
    fn from(e: ConcatError) -> Self {
        MergeError::Concat(e)
    }
}

impl From<OutputError> for MergeError {
    fn from(e: OutputError) -> Self {
        MergeError::Output(e)
    }
}
