use std::fmt;

pub type SourceResult<T> = Result<T, SourceError>;

/// Failures raised while opening or reading a row source.
#[derive(Debug)]
pub enum SourceError {
    Io { source: String, message: String },

    Csv { source: String, message: String },

    InvalidHeader { source: String, reason: String },

    Malformed {
        source: String,
        row: usize,
        expected: usize,
        found: usize,
    },
}

impl SourceError {
    pub fn io(source: impl Into<String>, err: std::io::Error) -> Self {
        SourceError::Io {
            source: source.into(),
            message: err.to_string(),
        }
    }

    pub fn csv(source: impl Into<String>, err: csv::Error) -> Self {
        SourceError::Csv {
            source: source.into(),
            message: err.to_string(),
        }
    }

    /// Name of the source that failed.
    pub fn source_name(&self) -> &str {
        match self {
            SourceError::Io { source, .. }
            | SourceError::Csv { source, .. }
            | SourceError::InvalidHeader { source, .. }
            | SourceError::Malformed { source, .. } => source,
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Io { source, message } => {
                write!(f, "source '{}': io error: {}", source, message)
            }

            SourceError::Csv { source, message } => {
                write!(f, "source '{}': csv error: {}", source, message)
            }

            SourceError::InvalidHeader { source, reason } => {
                write!(f, "source '{}': invalid header ({})", source, reason)
            }

            SourceError::Malformed {
                source,
                row,
                expected,
                found,
            } => write!(
                f,
                "source '{}': row {} has {} fields, expected {}",
                source, row, found, expected
            ),
        }
    }
}

impl std::error::Error for SourceError {}
