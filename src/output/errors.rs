use std::fmt;

pub type OutputResult<T> = Result<T, OutputError>;

#[derive(Debug)]
pub enum OutputError {
    Io { target: String, message: String },
    Csv { target: String, message: String },
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputError::Io { target, message } => {
                write!(f, "cannot write '{}': {}", target, message)
            }
            OutputError::Csv { target, message } => {
                write!(f, "csv write to '{}' failed: {}", target, message)
            }
        }
    }
}

impl std::error::Error for OutputError {}
