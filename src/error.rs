/// Error types for the readsift library
use std::fmt;

/// Result type alias for readsift operations
pub type Result<T> = std::result::Result<T, SiftError>;

/// Main error type for readsift operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiftError {
    /// Configuration errors (invalid thresholds, empty or invalid pattern set)
    Config(String),

    /// I/O errors
    Io(String),

    /// Malformed FASTQ input
    Fastq(String),
}

impl fmt::Display for SiftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiftError::Config(msg) => write!(f, "Configuration error: {}", msg),
            SiftError::Io(msg) => write!(f, "I/O error: {}", msg),
            SiftError::Fastq(msg) => write!(f, "Malformed FASTQ: {}", msg),
        }
    }
}

impl std::error::Error for SiftError {}

impl From<std::io::Error> for SiftError {
    fn from(err: std::io::Error) -> Self {
        SiftError::Io(err.to_string())
    }
}
