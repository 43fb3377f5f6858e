//! Error types for the ADCP log parser library.

use thiserror::Error;

/// Result type alias for ADCP log operations.
pub type Result<T> = std::result::Result<T, Error>;

/// File-level errors: a file either loads or it does not.
///
/// Malformed lines inside a raw dump never surface here, see [`LineError`].
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error occurred while reading or writing (includes non UTF-8 input)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The structured source parsed but does not have the expected shape
    #[error("Invalid ADCP log format: {0}")]
    InvalidFormat(String),

    /// Structured source is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Output format error (e.g., Parquet write error)
    #[error("Output error: {0}")]
    OutputError(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

/// Why a single raw-dump line was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("expected {expected} numeric token(s), found {found}")]
    WrongTokenCount { expected: &'static str, found: usize },

    #[error("invalid number '{token}'")]
    InvalidNumber { token: String },
}
