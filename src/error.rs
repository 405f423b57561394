//! Error types for the dataset loader.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our custom error.
pub type Result<T> = std::result::Result<T, DatasetError>;

/// Errors that can occur while configuring or running the loader.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// Error reading the source or a config file.
    #[error("I/O error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Loader options rejected at construction time.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A source line that is not a well-formed record.
    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// A requested line index past the end of the source.
    #[error("Record index {index} is out of range (source has {len} records)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error while writing parsed records.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DatasetError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a malformed-record error for a zero-based line number.
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for DatasetError {
    fn from(err: serde_json::Error) -> Self {
        DatasetError::Serialization(err.to_string())
    }
}
