//! Error types for store operations.

use std::io;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in the server-side stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The referenced data file does not exist.
    #[error("data file does not exist: {0}")]
    DataFileMissing(String),

    /// The data file exists but holds no values.
    #[error("data file is empty: {0}")]
    EmptyDataFile(String),

    /// A data file line did not parse as an integer.
    #[error("invalid data in {file}: {line:?}")]
    InvalidData {
        /// The data file name.
        file: String,
        /// The offending line.
        line: String,
    },

    /// A registry line did not match the expected record format.
    #[error("registry corrupted: {0}")]
    Corrupted(String),
}
