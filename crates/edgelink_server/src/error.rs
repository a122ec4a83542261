//! Error types for the coordination server.

use edgelink_store::StoreError;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the coordination server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Invalid startup configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A store operation failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error on a socket.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer closed the connection in the middle of an exchange.
    ///
    /// A zero-length read between commands is normal session termination and
    /// never surfaces as an error; this variant only appears when the close
    /// lands mid-exchange.
    #[error("connection closed by peer")]
    ConnectionClosed,
}

impl ServerError {
    /// Returns true if this is an orderly disconnect rather than a fault.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, ServerError::ConnectionClosed)
    }
}
