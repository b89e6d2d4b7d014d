//! Error types for the RPC surface.

use thiserror::Error;

/// Result type for RPC operations.
pub type Result<T> = std::result::Result<T, RpcError>;

/// RPC errors.
#[derive(Error, Debug)]
pub enum RpcError {
    /// HTTP transport failure (connect, timeout, non-2xx status).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Error object returned by the remote JSON-RPC endpoint.
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Response body did not match the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Caller-supplied parameter rejected before any network call.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Amount conversion failure.
    #[error(transparent)]
    Units(#[from] watcher_core::UnitsError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}
