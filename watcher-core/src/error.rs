//! Error types for the watcher core.

use crate::client::ClientError;
use crate::units::UnitsError;
use thiserror::Error;

/// Result type for watcher operations.
pub type Result<T> = std::result::Result<T, WatchError>;

/// Watcher errors.
#[derive(Error, Debug)]
pub enum WatchError {
    /// Malformed numeric input to the conversion layer.
    #[error(transparent)]
    InvalidAmount(#[from] UnitsError),

    /// A ledger query failed; the poll cycle was abandoned without
    /// cursor corruption and will be retried on the next tick.
    #[error("transport failure: {0}")]
    Transport(String),

    /// A referenced transfer no longer resolves.
    #[error("transfer not found: {0}")]
    NotFound(String),
}

impl From<ClientError> for WatchError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Transport(msg) => WatchError::Transport(msg),
            ClientError::NotFound(msg) => WatchError::NotFound(msg),
        }
    }
}
