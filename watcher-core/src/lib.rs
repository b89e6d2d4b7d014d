//! Monero Watcher Core
//!
//! Incremental event detection over a remote Monero node.
//!
//! # Architecture
//!
//! - **Cursor**: per-subscription progress marker, persisted by the host
//! - **Watcher**: deterministic reducers `(Cursor, chain state) -> events`
//! - **LedgerClient**: trait boundary to the daemon/wallet RPC surface
//! - **Piconero**: exact fixed-point arithmetic at 12 decimal places
//!
//! # Invariants
//!
//! - `last_height` is monotonically non-decreasing per subscription
//! - A transfer id is never reported twice by the same subscription
//! - No event is lost between polls: cursor state only advances past
//!   heights and transfers that were actually emitted

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, missing_debug_implementations)]

pub mod client;
pub mod cursor;
pub mod detector;
pub mod error;
pub mod events;
pub mod units;

// Re-exports
pub use client::{
    AccountBalance, BlockHeader, ClientError, LedgerClient, Transfer, TransferBatch, TransferQuery,
};
pub use cursor::{Cursor, PendingConfirmation, SEEN_TXID_CAPACITY};
pub use detector::{Subscription, Watcher};
pub use error::{Result, WatchError};
pub use events::{BalanceDirection, ChainEvent, TransferDirection};
pub use units::{Piconero, UnitsError, DECIMALS, PICONERO_PER_XMR};
