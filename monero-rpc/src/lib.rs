//! Monero RPC surface
//!
//! Typed JSON-RPC clients for the Monero daemon and wallet services,
//! the [`watcher_core::LedgerClient`] implementation backed by them,
//! credential/config resolution, stateless format validators, and the
//! resource+operation command surface.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, missing_debug_implementations)]

pub mod commands;
pub mod config;
pub mod constants;
pub mod daemon;
pub mod error;
pub mod jsonrpc;
pub mod provider;
pub mod validation;
pub mod wallet;

// Re-exports
pub use commands::{execute, Command};
pub use config::RpcConfig;
pub use constants::{FeePriority, NetworkType, CURRENT_RING_SIZE};
pub use daemon::DaemonRpc;
pub use error::{Result, RpcError};
pub use jsonrpc::{JsonRpcClient, RpcAuth};
pub use provider::RpcLedger;
pub use wallet::WalletRpc;
