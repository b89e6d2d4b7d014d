//! Boundary to the remote daemon/wallet RPC surface.
//!
//! The detector depends only on this trait; transport, credentials and
//! JSON-RPC details live behind it. Implementations are stateless per
//! call and may be shared across subscriptions.

use crate::units::Piconero;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures crossing the client boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Network, timeout, or remote RPC error. Recoverable: the poll
    /// cycle is abandoned and retried on the next tick.
    #[error("transport failure: {0}")]
    Transport(String),

    /// A referenced transfer id no longer resolves. Transient for
    /// confirmation tracking.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Header of a mined block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub height: u64,
    pub hash: String,
    pub timestamp: u64,
    pub difficulty: u64,
    pub reward: Piconero,
    pub num_txes: u64,
}

/// A wallet transfer as listed by the remote node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub txid: String,
    pub amount: Piconero,
    pub fee: Piconero,
    pub address: String,
    pub height: u64,
    pub timestamp: u64,
    pub confirmations: u64,
}

/// Direction flags and account filter for a transfer listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferQuery {
    pub incoming: bool,
    pub outgoing: bool,
    pub pending: bool,
    pub pool: bool,
    pub account_index: u32,
}

/// Transfer listing grouped by state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferBatch {
    pub incoming: Vec<Transfer>,
    pub outgoing: Vec<Transfer>,
    pub pending: Vec<Transfer>,
    pub pool: Vec<Transfer>,
}

/// Total and unlocked balance of one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub balance: Piconero,
    pub unlocked_balance: Piconero,
}

/// Read-only view of the remote ledger consumed by the detector.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Current chain height (block count).
    async fn chain_height(&self) -> Result<u64, ClientError>;

    /// Header of the block at `height`.
    async fn block_header(&self, height: u64) -> Result<BlockHeader, ClientError>;

    /// Transfers matching the query's direction flags and account.
    async fn transfers(&self, query: TransferQuery) -> Result<TransferBatch, ClientError>;

    /// Balance snapshot for one account.
    async fn balance(&self, account_index: u32) -> Result<AccountBalance, ClientError>;

    /// Look up a single transfer; `NotFound` if it no longer resolves.
    async fn transfer_by_id(&self, txid: &str) -> Result<Transfer, ClientError>;
}
