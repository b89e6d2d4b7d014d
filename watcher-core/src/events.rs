//! Event shapes emitted to the host. Amounts are XMR display strings.

use serde::{Deserialize, Serialize};

/// Direction of a detected transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferDirection {
    Incoming,
    Outgoing,
}

/// Direction of a balance change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceDirection {
    Increased,
    Decreased,
}

/// A new chain event, produced at most once per subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ChainEvent {
    /// A block was mined.
    NewBlock {
        height: u64,
        hash: String,
        timestamp: u64,
        difficulty: u64,
        reward: String,
        num_txes: u64,
    },

    /// A transfer not previously reported was listed by the wallet.
    TransferDetected {
        txid: String,
        amount: String,
        fee: String,
        address: String,
        height: u64,
        timestamp: u64,
        confirmations: u64,
        direction: TransferDirection,
    },

    /// The account balance moved since the previous snapshot.
    BalanceChanged {
        previous_balance: String,
        current_balance: String,
        change: String,
        previous_unlocked: String,
        current_unlocked: String,
        unlocked_change: String,
        direction: BalanceDirection,
    },

    /// A tracked transfer crossed its confirmation threshold.
    TransferConfirmed {
        txid: String,
        amount: String,
        confirmations: u64,
        height: u64,
    },
}
