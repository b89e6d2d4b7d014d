//! Persisted per-subscription progress state.
//!
//! One `Cursor` exists per active subscription. The host persists it
//! between polls; only [`crate::detector::Watcher::poll`] mutates it.

use crate::units::Piconero;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Most-recent-N window of reported transfer ids. Matches the remote
/// wallet's listing depth; anything older has long since left the
/// `get_transfers` response.
pub const SEEN_TXID_CAPACITY: usize = 100;

/// A transfer awaited until it crosses a confirmation threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingConfirmation {
    pub txid: String,
    pub target_confirmations: u64,
}

/// Incremental detection state for one subscription.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    /// Highest block height already reported. `None` until the first
    /// poll establishes a baseline.
    pub last_height: Option<u64>,

    /// Bounded log of reported transfer ids, oldest first.
    #[serde(default)]
    pub seen_txids: VecDeque<String>,

    /// Balance snapshot from the previous poll. `None` means no delta
    /// may be emitted yet.
    pub last_balance: Option<Piconero>,
    pub last_unlocked: Option<Piconero>,

    /// Transfers being watched for a confirmation milestone.
    #[serde(default)]
    pub pending_confirmations: Vec<PendingConfirmation>,
}

impl Cursor {
    /// Empty cursor for a newly activated subscription.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `txid` was already reported by this subscription.
    pub fn has_seen(&self, txid: &str) -> bool {
        self.seen_txids.iter().any(|t| t == txid)
    }

    /// Record a reported transfer id, evicting oldest entries beyond
    /// [`SEEN_TXID_CAPACITY`].
    pub fn record_txid(&mut self, txid: String) {
        self.seen_txids.push_back(txid);
        while self.seen_txids.len() > SEEN_TXID_CAPACITY {
            self.seen_txids.pop_front();
        }
    }

    /// Whether `txid` is already awaiting a confirmation milestone.
    pub fn is_tracking(&self, txid: &str) -> bool {
        self.pending_confirmations.iter().any(|p| p.txid == txid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cursor_is_empty() {
        let cursor = Cursor::new();
        assert_eq!(cursor.last_height, None);
        assert!(cursor.seen_txids.is_empty());
        assert_eq!(cursor.last_balance, None);
        assert!(cursor.pending_confirmations.is_empty());
    }

    #[test]
    fn test_seen_txids_bounded() {
        let mut cursor = Cursor::new();
        for i in 0..250 {
            cursor.record_txid(format!("tx{i}"));
        }
        assert_eq!(cursor.seen_txids.len(), SEEN_TXID_CAPACITY);
        // Oldest evicted first.
        assert!(!cursor.has_seen("tx0"));
        assert!(!cursor.has_seen("tx149"));
        assert!(cursor.has_seen("tx150"));
        assert!(cursor.has_seen("tx249"));
    }

    #[test]
    fn test_serde_round_trip() {
        let mut cursor = Cursor::new();
        cursor.last_height = Some(3_000_000);
        cursor.record_txid("abc".into());
        cursor.last_balance = Some(Piconero(42));
        cursor.pending_confirmations.push(PendingConfirmation {
            txid: "def".into(),
            target_confirmations: 10,
        });

        let json = serde_json::to_string(&cursor).unwrap();
        let restored: Cursor = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cursor);
    }
}
