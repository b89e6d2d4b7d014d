//! Polling state machine.
//!
//! Each subscription kind is an independent deterministic reducer over
//! `(Cursor, chain state)`. A poll issues its ledger queries
//! sequentially, computes the event delta, advances the cursor, and
//! returns the new events in order. The host guarantees at most one
//! in-flight poll per subscription.
//!
//! Failure rule: a query that fails before any cursor mutation aborts
//! the cycle with the cursor untouched. Progress that is already
//! reflected in both the cursor and the collected events is kept and
//! returned, so the next successful poll neither re-emits nor skips
//! anything.

use crate::client::{ClientError, LedgerClient, Transfer, TransferQuery};
use crate::cursor::{Cursor, PendingConfirmation};
use crate::error::Result;
use crate::events::{BalanceDirection, ChainEvent, TransferDirection};
use crate::units::{self, Piconero};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// An event kind plus its filter parameters. Each subscription owns an
/// independent [`Cursor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Subscription {
    /// Every newly mined block, in ascending height order.
    NewBlocks,

    /// Incoming transfers to one account. `min_amount` of zero means
    /// no filter.
    IncomingTransfers {
        account_index: u32,
        #[serde(default)]
        min_amount: Piconero,
    },

    /// Outgoing transfers from one account.
    OutgoingTransfers {
        account_index: u32,
        #[serde(default)]
        min_amount: Piconero,
    },

    /// Balance deltas against the previous snapshot.
    BalanceChanges {
        account_index: u32,
        #[serde(default)]
        min_amount: Piconero,
    },

    /// Transfers crossing a confirmation threshold.
    Confirmations { required_confirmations: u64 },
}

/// The event-detection engine. Stateless apart from the client handle;
/// all mutable state lives in the caller-owned [`Cursor`].
#[derive(Debug)]
pub struct Watcher<C> {
    client: C,
}

impl<C: LedgerClient> Watcher<C> {
    /// Wrap a ledger client.
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Borrow the underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Run one poll cycle for `sub`, advancing `cursor` and returning
    /// the events that became visible since the previous poll. An empty
    /// vec means "nothing to do".
    pub async fn poll(&self, sub: &Subscription, cursor: &mut Cursor) -> Result<Vec<ChainEvent>> {
        match sub {
            Subscription::NewBlocks => self.poll_new_blocks(cursor).await,
            Subscription::IncomingTransfers {
                account_index,
                min_amount,
            } => {
                self.poll_transfers(
                    cursor,
                    *account_index,
                    *min_amount,
                    TransferDirection::Incoming,
                )
                .await
            }
            Subscription::OutgoingTransfers {
                account_index,
                min_amount,
            } => {
                self.poll_transfers(
                    cursor,
                    *account_index,
                    *min_amount,
                    TransferDirection::Outgoing,
                )
                .await
            }
            Subscription::BalanceChanges {
                account_index,
                min_amount,
            } => self.poll_balance(cursor, *account_index, *min_amount).await,
            Subscription::Confirmations {
                required_confirmations,
            } => self.poll_confirmations(cursor, *required_confirmations).await,
        }
    }

    /// New-block detection: emit one event per height in
    /// `(last_height, current]`, ascending and gap-free.
    async fn poll_new_blocks(&self, cursor: &mut Cursor) -> Result<Vec<ChainEvent>> {
        let current = self.client.chain_height().await?;

        let last = match cursor.last_height {
            Some(h) => h,
            None => {
                // First activation: baseline only, no historical replay.
                debug!(height = current, "block cursor initialized");
                cursor.last_height = Some(current);
                return Ok(Vec::new());
            }
        };

        let mut events = Vec::new();
        for height in (last + 1)..=current {
            let header = match self.client.block_header(height).await {
                Ok(header) => header,
                Err(err) => {
                    // Advance only past emitted heights; the next poll
                    // resumes at this one.
                    warn!(height, error = %err, "block header fetch failed mid-cycle");
                    return Ok(events);
                }
            };
            events.push(ChainEvent::NewBlock {
                height,
                hash: header.hash,
                timestamp: header.timestamp,
                difficulty: header.difficulty,
                reward: header.reward.to_xmr(),
                num_txes: header.num_txes,
            });
            cursor.last_height = Some(height);
        }

        Ok(events)
    }

    /// Transfer detection: emit each listed transfer not yet in the
    /// seen window whose amount meets the threshold.
    async fn poll_transfers(
        &self,
        cursor: &mut Cursor,
        account_index: u32,
        min_amount: Piconero,
        direction: TransferDirection,
    ) -> Result<Vec<ChainEvent>> {
        let query = TransferQuery {
            incoming: direction == TransferDirection::Incoming,
            outgoing: direction == TransferDirection::Outgoing,
            pending: true,
            pool: true,
            account_index,
        };
        let batch = self.client.transfers(query).await?;
        let transfers = match direction {
            TransferDirection::Incoming => batch.incoming,
            TransferDirection::Outgoing => batch.outgoing,
        };

        let mut events = Vec::new();
        for tx in transfers {
            if cursor.has_seen(&tx.txid) {
                continue;
            }
            // Below-threshold transfers are still recorded so a later
            // poll does not report them either.
            if min_amount.is_zero() || tx.amount >= min_amount {
                events.push(ChainEvent::TransferDetected {
                    txid: tx.txid.clone(),
                    amount: tx.amount.to_xmr(),
                    fee: tx.fee.to_xmr(),
                    address: tx.address,
                    height: tx.height,
                    timestamp: tx.timestamp,
                    confirmations: tx.confirmations,
                    direction,
                });
            }
            cursor.record_txid(tx.txid);
        }

        Ok(events)
    }

    /// Balance-change detection: exact integer delta against the stored
    /// snapshot; the snapshot refreshes every poll.
    async fn poll_balance(
        &self,
        cursor: &mut Cursor,
        account_index: u32,
        min_amount: Piconero,
    ) -> Result<Vec<ChainEvent>> {
        let snapshot = self.client.balance(account_index).await?;

        let mut events = Vec::new();
        if let Some(previous) = cursor.last_balance {
            let previous_unlocked = cursor.last_unlocked.unwrap_or(Piconero::ZERO);
            let delta = snapshot.balance.abs_diff(previous);
            if !delta.is_zero() && (min_amount.is_zero() || delta >= min_amount) {
                events.push(ChainEvent::BalanceChanged {
                    previous_balance: previous.to_xmr(),
                    current_balance: snapshot.balance.to_xmr(),
                    change: units::signed_xmr(snapshot.balance, previous),
                    previous_unlocked: previous_unlocked.to_xmr(),
                    current_unlocked: snapshot.unlocked_balance.to_xmr(),
                    unlocked_change: units::signed_xmr(
                        snapshot.unlocked_balance,
                        previous_unlocked,
                    ),
                    direction: if snapshot.balance > previous {
                        BalanceDirection::Increased
                    } else {
                        BalanceDirection::Decreased
                    },
                });
            }
        }

        cursor.last_balance = Some(snapshot.balance);
        cursor.last_unlocked = Some(snapshot.unlocked_balance);
        Ok(events)
    }

    /// Confirmation tracking, two phases: advance existing entries,
    /// then admit newly visible transfers still below the threshold.
    /// A transfer is tracked at most once and reported at most once.
    async fn poll_confirmations(
        &self,
        cursor: &mut Cursor,
        required_confirmations: u64,
    ) -> Result<Vec<ChainEvent>> {
        let mut events = Vec::new();
        let mut still_pending = Vec::with_capacity(cursor.pending_confirmations.len());

        for entry in cursor.pending_confirmations.clone() {
            match self.client.transfer_by_id(&entry.txid).await {
                Ok(tx) if tx.confirmations >= entry.target_confirmations => {
                    events.push(ChainEvent::TransferConfirmed {
                        txid: entry.txid,
                        amount: tx.amount.to_xmr(),
                        confirmations: tx.confirmations,
                        height: tx.height,
                    });
                }
                Ok(_) => still_pending.push(entry),
                Err(ClientError::NotFound(_)) => {
                    // Transient: the wallet may not resolve the id yet.
                    still_pending.push(entry);
                }
                Err(err) => {
                    warn!(txid = %entry.txid, error = %err, "confirmation re-query failed, kept pending");
                    still_pending.push(entry);
                }
            }
        }
        cursor.pending_confirmations = still_pending;

        // Phase 2: admit transfers not yet tracked and still below the
        // threshold. A transfer confirmed above never qualifies again.
        let query = TransferQuery {
            incoming: true,
            pending: true,
            pool: true,
            ..TransferQuery::default()
        };
        let batch = match self.client.transfers(query).await {
            Ok(batch) => batch,
            Err(err) => {
                warn!(error = %err, "transfer listing failed, no new transfers admitted this cycle");
                return Ok(events);
            }
        };

        let visible: Vec<&Transfer> = batch
            .incoming
            .iter()
            .chain(batch.pending.iter())
            .chain(batch.pool.iter())
            .collect();
        for tx in visible {
            if !cursor.is_tracking(&tx.txid) && tx.confirmations < required_confirmations {
                cursor.pending_confirmations.push(PendingConfirmation {
                    txid: tx.txid.clone(),
                    target_confirmations: required_confirmations,
                });
            }
        }

        Ok(events)
    }
}
