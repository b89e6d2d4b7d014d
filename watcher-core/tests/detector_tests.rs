//! Detector behavior against a scripted mock ledger.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use watcher_core::{
    AccountBalance, BlockHeader, ChainEvent, ClientError, Cursor, LedgerClient, Piconero,
    Subscription, Transfer, TransferBatch, TransferDirection, TransferQuery, WatchError, Watcher,
    SEEN_TXID_CAPACITY,
};

/// Scripted in-memory ledger. Every response can be swapped between
/// polls to simulate chain growth and transport failures.
struct MockLedger {
    height: Mutex<Result<u64, ClientError>>,
    headers: Mutex<HashMap<u64, Result<BlockHeader, ClientError>>>,
    batch: Mutex<Result<TransferBatch, ClientError>>,
    balance: Mutex<Result<AccountBalance, ClientError>>,
    by_id: Mutex<HashMap<String, Result<Transfer, ClientError>>>,
}

impl MockLedger {
    fn new() -> Self {
        MockLedger {
            height: Mutex::new(Ok(0)),
            headers: Mutex::new(HashMap::new()),
            batch: Mutex::new(Ok(TransferBatch::default())),
            balance: Mutex::new(Ok(AccountBalance {
                balance: Piconero::ZERO,
                unlocked_balance: Piconero::ZERO,
            })),
            by_id: Mutex::new(HashMap::new()),
        }
    }

    fn set_height(&self, height: u64) {
        *self.height.lock().unwrap() = Ok(height);
    }

    fn fail_height(&self, msg: &str) {
        *self.height.lock().unwrap() = Err(ClientError::Transport(msg.into()));
    }

    fn set_header(&self, height: u64) {
        self.headers.lock().unwrap().insert(height, Ok(header(height)));
    }

    fn fail_header(&self, height: u64, msg: &str) {
        self.headers
            .lock()
            .unwrap()
            .insert(height, Err(ClientError::Transport(msg.into())));
    }

    fn set_batch(&self, batch: TransferBatch) {
        *self.batch.lock().unwrap() = Ok(batch);
    }

    fn fail_batch(&self, msg: &str) {
        *self.batch.lock().unwrap() = Err(ClientError::Transport(msg.into()));
    }

    fn set_balance(&self, balance: u128, unlocked: u128) {
        *self.balance.lock().unwrap() = Ok(AccountBalance {
            balance: Piconero(balance),
            unlocked_balance: Piconero(unlocked),
        });
    }

    fn set_transfer(&self, tx: Transfer) {
        self.by_id.lock().unwrap().insert(tx.txid.clone(), Ok(tx));
    }

    fn drop_transfer(&self, txid: &str) {
        self.by_id
            .lock()
            .unwrap()
            .insert(txid.into(), Err(ClientError::NotFound(txid.into())));
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn chain_height(&self) -> Result<u64, ClientError> {
        self.height.lock().unwrap().clone()
    }

    async fn block_header(&self, height: u64) -> Result<BlockHeader, ClientError> {
        self.headers
            .lock()
            .unwrap()
            .get(&height)
            .cloned()
            .unwrap_or_else(|| Err(ClientError::Transport(format!("no header at {height}"))))
    }

    async fn transfers(&self, _query: TransferQuery) -> Result<TransferBatch, ClientError> {
        self.batch.lock().unwrap().clone()
    }

    async fn balance(&self, _account_index: u32) -> Result<AccountBalance, ClientError> {
        self.balance.lock().unwrap().clone()
    }

    async fn transfer_by_id(&self, txid: &str) -> Result<Transfer, ClientError> {
        self.by_id
            .lock()
            .unwrap()
            .get(txid)
            .cloned()
            .unwrap_or_else(|| Err(ClientError::NotFound(txid.into())))
    }
}

fn header(height: u64) -> BlockHeader {
    BlockHeader {
        height,
        hash: format!("hash{height}"),
        timestamp: 1_700_000_000 + height,
        difficulty: 1_000,
        reward: Piconero(600_000_000_000),
        num_txes: 2,
    }
}

fn transfer(txid: &str, amount: u128, confirmations: u64) -> Transfer {
    Transfer {
        txid: txid.into(),
        amount: Piconero(amount),
        fee: Piconero(30_000_000),
        address: "44AFFq5kSiGBoZ".into(),
        height: 3_000_000,
        timestamp: 1_700_000_100,
        confirmations,
    }
}

fn incoming_sub(min_amount: u128) -> Subscription {
    Subscription::IncomingTransfers {
        account_index: 0,
        min_amount: Piconero(min_amount),
    }
}

// ---------------------------------------------------------------------
// New-block detection
// ---------------------------------------------------------------------

#[tokio::test]
async fn first_block_poll_sets_baseline_without_replay() {
    let ledger = MockLedger::new();
    ledger.set_height(3_000_000);
    let watcher = Watcher::new(ledger);
    let mut cursor = Cursor::new();

    let events = watcher.poll(&Subscription::NewBlocks, &mut cursor).await.unwrap();

    assert!(events.is_empty());
    assert_eq!(cursor.last_height, Some(3_000_000));
}

#[tokio::test]
async fn new_blocks_emitted_ascending_and_gap_free() {
    let ledger = MockLedger::new();
    ledger.set_height(103);
    for h in 101..=103 {
        ledger.set_header(h);
    }
    let watcher = Watcher::new(ledger);
    let mut cursor = Cursor::new();
    cursor.last_height = Some(100);

    let events = watcher.poll(&Subscription::NewBlocks, &mut cursor).await.unwrap();

    let heights: Vec<u64> = events
        .iter()
        .map(|e| match e {
            ChainEvent::NewBlock { height, .. } => *height,
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    assert_eq!(heights, vec![101, 102, 103]);
    assert_eq!(cursor.last_height, Some(103));
}

#[tokio::test]
async fn unchanged_height_emits_nothing() {
    let ledger = MockLedger::new();
    ledger.set_height(100);
    let watcher = Watcher::new(ledger);
    let mut cursor = Cursor::new();
    cursor.last_height = Some(100);

    let events = watcher.poll(&Subscription::NewBlocks, &mut cursor).await.unwrap();

    assert!(events.is_empty());
    assert_eq!(cursor.last_height, Some(100));
}

#[tokio::test]
async fn header_failure_mid_loop_keeps_resume_point() {
    let ledger = MockLedger::new();
    ledger.set_height(103);
    ledger.set_header(101);
    ledger.set_header(102);
    ledger.fail_header(103, "connection reset");
    let watcher = Watcher::new(ledger);
    let mut cursor = Cursor::new();
    cursor.last_height = Some(100);

    let events = watcher.poll(&Subscription::NewBlocks, &mut cursor).await.unwrap();

    // 101 and 102 were delivered; the cursor must not move past 102.
    assert_eq!(events.len(), 2);
    assert_eq!(cursor.last_height, Some(102));

    // Recovery: the next poll picks up 103 and only 103.
    watcher.client().set_header(103);
    let events = watcher.poll(&Subscription::NewBlocks, &mut cursor).await.unwrap();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], ChainEvent::NewBlock { height: 103, .. }));
    assert_eq!(cursor.last_height, Some(103));
}

#[tokio::test]
async fn height_query_failure_leaves_cursor_untouched() {
    let ledger = MockLedger::new();
    ledger.fail_height("daemon unreachable");
    let watcher = Watcher::new(ledger);
    let mut cursor = Cursor::new();
    cursor.last_height = Some(100);

    let err = watcher
        .poll(&Subscription::NewBlocks, &mut cursor)
        .await
        .unwrap_err();

    assert!(matches!(err, WatchError::Transport(_)));
    assert_eq!(cursor.last_height, Some(100));
}

// ---------------------------------------------------------------------
// Transfer detection
// ---------------------------------------------------------------------

#[tokio::test]
async fn transfers_reported_once_across_repeated_polls() {
    let ledger = MockLedger::new();
    ledger.set_batch(TransferBatch {
        incoming: vec![transfer("tx1", 2_000_000_000_000, 3)],
        ..TransferBatch::default()
    });
    let watcher = Watcher::new(ledger);
    let mut cursor = Cursor::new();
    let sub = incoming_sub(0);

    let events = watcher.poll(&sub, &mut cursor).await.unwrap();
    assert_eq!(events.len(), 1);
    match &events[0] {
        ChainEvent::TransferDetected {
            txid,
            amount,
            direction,
            ..
        } => {
            assert_eq!(txid, "tx1");
            assert_eq!(amount, "2.000000000000");
            assert_eq!(*direction, TransferDirection::Incoming);
        }
        other => panic!("unexpected event {other:?}"),
    }

    // Remote data unchanged: nothing new to report.
    let events = watcher.poll(&sub, &mut cursor).await.unwrap();
    assert!(events.is_empty());
    let events = watcher.poll(&sub, &mut cursor).await.unwrap();
    assert!(events.is_empty());
}

#[tokio::test]
async fn below_threshold_transfer_suppressed_permanently() {
    let ledger = MockLedger::new();
    ledger.set_batch(TransferBatch {
        incoming: vec![transfer("small", 400_000_000_000, 1)],
        ..TransferBatch::default()
    });
    let watcher = Watcher::new(ledger);
    let mut cursor = Cursor::new();
    let sub = incoming_sub(500_000_000_000); // 0.5 XMR

    let events = watcher.poll(&sub, &mut cursor).await.unwrap();
    assert!(events.is_empty());
    // The id is recorded anyway, so it is not re-evaluated later.
    assert!(cursor.has_seen("small"));

    let events = watcher.poll(&sub, &mut cursor).await.unwrap();
    assert!(events.is_empty());
}

#[tokio::test]
async fn threshold_boundary_is_inclusive() {
    let ledger = MockLedger::new();
    ledger.set_batch(TransferBatch {
        incoming: vec![transfer("exact", 500_000_000_000, 1)],
        ..TransferBatch::default()
    });
    let watcher = Watcher::new(ledger);
    let mut cursor = Cursor::new();

    let events = watcher
        .poll(&incoming_sub(500_000_000_000), &mut cursor)
        .await
        .unwrap();
    assert_eq!(events.len(), 1);
}

#[tokio::test]
async fn seen_window_never_exceeds_capacity() {
    let ledger = MockLedger::new();
    let incoming: Vec<Transfer> = (0..150)
        .map(|i| transfer(&format!("tx{i}"), 1_000_000_000_000, 1))
        .collect();
    ledger.set_batch(TransferBatch {
        incoming,
        ..TransferBatch::default()
    });
    let watcher = Watcher::new(ledger);
    let mut cursor = Cursor::new();

    let events = watcher.poll(&incoming_sub(0), &mut cursor).await.unwrap();

    assert_eq!(events.len(), 150);
    assert_eq!(cursor.seen_txids.len(), SEEN_TXID_CAPACITY);
}

#[tokio::test]
async fn outgoing_subscription_reads_outgoing_side() {
    let ledger = MockLedger::new();
    ledger.set_batch(TransferBatch {
        incoming: vec![transfer("in1", 1_000_000_000_000, 1)],
        outgoing: vec![transfer("out1", 3_000_000_000_000, 1)],
        ..TransferBatch::default()
    });
    let watcher = Watcher::new(ledger);
    let mut cursor = Cursor::new();

    let events = watcher
        .poll(
            &Subscription::OutgoingTransfers {
                account_index: 0,
                min_amount: Piconero::ZERO,
            },
            &mut cursor,
        )
        .await
        .unwrap();

    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        ChainEvent::TransferDetected { txid, direction: TransferDirection::Outgoing, .. }
            if txid == "out1"
    ));
}

#[tokio::test]
async fn transfer_listing_failure_leaves_cursor_untouched() {
    let ledger = MockLedger::new();
    ledger.fail_batch("wallet offline");
    let watcher = Watcher::new(ledger);
    let mut cursor = Cursor::new();
    cursor.record_txid("prior".into());
    let before = cursor.clone();

    let err = watcher.poll(&incoming_sub(0), &mut cursor).await.unwrap_err();

    assert!(matches!(err, WatchError::Transport(_)));
    assert_eq!(cursor, before);
}

// ---------------------------------------------------------------------
// Balance-change detection
// ---------------------------------------------------------------------

#[tokio::test]
async fn first_balance_poll_stores_snapshot_silently() {
    let ledger = MockLedger::new();
    ledger.set_balance(5_000_000_000_000, 4_000_000_000_000);
    let watcher = Watcher::new(ledger);
    let mut cursor = Cursor::new();
    let sub = Subscription::BalanceChanges {
        account_index: 0,
        min_amount: Piconero::ZERO,
    };

    let events = watcher.poll(&sub, &mut cursor).await.unwrap();

    assert!(events.is_empty());
    assert_eq!(cursor.last_balance, Some(Piconero(5_000_000_000_000)));
    assert_eq!(cursor.last_unlocked, Some(Piconero(4_000_000_000_000)));
}

#[tokio::test]
async fn balance_delta_emits_with_direction_and_signed_change() {
    let ledger = MockLedger::new();
    ledger.set_balance(5_000_000_000_000, 4_000_000_000_000);
    let watcher = Watcher::new(ledger);
    let mut cursor = Cursor::new();
    let sub = Subscription::BalanceChanges {
        account_index: 0,
        min_amount: Piconero::ZERO,
    };
    watcher.poll(&sub, &mut cursor).await.unwrap();

    // Balance drops by 1.5 XMR.
    watcher.client().set_balance(3_500_000_000_000, 3_000_000_000_000);
    let events = watcher.poll(&sub, &mut cursor).await.unwrap();

    assert_eq!(events.len(), 1);
    match &events[0] {
        ChainEvent::BalanceChanged {
            previous_balance,
            current_balance,
            change,
            unlocked_change,
            direction,
            ..
        } => {
            assert_eq!(previous_balance, "5.000000000000");
            assert_eq!(current_balance, "3.500000000000");
            assert_eq!(change, "-1.500000000000");
            assert_eq!(unlocked_change, "-1.000000000000");
            assert_eq!(
                *direction,
                watcher_core::BalanceDirection::Decreased
            );
        }
        other => panic!("unexpected event {other:?}"),
    }
    // Snapshot refreshed regardless.
    assert_eq!(cursor.last_balance, Some(Piconero(3_500_000_000_000)));
}

#[tokio::test]
async fn below_threshold_delta_refreshes_snapshot_without_event() {
    let ledger = MockLedger::new();
    ledger.set_balance(1_000_000_000_000, 1_000_000_000_000);
    let watcher = Watcher::new(ledger);
    let mut cursor = Cursor::new();
    let sub = Subscription::BalanceChanges {
        account_index: 0,
        min_amount: Piconero(1_000_000_000_000), // 1 XMR
    };
    watcher.poll(&sub, &mut cursor).await.unwrap();

    // +0.2 XMR, below the 1 XMR threshold.
    watcher.client().set_balance(1_200_000_000_000, 1_200_000_000_000);
    let events = watcher.poll(&sub, &mut cursor).await.unwrap();
    assert!(events.is_empty());
    assert_eq!(cursor.last_balance, Some(Piconero(1_200_000_000_000)));

    // +1 XMR against the refreshed snapshot: exactly one event.
    watcher.client().set_balance(2_200_000_000_000, 2_200_000_000_000);
    let events = watcher.poll(&sub, &mut cursor).await.unwrap();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        ChainEvent::BalanceChanged {
            direction: watcher_core::BalanceDirection::Increased,
            ..
        }
    ));
}

#[tokio::test]
async fn unchanged_balance_emits_nothing() {
    let ledger = MockLedger::new();
    ledger.set_balance(1_000_000_000_000, 1_000_000_000_000);
    let watcher = Watcher::new(ledger);
    let mut cursor = Cursor::new();
    let sub = Subscription::BalanceChanges {
        account_index: 0,
        min_amount: Piconero::ZERO,
    };
    watcher.poll(&sub, &mut cursor).await.unwrap();

    let events = watcher.poll(&sub, &mut cursor).await.unwrap();
    assert!(events.is_empty());
}

// ---------------------------------------------------------------------
// Confirmation milestones
// ---------------------------------------------------------------------

#[tokio::test]
async fn confirmation_tracked_then_reported_exactly_once() {
    let ledger = MockLedger::new();
    ledger.set_batch(TransferBatch {
        incoming: vec![transfer("tx1", 1_000_000_000_000, 2)],
        ..TransferBatch::default()
    });
    ledger.set_transfer(transfer("tx1", 1_000_000_000_000, 2));
    let watcher = Watcher::new(ledger);
    let mut cursor = Cursor::new();
    let sub = Subscription::Confirmations {
        required_confirmations: 10,
    };

    // Poll 1: admitted, nothing confirmed yet.
    let events = watcher.poll(&sub, &mut cursor).await.unwrap();
    assert!(events.is_empty());
    assert!(cursor.is_tracking("tx1"));

    // Poll 2: still below threshold, stays pending.
    watcher.client().set_transfer(transfer("tx1", 1_000_000_000_000, 7));
    let events = watcher.poll(&sub, &mut cursor).await.unwrap();
    assert!(events.is_empty());
    assert!(cursor.is_tracking("tx1"));

    // Poll 3: crossed the threshold; reported and dropped.
    watcher.client().set_transfer(transfer("tx1", 1_000_000_000_000, 10));
    watcher.client().set_batch(TransferBatch {
        incoming: vec![transfer("tx1", 1_000_000_000_000, 10)],
        ..TransferBatch::default()
    });
    let events = watcher.poll(&sub, &mut cursor).await.unwrap();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        ChainEvent::TransferConfirmed { txid, confirmations: 10, .. } if txid == "tx1"
    ));
    assert!(!cursor.is_tracking("tx1"));

    // Poll 4: still listed with >= required confirmations, never
    // re-admitted, never re-reported.
    let events = watcher.poll(&sub, &mut cursor).await.unwrap();
    assert!(events.is_empty());
    assert!(!cursor.is_tracking("tx1"));
}

#[tokio::test]
async fn requery_failure_keeps_entry_pending() {
    let ledger = MockLedger::new();
    ledger.set_batch(TransferBatch::default());
    ledger.drop_transfer("ghost");
    let watcher = Watcher::new(ledger);
    let mut cursor = Cursor::new();
    cursor.pending_confirmations.push(watcher_core::PendingConfirmation {
        txid: "ghost".into(),
        target_confirmations: 10,
    });
    let sub = Subscription::Confirmations {
        required_confirmations: 10,
    };

    let events = watcher.poll(&sub, &mut cursor).await.unwrap();

    assert!(events.is_empty());
    assert!(cursor.is_tracking("ghost"));

    // Once resolvable and confirmed, it is reported.
    watcher.client().set_transfer(transfer("ghost", 1_000_000_000_000, 12));
    let events = watcher.poll(&sub, &mut cursor).await.unwrap();
    assert_eq!(events.len(), 1);
    assert!(!cursor.is_tracking("ghost"));
}

#[tokio::test]
async fn admit_listing_failure_preserves_phase_one_progress() {
    let ledger = MockLedger::new();
    ledger.set_transfer(transfer("done", 1_000_000_000_000, 15));
    ledger.fail_batch("wallet offline");
    let watcher = Watcher::new(ledger);
    let mut cursor = Cursor::new();
    cursor.pending_confirmations.push(watcher_core::PendingConfirmation {
        txid: "done".into(),
        target_confirmations: 10,
    });
    let sub = Subscription::Confirmations {
        required_confirmations: 10,
    };

    // Phase 1 confirmed the transfer; the phase-2 listing failure must
    // not roll that back or swallow the event.
    let events = watcher.poll(&sub, &mut cursor).await.unwrap();
    assert_eq!(events.len(), 1);
    assert!(!cursor.is_tracking("done"));
}
