//! High-level command surface over the daemon and wallet clients.
//!
//! Each [`Command`] is one user-facing operation. Amounts cross this
//! boundary as XMR strings and are converted to piconero exactly;
//! results carry both representations where it helps a reader.

use crate::constants::{FeePriority, NetworkType, CURRENT_RING_SIZE, DUST_THRESHOLD};
use crate::daemon::{DaemonRpc, StartMiningParams};
use crate::error::{Result, RpcError};
use crate::validation::{self, AddressType};
use crate::wallet::{
    GetTransfersParams, SweepAllParams, TransferDestination, TransferParams, WalletRpc,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use watcher_core::Piconero;

/// One operation against the node, grouped the way operators think
/// about them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    // wallet
    WalletBalance { account_index: Option<u32> },
    WalletAddress { account_index: Option<u32> },
    WalletHeight,
    WalletCreate { filename: String, password: String, language: String },
    WalletOpen { filename: String, password: String },
    WalletClose,
    WalletRestore {
        filename: String,
        password: String,
        seed: String,
        restore_height: u64,
        language: String,
    },
    WalletRefresh,

    // accounts
    AccountList,
    AccountCreate { label: String },
    SubaddressCreate { account_index: u32, label: String },

    // transactions
    Transfer {
        address: String,
        amount_xmr: String,
        account_index: u32,
        priority: FeePriority,
    },
    SweepAll { address: String, account_index: u32, priority: FeePriority },
    TransferList { account_index: u32, incoming: bool, outgoing: bool, pending: bool },
    TransferByTxid { txid: String },

    // chain
    BlockCount,
    BlockByHeight { height: u64 },
    LastBlockHeader,

    // daemon
    DaemonInfo,
    DaemonVersion,
    DaemonHeight,
    FeeEstimate,

    // mining
    MiningStatus,
    MiningStart { miner_address: String, threads: u32 },
    MiningStop,

    // utility
    ConvertUnits { amount_xmr: String },
    ValidateAddress { address: String },
    MakeUri { address: String, amount_xmr: Option<String> },
    ParseUri { uri: String },
}

fn parse_xmr(amount: &str) -> Result<Piconero> {
    Ok(Piconero::from_xmr(amount)?)
}

fn transfer_json(tx: &crate::wallet::WalletTransfer) -> Value {
    json!({
        "txid": tx.txid,
        "amount": tx.amount,
        "amount_xmr": tx.amount.to_xmr(),
        "fee": tx.fee,
        "fee_xmr": tx.fee.to_xmr(),
        "address": tx.address,
        "height": tx.height,
        "timestamp": tx.timestamp,
        "confirmations": tx.confirmations,
    })
}

/// Run one command and render its result as JSON.
pub async fn execute(command: Command, daemon: &DaemonRpc, wallet: &WalletRpc) -> Result<Value> {
    match command {
        Command::WalletBalance { account_index } => {
            let balance = wallet.get_balance(account_index).await?;
            Ok(json!({
                "balance": balance.balance,
                "balance_xmr": balance.balance.to_xmr(),
                "unlocked_balance": balance.unlocked_balance,
                "unlocked_balance_xmr": balance.unlocked_balance.to_xmr(),
            }))
        }
        Command::WalletAddress { account_index } => {
            let address = wallet.get_address(account_index).await?;
            Ok(json!({
                "address": address.address,
                "subaddresses": address.addresses.len(),
            }))
        }
        Command::WalletHeight => {
            let height = wallet.get_height().await?;
            Ok(json!({ "height": height.height }))
        }
        Command::WalletCreate { filename, password, language } => {
            wallet.create_wallet(&filename, &password, &language).await?;
            Ok(json!({ "created": filename }))
        }
        Command::WalletOpen { filename, password } => {
            wallet.open_wallet(&filename, &password).await?;
            Ok(json!({ "opened": filename }))
        }
        Command::WalletClose => {
            wallet.close_wallet().await?;
            Ok(json!({ "closed": true }))
        }
        Command::WalletRestore { filename, password, seed, restore_height, language } => {
            let restored = wallet
                .restore_deterministic_wallet(&filename, &password, &seed, restore_height, &language)
                .await?;
            Ok(json!({ "address": restored.address, "info": restored.info }))
        }
        Command::WalletRefresh => {
            let refreshed = wallet.refresh().await?;
            Ok(json!({
                "blocks_fetched": refreshed.blocks_fetched,
                "received_money": refreshed.received_money,
            }))
        }

        Command::AccountList => {
            let accounts = wallet.get_accounts().await?;
            let entries: Vec<Value> = accounts
                .subaddress_accounts
                .iter()
                .map(|account| {
                    json!({
                        "account_index": account.account_index,
                        "base_address": account.base_address,
                        "label": account.label,
                        "balance_xmr": account.balance.to_xmr(),
                        "unlocked_balance_xmr": account.unlocked_balance.to_xmr(),
                    })
                })
                .collect();
            Ok(json!({
                "accounts": entries,
                "total_balance_xmr": accounts.total_balance.to_xmr(),
            }))
        }
        Command::AccountCreate { label } => {
            let created = wallet.create_account(&label).await?;
            Ok(json!({ "account_index": created.account_index, "address": created.address }))
        }
        Command::SubaddressCreate { account_index, label } => {
            let created = wallet.create_address(account_index, &label).await?;
            Ok(json!({ "address": created.address, "address_index": created.address_index }))
        }

        Command::Transfer { address, amount_xmr, account_index, priority } => {
            if !validation::is_valid_address(&address) {
                return Err(RpcError::InvalidInput(format!(
                    "not a valid destination address: {}",
                    validation::mask_key(&address)
                )));
            }
            let amount = parse_xmr(&amount_xmr)?;
            if amount < DUST_THRESHOLD {
                return Err(RpcError::InvalidInput(format!(
                    "amount {amount_xmr} is below the dust threshold of {}",
                    DUST_THRESHOLD.to_xmr()
                )));
            }
            let amount_pico = u64::try_from(amount.0).map_err(|_| {
                RpcError::InvalidInput(format!("amount too large: {amount_xmr}"))
            })?;
            let result = wallet
                .transfer(TransferParams {
                    destinations: vec![TransferDestination { amount: amount_pico, address }],
                    account_index,
                    priority: priority.as_u8(),
                    ring_size: CURRENT_RING_SIZE,
                    get_tx_key: true,
                })
                .await?;
            Ok(json!({
                "tx_hash": result.tx_hash,
                "amount_xmr": result.amount.to_xmr(),
                "fee_xmr": result.fee.to_xmr(),
            }))
        }
        Command::SweepAll { address, account_index, priority } => {
            if !validation::is_valid_address(&address) {
                return Err(RpcError::InvalidInput(format!(
                    "not a valid destination address: {}",
                    validation::mask_key(&address)
                )));
            }
            let result = wallet
                .sweep_all(SweepAllParams {
                    address,
                    account_index,
                    priority: priority.as_u8(),
                    ring_size: CURRENT_RING_SIZE,
                    get_tx_keys: true,
                })
                .await?;
            let swept: Vec<String> =
                result.amount_list.iter().map(|amount| amount.to_xmr()).collect();
            Ok(json!({ "tx_hashes": result.tx_hash_list, "amounts_xmr": swept }))
        }
        Command::TransferList { account_index, incoming, outgoing, pending } => {
            let transfers = wallet
                .get_transfers(GetTransfersParams {
                    incoming,
                    outgoing,
                    pending,
                    failed: false,
                    pool: pending,
                    account_index,
                })
                .await?;
            Ok(json!({
                "incoming": transfers.incoming.iter().map(transfer_json).collect::<Vec<_>>(),
                "outgoing": transfers.outgoing.iter().map(transfer_json).collect::<Vec<_>>(),
                "pending": transfers.pending.iter().map(transfer_json).collect::<Vec<_>>(),
                "pool": transfers.pool.iter().map(transfer_json).collect::<Vec<_>>(),
            }))
        }
        Command::TransferByTxid { txid } => {
            if !validation::is_valid_tx_hash(&txid) {
                return Err(RpcError::InvalidInput(format!("not a valid txid: {txid}")));
            }
            let found = wallet.get_transfer_by_txid(&txid).await?;
            Ok(transfer_json(&found.transfer))
        }

        Command::BlockCount => {
            let count = daemon.get_block_count().await?;
            Ok(json!({ "count": count.count }))
        }
        Command::BlockByHeight { height } => {
            let block = daemon.get_block(height).await?;
            Ok(json!({
                "height": block.block_header.height,
                "hash": block.block_header.hash,
                "timestamp": block.block_header.timestamp,
                "reward_xmr": block.block_header.reward.to_xmr(),
                "tx_hashes": block.tx_hashes,
            }))
        }
        Command::LastBlockHeader => {
            let header = daemon.get_last_block_header().await?;
            Ok(json!({
                "height": header.height,
                "hash": header.hash,
                "timestamp": header.timestamp,
                "difficulty": header.difficulty,
                "reward_xmr": header.reward.to_xmr(),
                "num_txes": header.num_txes,
            }))
        }

        Command::DaemonInfo => daemon.get_info().await,
        Command::DaemonVersion => {
            let version = daemon.get_version().await?;
            Ok(json!({ "version": version.version, "release": version.release }))
        }
        Command::DaemonHeight => {
            let height = daemon.get_height().await?;
            Ok(json!({ "height": height.height }))
        }
        Command::FeeEstimate => {
            let estimate = daemon.get_fee_estimate().await?;
            Ok(json!({
                "fee_per_byte": estimate.fee,
                "fee_per_byte_xmr": estimate.fee.to_xmr(),
            }))
        }

        Command::MiningStatus => daemon.mining_status().await,
        Command::MiningStart { miner_address, threads } => {
            if !validation::is_valid_address(&miner_address) {
                return Err(RpcError::InvalidInput(
                    "not a valid mining address".to_string(),
                ));
            }
            daemon
                .start_mining(StartMiningParams {
                    miner_address,
                    threads_count: threads,
                    do_background_mining: false,
                    ignore_battery: true,
                })
                .await?;
            Ok(json!({ "mining": true }))
        }
        Command::MiningStop => {
            daemon.stop_mining().await?;
            Ok(json!({ "mining": false }))
        }

        Command::ConvertUnits { amount_xmr } => {
            let amount = parse_xmr(&amount_xmr)?;
            Ok(json!({ "xmr": amount.to_xmr(), "piconero": amount }))
        }
        Command::ValidateAddress { address } => {
            let kind = match validation::address_type(&address) {
                AddressType::Standard => "standard",
                AddressType::Integrated => "integrated",
                AddressType::Subaddress => "subaddress",
                AddressType::Unknown => "unknown",
            };
            let network: Option<NetworkType> = validation::address_network(&address);
            Ok(json!({
                "valid": validation::is_valid_address(&address),
                "address_type": kind,
                "network": network,
            }))
        }
        Command::MakeUri { address, amount_xmr } => {
            let amount = match amount_xmr {
                Some(raw) => Some(parse_xmr(&raw)?),
                None => None,
            };
            let made = wallet.make_uri(&address, amount).await?;
            Ok(json!({ "uri": made.uri }))
        }
        Command::ParseUri { uri } => {
            let parsed = wallet.parse_uri(&uri).await?;
            Ok(json!({
                "address": parsed.uri.address,
                "amount": parsed.uri.amount,
                "amount_xmr": parsed.uri.amount.to_xmr(),
                "payment_id": parsed.uri.payment_id,
                "recipient_name": parsed.uri.recipient_name,
                "tx_description": parsed.uri.tx_description,
            }))
        }
    }
}
