//! Typed client for the Monero wallet (`monero-wallet-rpc`) endpoint.

use crate::error::Result;
use crate::jsonrpc::{JsonRpcClient, RpcAuth};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use watcher_core::Piconero;

// Wallet calls can block on refresh; allow more than the daemon.
const WALLET_TIMEOUT: Duration = Duration::from_secs(60);

/// `get_balance` result.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BalanceResult {
    pub balance: Piconero,
    pub unlocked_balance: Piconero,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubaddressInfo {
    pub address: String,
    pub address_index: u32,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub used: bool,
}

/// `get_address` result.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressResult {
    pub address: String,
    #[serde(default)]
    pub addresses: Vec<SubaddressInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WalletHeightResult {
    pub height: u64,
}

/// A transfer entry as the wallet lists it.
#[derive(Debug, Clone, Deserialize)]
pub struct WalletTransfer {
    pub txid: String,
    #[serde(default)]
    pub amount: Piconero,
    #[serde(default)]
    pub fee: Piconero,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub height: u64,
    #[serde(default)]
    pub timestamp: u64,
    #[serde(default)]
    pub confirmations: u64,
}

/// `get_transfers` parameters. Field names match the RPC wire format.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct GetTransfersParams {
    #[serde(rename = "in")]
    pub incoming: bool,
    #[serde(rename = "out")]
    pub outgoing: bool,
    pub pending: bool,
    pub failed: bool,
    pub pool: bool,
    pub account_index: u32,
}

/// `get_transfers` result; absent groups decode as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransfersResult {
    #[serde(default, rename = "in")]
    pub incoming: Vec<WalletTransfer>,
    #[serde(default, rename = "out")]
    pub outgoing: Vec<WalletTransfer>,
    #[serde(default)]
    pub pending: Vec<WalletTransfer>,
    #[serde(default)]
    pub failed: Vec<WalletTransfer>,
    #[serde(default)]
    pub pool: Vec<WalletTransfer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransferByTxidResult {
    pub transfer: WalletTransfer,
}

/// One destination of an outgoing transfer, amount in piconero.
#[derive(Debug, Clone, Serialize)]
pub struct TransferDestination {
    pub amount: u64,
    pub address: String,
}

/// `transfer` parameters.
#[derive(Debug, Clone, Serialize)]
pub struct TransferParams {
    pub destinations: Vec<TransferDestination>,
    pub account_index: u32,
    pub priority: u8,
    pub ring_size: u32,
    pub get_tx_key: bool,
}

/// `transfer` result.
#[derive(Debug, Clone, Deserialize)]
pub struct TransferResult {
    pub tx_hash: String,
    #[serde(default)]
    pub tx_key: String,
    #[serde(default)]
    pub amount: Piconero,
    #[serde(default)]
    pub fee: Piconero,
}

/// `sweep_all` parameters.
#[derive(Debug, Clone, Serialize)]
pub struct SweepAllParams {
    pub address: String,
    pub account_index: u32,
    pub priority: u8,
    pub ring_size: u32,
    pub get_tx_keys: bool,
}

/// `sweep_all` result.
#[derive(Debug, Clone, Deserialize)]
pub struct SweepAllResult {
    #[serde(default)]
    pub tx_hash_list: Vec<String>,
    #[serde(default)]
    pub amount_list: Vec<Piconero>,
    #[serde(default)]
    pub fee_list: Vec<Piconero>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubaddressAccount {
    pub account_index: u32,
    pub base_address: String,
    pub balance: Piconero,
    pub unlocked_balance: Piconero,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub tag: String,
}

/// `get_accounts` result.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountsResult {
    #[serde(default)]
    pub subaddress_accounts: Vec<SubaddressAccount>,
    #[serde(default)]
    pub total_balance: Piconero,
    #[serde(default)]
    pub total_unlocked_balance: Piconero,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccountResult {
    pub account_index: u32,
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAddressResult {
    pub address: String,
    pub address_index: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResult {
    #[serde(default)]
    pub blocks_fetched: u64,
    #[serde(default)]
    pub received_money: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RestoreResult {
    pub address: String,
    #[serde(default)]
    pub info: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidateAddressResult {
    pub valid: bool,
    #[serde(default)]
    pub integrated: bool,
    #[serde(default)]
    pub subaddress: bool,
    #[serde(default)]
    pub nettype: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MakeUriResult {
    pub uri: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParsedUri {
    pub address: String,
    #[serde(default)]
    pub amount: Piconero,
    #[serde(default)]
    pub payment_id: String,
    #[serde(default)]
    pub recipient_name: String,
    #[serde(default)]
    pub tx_description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParseUriResult {
    pub uri: ParsedUri,
}

/// Wallet RPC client.
#[derive(Debug)]
pub struct WalletRpc {
    rpc: JsonRpcClient,
}

impl WalletRpc {
    /// Connect description for a wallet endpoint.
    pub fn new(base_url: impl Into<String>, auth: Option<RpcAuth>) -> Result<Self> {
        Ok(Self {
            rpc: JsonRpcClient::new(base_url, auth, WALLET_TIMEOUT)?,
        })
    }

    pub async fn get_balance(&self, account_index: Option<u32>) -> Result<BalanceResult> {
        let params = account_index.map(|idx| json!({ "account_index": idx }));
        self.rpc.call("get_balance", params).await
    }

    pub async fn get_address(&self, account_index: Option<u32>) -> Result<AddressResult> {
        let params = account_index.map(|idx| json!({ "account_index": idx }));
        self.rpc.call("get_address", params).await
    }

    pub async fn get_height(&self) -> Result<WalletHeightResult> {
        self.rpc.call("get_height", None).await
    }

    pub async fn create_wallet(
        &self,
        filename: &str,
        password: &str,
        language: &str,
    ) -> Result<serde_json::Value> {
        self.rpc
            .call(
                "create_wallet",
                Some(json!({ "filename": filename, "password": password, "language": language })),
            )
            .await
    }

    pub async fn open_wallet(&self, filename: &str, password: &str) -> Result<serde_json::Value> {
        self.rpc
            .call("open_wallet", Some(json!({ "filename": filename, "password": password })))
            .await
    }

    pub async fn close_wallet(&self) -> Result<serde_json::Value> {
        self.rpc.call("close_wallet", None).await
    }

    pub async fn restore_deterministic_wallet(
        &self,
        filename: &str,
        password: &str,
        seed: &str,
        restore_height: u64,
        language: &str,
    ) -> Result<RestoreResult> {
        self.rpc
            .call(
                "restore_deterministic_wallet",
                Some(json!({
                    "filename": filename,
                    "password": password,
                    "seed": seed,
                    "restore_height": restore_height,
                    "language": language,
                })),
            )
            .await
    }

    pub async fn refresh(&self) -> Result<RefreshResult> {
        self.rpc.call("refresh", None).await
    }

    pub async fn get_accounts(&self) -> Result<AccountsResult> {
        self.rpc.call("get_accounts", None).await
    }

    pub async fn create_account(&self, label: &str) -> Result<CreateAccountResult> {
        self.rpc.call("create_account", Some(json!({ "label": label }))).await
    }

    pub async fn create_address(
        &self,
        account_index: u32,
        label: &str,
    ) -> Result<CreateAddressResult> {
        self.rpc
            .call(
                "create_address",
                Some(json!({ "account_index": account_index, "label": label })),
            )
            .await
    }

    pub async fn transfer(&self, params: TransferParams) -> Result<TransferResult> {
        self.rpc
            .call("transfer", Some(serde_json::to_value(params).expect("serialization cannot fail")))
            .await
    }

    pub async fn sweep_all(&self, params: SweepAllParams) -> Result<SweepAllResult> {
        self.rpc
            .call("sweep_all", Some(serde_json::to_value(params).expect("serialization cannot fail")))
            .await
    }

    pub async fn get_transfers(&self, params: GetTransfersParams) -> Result<TransfersResult> {
        self.rpc
            .call(
                "get_transfers",
                Some(serde_json::to_value(params).expect("serialization cannot fail")),
            )
            .await
    }

    pub async fn get_transfer_by_txid(&self, txid: &str) -> Result<TransferByTxidResult> {
        self.rpc
            .call("get_transfer_by_txid", Some(json!({ "txid": txid })))
            .await
    }

    pub async fn validate_address(&self, address: &str) -> Result<ValidateAddressResult> {
        self.rpc
            .call("validate_address", Some(json!({ "address": address })))
            .await
    }

    pub async fn make_uri(
        &self,
        address: &str,
        amount: Option<Piconero>,
    ) -> Result<MakeUriResult> {
        let params = match amount {
            Some(amount) => json!({ "address": address, "amount": amount }),
            None => json!({ "address": address }),
        };
        self.rpc.call("make_uri", Some(params)).await
    }

    pub async fn parse_uri(&self, uri: &str) -> Result<ParseUriResult> {
        self.rpc.call("parse_uri", Some(json!({ "uri": uri }))).await
    }
}
