//! Typed client for the Monero daemon (`monerod`) RPC endpoint.

use crate::error::Result;
use crate::jsonrpc::{JsonRpcClient, RpcAuth};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use watcher_core::Piconero;

const DAEMON_TIMEOUT: Duration = Duration::from_secs(30);

/// `get_block_count` result.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockCount {
    pub count: u64,
    #[serde(default)]
    pub status: String,
}

/// Block header as the daemon reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct DaemonBlockHeader {
    pub height: u64,
    pub hash: String,
    pub timestamp: u64,
    #[serde(default)]
    pub difficulty: u64,
    #[serde(default)]
    pub reward: Piconero,
    #[serde(default)]
    pub num_txes: u64,
}

#[derive(Debug, Deserialize)]
struct BlockHeaderEnvelope {
    block_header: DaemonBlockHeader,
}

/// `get_block` result.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockResult {
    pub block_header: DaemonBlockHeader,
    #[serde(default)]
    pub tx_hashes: Vec<String>,
}

/// `get_version` result.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionInfo {
    pub version: u64,
    #[serde(default)]
    pub release: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeightResponse {
    pub height: u64,
}

/// `get_fee_estimate` result, fee in piconero per byte.
#[derive(Debug, Clone, Deserialize)]
pub struct FeeEstimate {
    pub fee: Piconero,
    #[serde(default)]
    pub quantization_mask: u64,
}

/// `start_mining` parameters.
#[derive(Debug, Clone, Serialize)]
pub struct StartMiningParams {
    pub miner_address: String,
    pub threads_count: u32,
    pub do_background_mining: bool,
    pub ignore_battery: bool,
}

/// Daemon RPC client.
#[derive(Debug)]
pub struct DaemonRpc {
    rpc: JsonRpcClient,
}

impl DaemonRpc {
    /// Connect description for a daemon endpoint.
    pub fn new(base_url: impl Into<String>, auth: Option<RpcAuth>) -> Result<Self> {
        Ok(Self {
            rpc: JsonRpcClient::new(base_url, auth, DAEMON_TIMEOUT)?,
        })
    }

    pub async fn get_block_count(&self) -> Result<BlockCount> {
        self.rpc.call("get_block_count", None).await
    }

    pub async fn get_block_header_by_height(&self, height: u64) -> Result<DaemonBlockHeader> {
        let envelope: BlockHeaderEnvelope = self
            .rpc
            .call("get_block_header_by_height", Some(json!({ "height": height })))
            .await?;
        Ok(envelope.block_header)
    }

    pub async fn get_last_block_header(&self) -> Result<DaemonBlockHeader> {
        let envelope: BlockHeaderEnvelope = self.rpc.call("get_last_block_header", None).await?;
        Ok(envelope.block_header)
    }

    pub async fn get_block(&self, height: u64) -> Result<BlockResult> {
        self.rpc.call("get_block", Some(json!({ "height": height }))).await
    }

    /// Full daemon info blob; shape varies across releases.
    pub async fn get_info(&self) -> Result<serde_json::Value> {
        self.rpc.call("get_info", None).await
    }

    pub async fn get_version(&self) -> Result<VersionInfo> {
        self.rpc.call("get_version", None).await
    }

    /// Plain HTTP endpoint, not JSON-RPC.
    pub async fn get_height(&self) -> Result<HeightResponse> {
        self.rpc.get_plain("/get_height").await
    }

    pub async fn get_fee_estimate(&self) -> Result<FeeEstimate> {
        self.rpc.call("get_fee_estimate", None).await
    }

    pub async fn mining_status(&self) -> Result<serde_json::Value> {
        self.rpc.call("mining_status", None).await
    }

    pub async fn start_mining(&self, params: StartMiningParams) -> Result<serde_json::Value> {
        self.rpc
            .call("start_mining", Some(serde_json::to_value(params).expect("serialization cannot fail")))
            .await
    }

    pub async fn stop_mining(&self) -> Result<serde_json::Value> {
        self.rpc.call("stop_mining", None).await
    }
}
