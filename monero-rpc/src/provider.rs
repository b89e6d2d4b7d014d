//! [`LedgerClient`] implementation backed by the daemon and wallet
//! RPC endpoints.

use crate::daemon::DaemonRpc;
use crate::error::RpcError;
use crate::wallet::{GetTransfersParams, WalletRpc, WalletTransfer};
use async_trait::async_trait;
use watcher_core::{
    AccountBalance, BlockHeader, ClientError, LedgerClient, Transfer, TransferBatch, TransferQuery,
};

/// Read-only ledger view over one daemon and one wallet endpoint.
#[derive(Debug)]
pub struct RpcLedger {
    daemon: DaemonRpc,
    wallet: WalletRpc,
}

impl RpcLedger {
    pub fn new(daemon: DaemonRpc, wallet: WalletRpc) -> Self {
        Self { daemon, wallet }
    }

    pub fn daemon(&self) -> &DaemonRpc {
        &self.daemon
    }

    pub fn wallet(&self) -> &WalletRpc {
        &self.wallet
    }
}

fn transport(err: RpcError) -> ClientError {
    ClientError::Transport(err.to_string())
}

fn to_core_transfer(tx: WalletTransfer) -> Transfer {
    Transfer {
        txid: tx.txid,
        amount: tx.amount,
        fee: tx.fee,
        address: tx.address,
        height: tx.height,
        timestamp: tx.timestamp,
        confirmations: tx.confirmations,
    }
}

#[async_trait]
impl LedgerClient for RpcLedger {
    async fn chain_height(&self) -> Result<u64, ClientError> {
        let count = self.daemon.get_block_count().await.map_err(transport)?;
        Ok(count.count)
    }

    async fn block_header(&self, height: u64) -> Result<BlockHeader, ClientError> {
        let header = self
            .daemon
            .get_block_header_by_height(height)
            .await
            .map_err(transport)?;
        Ok(BlockHeader {
            height: header.height,
            hash: header.hash,
            timestamp: header.timestamp,
            difficulty: header.difficulty,
            reward: header.reward,
            num_txes: header.num_txes,
        })
    }

    async fn transfers(&self, query: TransferQuery) -> Result<TransferBatch, ClientError> {
        let result = self
            .wallet
            .get_transfers(GetTransfersParams {
                incoming: query.incoming,
                outgoing: query.outgoing,
                pending: query.pending,
                failed: false,
                pool: query.pool,
                account_index: query.account_index,
            })
            .await
            .map_err(transport)?;
        Ok(TransferBatch {
            incoming: result.incoming.into_iter().map(to_core_transfer).collect(),
            outgoing: result.outgoing.into_iter().map(to_core_transfer).collect(),
            pending: result.pending.into_iter().map(to_core_transfer).collect(),
            pool: result.pool.into_iter().map(to_core_transfer).collect(),
        })
    }

    async fn balance(&self, account_index: u32) -> Result<AccountBalance, ClientError> {
        let result = self
            .wallet
            .get_balance(Some(account_index))
            .await
            .map_err(transport)?;
        Ok(AccountBalance {
            balance: result.balance,
            unlocked_balance: result.unlocked_balance,
        })
    }

    async fn transfer_by_id(&self, txid: &str) -> Result<Transfer, ClientError> {
        match self.wallet.get_transfer_by_txid(txid).await {
            Ok(result) => Ok(to_core_transfer(result.transfer)),
            // The wallet answers an unknown txid with an RPC error
            // object, not an HTTP failure.
            Err(RpcError::Rpc { message, .. }) => Err(ClientError::NotFound(format!(
                "{txid}: {message}"
            ))),
            Err(err) => Err(transport(err)),
        }
    }
}
