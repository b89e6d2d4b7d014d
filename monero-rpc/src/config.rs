//! Endpoint configuration loaded from the environment.

use crate::constants::NetworkType;
use crate::daemon::DaemonRpc;
use crate::error::{Result, RpcError};
use crate::jsonrpc::RpcAuth;
use crate::provider::RpcLedger;
use crate::wallet::WalletRpc;
use std::env;

/// Connection settings for one daemon and one wallet endpoint.
#[derive(Debug, Clone)]
pub struct RpcConfig {
    pub network: NetworkType,
    pub daemon_url: String,
    pub daemon_auth: Option<RpcAuth>,
    pub wallet_url: String,
    pub wallet_auth: Option<RpcAuth>,
}

fn auth_from_env(user_var: &str, pass_var: &str) -> Result<Option<RpcAuth>> {
    match (env::var(user_var), env::var(pass_var)) {
        (Ok(username), Ok(password)) => Ok(Some(RpcAuth { username, password })),
        (Err(_), Err(_)) => Ok(None),
        _ => Err(RpcError::Config(format!(
            "{user_var} and {pass_var} must be set together"
        ))),
    }
}

impl RpcConfig {
    /// Read `MONERO_*` variables, falling back to localhost on the
    /// network's default ports.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let network = env::var("MONERO_NETWORK")
            .unwrap_or_else(|_| "mainnet".to_string())
            .parse::<NetworkType>()?;

        let daemon_url = env::var("MONERO_DAEMON_URL").unwrap_or_else(|_| {
            format!("http://127.0.0.1:{}", network.default_daemon_port())
        });
        let wallet_url = env::var("MONERO_WALLET_URL").unwrap_or_else(|_| {
            format!("http://127.0.0.1:{}", network.default_wallet_port())
        });

        Ok(Self {
            network,
            daemon_url,
            daemon_auth: auth_from_env("MONERO_DAEMON_USER", "MONERO_DAEMON_PASSWORD")?,
            wallet_url,
            wallet_auth: auth_from_env("MONERO_WALLET_USER", "MONERO_WALLET_PASSWORD")?,
        })
    }

    pub fn daemon(&self) -> Result<DaemonRpc> {
        DaemonRpc::new(self.daemon_url.clone(), self.daemon_auth.clone())
    }

    pub fn wallet(&self) -> Result<WalletRpc> {
        WalletRpc::new(self.wallet_url.clone(), self.wallet_auth.clone())
    }

    /// Build the combined ledger view used by the watcher.
    pub fn ledger(&self) -> Result<RpcLedger> {
        Ok(RpcLedger::new(self.daemon()?, self.wallet()?))
    }
}
