// Configuration for the Chain Watcher service

use monero_rpc::RpcError;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use watcher_core::{Piconero, Subscription};

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub nats_url: String,
    pub cursor_dir: PathBuf,
    /// Six-field cron expression understood by tokio-cron-scheduler.
    pub poll_schedule: String,
    pub subscriptions: Vec<NamedSubscription>,
}

/// One watched subscription with the NATS subject suffix it feeds.
#[derive(Debug, Clone)]
pub struct NamedSubscription {
    pub name: String,
    pub subscription: Subscription,
}

/// Wire shape of one `WATCH_SUBSCRIPTIONS` entry. Amounts arrive as
/// XMR strings and are converted to piconero exactly.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionConfig {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub account_index: u32,
    #[serde(default)]
    pub min_amount_xmr: Option<String>,
    #[serde(default)]
    pub required_confirmations: Option<u64>,
}

impl SubscriptionConfig {
    fn min_amount(&self) -> Result<Piconero, RpcError> {
        match &self.min_amount_xmr {
            Some(raw) => Ok(Piconero::from_xmr(raw)?),
            None => Ok(Piconero::ZERO),
        }
    }

    pub fn into_named(self) -> Result<NamedSubscription, RpcError> {
        let min_amount = self.min_amount()?;
        let subscription = match self.kind.as_str() {
            "new_blocks" => Subscription::NewBlocks,
            "incoming_transfers" => Subscription::IncomingTransfers {
                account_index: self.account_index,
                min_amount,
            },
            "outgoing_transfers" => Subscription::OutgoingTransfers {
                account_index: self.account_index,
                min_amount,
            },
            "balance_changes" => Subscription::BalanceChanges {
                account_index: self.account_index,
                min_amount,
            },
            "confirmations" => Subscription::Confirmations {
                required_confirmations: self.required_confirmations.unwrap_or(10),
            },
            other => {
                return Err(RpcError::Config(format!(
                    "unknown subscription kind: {other}"
                )))
            }
        };
        Ok(NamedSubscription {
            name: self.name,
            subscription,
        })
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let server_port = env::var("CHAIN_WATCHER_PORT")
            .unwrap_or_else(|_| "8095".to_string())
            .parse()
            .expect("CHAIN_WATCHER_PORT must be a valid port number");

        let nats_url = env::var("NATS_URL")
            .unwrap_or_else(|_| "nats://localhost:4222".to_string());

        let cursor_dir = env::var("CURSOR_DIR")
            .unwrap_or_else(|_| "./cursors".to_string())
            .into();

        // Every 30 seconds by default; one poll per block target is
        // plenty on mainnet.
        let poll_schedule = env::var("POLL_SCHEDULE")
            .unwrap_or_else(|_| "*/30 * * * * *".to_string());

        let subscriptions = Self::load_subscriptions();

        Self {
            server_port,
            nats_url,
            cursor_dir,
            poll_schedule,
            subscriptions,
        }
    }

    fn load_subscriptions() -> Vec<NamedSubscription> {
        // Load from environment variable (JSON array)
        // Example: WATCH_SUBSCRIPTIONS='[{"name":"deposits","kind":"incoming_transfers","account_index":0,"min_amount_xmr":"0.01"}]'

        let subscriptions_json = env::var("WATCH_SUBSCRIPTIONS").unwrap_or_else(|_| {
            // Default configuration for development
            r#"[
                {
                    "name": "blocks",
                    "kind": "new_blocks"
                },
                {
                    "name": "deposits",
                    "kind": "incoming_transfers",
                    "account_index": 0
                },
                {
                    "name": "confirmed",
                    "kind": "confirmations",
                    "required_confirmations": 10
                }
            ]"#
            .to_string()
        });

        let configs: Vec<SubscriptionConfig> = serde_json::from_str(&subscriptions_json)
            .expect("Failed to parse WATCH_SUBSCRIPTIONS JSON");

        configs
            .into_iter()
            .map(|config| {
                config
                    .into_named()
                    .expect("Invalid WATCH_SUBSCRIPTIONS entry")
            })
            .collect()
    }
}
