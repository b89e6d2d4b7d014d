// Core polling service: drives the watcher over every configured
// subscription and publishes detected events to NATS.

use crate::config::{Config, NamedSubscription};
use crate::store::CursorStore;
use anyhow::{Context, Result};
use async_nats::Client as NatsClient;
use monero_rpc::{RpcConfig, RpcLedger};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use watcher_core::{ChainEvent, Watcher};

#[derive(Clone)]
pub struct ChainWatcherService {
    config: Config,
    watcher: Arc<Watcher<RpcLedger>>,
    nats_client: Arc<NatsClient>,
    store: Arc<CursorStore>,
    // Cron fires on a fixed schedule; a slow RPC round must not let
    // two polls interleave.
    poll_lock: Arc<Mutex<()>>,
}

impl ChainWatcherService {
    pub async fn new(config: Config) -> Result<Self> {
        let rpc_config = RpcConfig::from_env().context("loading RPC configuration")?;
        let ledger = rpc_config.ledger().context("building RPC clients")?;

        let nats_client = Arc::new(
            async_nats::connect(&config.nats_url)
                .await
                .context("connecting to NATS")?,
        );

        let store = Arc::new(CursorStore::new(&config.cursor_dir)?);

        info!(
            "✅ Chain Watcher initialized: {} network, {} subscriptions",
            rpc_config.network,
            config.subscriptions.len()
        );

        Ok(Self {
            config,
            watcher: Arc::new(Watcher::new(ledger)),
            nats_client,
            store,
            poll_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Poll every subscription once, in order. A failure in one
    /// subscription never blocks the others.
    pub async fn poll_all(&self) -> Result<()> {
        let _guard = self.poll_lock.lock().await;

        for (idx, named) in self.config.subscriptions.iter().enumerate() {
            info!(
                "🔍 Polling subscription {}/{}: {}",
                idx + 1,
                self.config.subscriptions.len(),
                named.name
            );
            if let Err(e) = self.poll_one(named).await {
                error!("Failed to poll subscription {}: {:#}", named.name, e);
            }
        }

        Ok(())
    }

    async fn poll_one(&self, named: &NamedSubscription) -> Result<()> {
        let mut cursor = self.store.load(&named.name)?;

        let events = self
            .watcher
            .poll(&named.subscription, &mut cursor)
            .await
            .with_context(|| format!("polling {}", named.name))?;

        // The cursor already reflects everything in `events`, so a
        // crash between save and publish drops the unpublished tail
        // rather than re-delivering it. At-most-once, never duplicates.
        self.store.save(&named.name, &cursor)?;

        if events.is_empty() {
            return Ok(());
        }
        info!("📊 {} event(s) detected on {}", events.len(), named.name);

        for event in &events {
            if let Err(e) = self.publish_event(&named.name, event).await {
                warn!("Failed to publish event on {}: {:#}", named.name, e);
            }
        }

        Ok(())
    }

    async fn publish_event(&self, name: &str, event: &ChainEvent) -> Result<()> {
        let subject = format!("monero.events.{name}");
        let payload = serde_json::to_vec(event)?;
        self.nats_client
            .publish(subject.clone(), payload.into())
            .await
            .with_context(|| format!("publishing to {subject}"))?;
        Ok(())
    }
}
