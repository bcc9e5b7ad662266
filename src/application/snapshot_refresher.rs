//! SnapshotRefresher - Background task keeping the live snapshot current.
//!
//! Each cycle lists every cluster service, builds a brand-new
//! `LiveSnapshot` and swaps it into the ledger. The cluster call runs
//! outside the ledger lock; only the swap takes it.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `poll_interval` | 10s | Delay between cycles, also the retry delay |
//! | `query_timeout` | 5s | Bound on a single inventory query |
//!
//! ## Failure handling
//!
//! A failed or timed-out query skips the cycle. The previous snapshot
//! stays in effect and the next attempt happens one interval later.
//! Failures are logged and never stop the loop.
//!
//! ## Graceful Shutdown
//!
//! `run` returns once the shutdown channel flips to `true` or its sender
//! is dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};

use crate::domain::allocation::build_live_snapshot;
use crate::domain::foundation::Timestamp;
use crate::ports::{InventoryError, ServiceInventory};

use super::PortLedger;

/// Configuration for the SnapshotRefresher.
#[derive(Debug, Clone)]
pub struct SnapshotRefresherConfig {
    /// Delay between refresh cycles.
    pub poll_interval: Duration,

    /// Upper bound on a single inventory query.
    pub query_timeout: Duration,
}

impl Default for SnapshotRefresherConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            query_timeout: Duration::from_secs(5),
        }
    }
}

impl SnapshotRefresherConfig {
    /// Create config with custom poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Create config with custom query timeout.
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }
}

/// Polls the service inventory and feeds the ledger.
pub struct SnapshotRefresher {
    inventory: Arc<dyn ServiceInventory>,
    ledger: Arc<PortLedger>,
    config: SnapshotRefresherConfig,
}

impl SnapshotRefresher {
    /// Create a new refresher with default configuration.
    pub fn new(inventory: Arc<dyn ServiceInventory>, ledger: Arc<PortLedger>) -> Self {
        Self::with_config(inventory, ledger, SnapshotRefresherConfig::default())
    }

    /// Create a new refresher with custom configuration.
    pub fn with_config(
        inventory: Arc<dyn ServiceInventory>,
        ledger: Arc<PortLedger>,
        config: SnapshotRefresherConfig,
    ) -> Self {
        Self {
            inventory,
            ledger,
            config,
        }
    }

    /// Run refresh cycles until shutdown is signalled.
    ///
    /// The first cycle runs immediately.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            poll_interval = ?self.config.poll_interval,
            "Snapshot refresher started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }

                _ = interval.tick() => {
                    match self.refresh_once().await {
                        Ok(count) => {
                            tracing::debug!(ports = count, "Live snapshot refreshed");
                        }
                        Err(e) => {
                            tracing::warn!(
                                error = %e,
                                retry_in = ?self.config.poll_interval,
                                "Refresh cycle failed, keeping previous snapshot"
                            );
                        }
                    }
                }
            }
        }

        tracing::info!("Snapshot refresher stopped");
    }

    /// Run exactly one refresh cycle.
    ///
    /// Returns the number of live ports installed. On error the ledger is
    /// left untouched.
    pub async fn refresh_once(&self) -> Result<usize, InventoryError> {
        let services = time::timeout(self.config.query_timeout, self.inventory.list_services())
            .await
            .map_err(|_| InventoryError::Timeout(self.config.query_timeout))??;

        let snapshot = build_live_snapshot(&services, Timestamp::now());
        let count = snapshot.len();
        self.ledger.replace_live_snapshot(snapshot).await;

        Ok(count)
    }
}
