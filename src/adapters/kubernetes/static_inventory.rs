//! Static Service Inventory for testing.
//!
//! Returns whatever services were last set, with error injection and
//! simulated latency so refresher failure and timeout paths can be driven
//! without a cluster.
//!
//! # Example
//!
//! ```ignore
//! let inventory = StaticServiceInventory::new();
//! inventory.set_services(vec![web_service]).await;
//! inventory.set_failing(true);
//! ```

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::sleep;

use crate::domain::allocation::ClusterService;
use crate::ports::{InventoryError, ServiceInventory};

/// Settable in-memory service inventory.
#[derive(Debug, Clone, Default)]
pub struct StaticServiceInventory {
    services: Arc<RwLock<Vec<ClusterService>>>,
    failing: Arc<AtomicBool>,
    delay: Arc<RwLock<Duration>>,
    calls: Arc<AtomicUsize>,
}

impl StaticServiceInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_services(services: Vec<ClusterService>) -> Self {
        Self {
            services: Arc::new(RwLock::new(services)),
            ..Self::default()
        }
    }

    /// Replace the services returned by the next calls.
    pub async fn set_services(&self, services: Vec<ClusterService>) {
        *self.services.write().await = services;
    }

    /// Make calls fail with a request error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Delay every call by `delay` before answering.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = delay;
    }

    /// Number of `list_services` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ServiceInventory for StaticServiceInventory {
    async fn list_services(&self) -> Result<Vec<ClusterService>, InventoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.read().await;
        if !delay.is_zero() {
            sleep(delay).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(InventoryError::Request("simulated outage".to_string()));
        }
        Ok(self.services.read().await.clone())
    }
}
