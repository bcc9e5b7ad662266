//! Service Inventory Port - The cluster's list of services.

use async_trait::async_trait;

use crate::domain::allocation::ClusterService;

/// Errors from querying the cluster.
///
/// Every variant is treated as transient by the refresher.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("cluster credentials unavailable: {0}")]
    Credentials(String),

    #[error("cluster API request failed: {0}")]
    Request(String),

    #[error("cluster API returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid cluster API response: {0}")]
    InvalidResponse(String),

    #[error("cluster API did not answer within {0:?}")]
    Timeout(std::time::Duration),
}

/// Port for listing every service in the cluster
#[async_trait]
pub trait ServiceInventory: Send + Sync {
    /// List all services across all namespaces, with exposure type and ports.
    async fn list_services(&self) -> Result<Vec<ClusterService>, InventoryError>;
}
