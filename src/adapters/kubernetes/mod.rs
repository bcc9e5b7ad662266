//! Cluster inventory adapters.
//!
//! Implementations of the ServiceInventory port.
//!
//! - `KubernetesServiceInventory` - reads `/api/v1/services` from the API server
//! - `StaticServiceInventory` - settable inventory for tests and local runs

mod api_inventory;
mod static_inventory;

pub use api_inventory::{KubernetesConfig, KubernetesServiceInventory};
pub use static_inventory::StaticServiceInventory;
