//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ReservationTable` - durable whole-table storage of manual reservations
//! - `ServiceInventory` - the cluster's service list, read by the refresher

mod reservation_table;
mod service_inventory;

pub use reservation_table::{ReservationTable, ReservationTableError, Reservations};
pub use service_inventory::{InventoryError, ServiceInventory};
