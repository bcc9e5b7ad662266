//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `storage` - Reservation table implementations (JSON file, in-memory)
//! - `kubernetes` - Service inventory implementations (API server, static)
//! - `http` - REST API exposing the ledger

pub mod http;
pub mod kubernetes;
pub mod storage;

pub use kubernetes::{KubernetesConfig, KubernetesServiceInventory, StaticServiceInventory};
pub use storage::{InMemoryReservationTable, JsonFileReservationTable};
