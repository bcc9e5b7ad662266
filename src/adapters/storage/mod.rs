//! Storage Adapters
//!
//! Implementations of the ReservationTable port.
//!
//! ## Available Adapters
//!
//! - **JsonFileReservationTable** - Stores the table as one JSON file on disk
//! - **InMemoryReservationTable** - Stores the table in memory (testing)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{InMemoryReservationTable, JsonFileReservationTable};
//!
//! // Production: file-based storage
//! let table = JsonFileReservationTable::new("/data/reservations.json");
//!
//! // Testing: in-memory storage
//! let table = InMemoryReservationTable::new();
//! ```

mod in_memory_reservation_table;
mod json_file_reservation_table;

pub use in_memory_reservation_table::InMemoryReservationTable;
pub use json_file_reservation_table::JsonFileReservationTable;
