//! Reservation Table Port - Durable storage for manual reservations.
//!
//! The table is small and written rarely, so the contract is whole-table:
//! load everything once at startup, replace everything on each mutation.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::allocation::PortRecord;

/// Manual reservations keyed by port.
pub type Reservations = BTreeMap<u16, PortRecord>;

/// Errors that can occur during reservation table operations
#[derive(Debug, thiserror::Error)]
pub enum ReservationTableError {
    #[error("Failed to serialize reservations: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize reservations: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for loading and persisting the reservation table
#[async_trait]
pub trait ReservationTable: Send + Sync {
    /// Load the full table.
    ///
    /// A table that was never written loads as empty.
    ///
    /// # Errors
    /// Returns `ReservationTableError` if stored data exists but cannot be read
    async fn load(&self) -> Result<Reservations, ReservationTableError>;

    /// Replace the stored table with `reservations`.
    ///
    /// Must not return until the write is durable; a failed write leaves
    /// the previously stored table intact.
    ///
    /// # Errors
    /// Returns `ReservationTableError` if the write fails
    async fn save(&self, reservations: &Reservations) -> Result<(), ReservationTableError>;
}
