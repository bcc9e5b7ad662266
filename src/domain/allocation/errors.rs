//! Errors returned by reservation attempts.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::port_record::PortStatus;

/// Which table already owns a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionReason {
    /// A running cluster service exposes the port.
    OccupiedLive,
    /// An operator reserved the port earlier.
    ReservedManual,
}

impl CollisionReason {
    /// Maps a resolved status to the reason a reservation must be refused.
    ///
    /// Returns `None` for free ports.
    pub fn from_status(status: PortStatus) -> Option<Self> {
        match status {
            PortStatus::Free => None,
            PortStatus::OccupiedLive => Some(CollisionReason::OccupiedLive),
            PortStatus::ReservedManual => Some(CollisionReason::ReservedManual),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CollisionReason::OccupiedLive => "occupied_live",
            CollisionReason::ReservedManual => "reserved_manual",
        }
    }
}

impl fmt::Display for CollisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Failure of a reservation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReservationError {
    /// Port lies outside the configured range.
    #[error("port {port} is outside the range {min}-{max}")]
    OutOfRange { port: i64, min: u16, max: u16 },

    /// Port already has a resolved owner.
    #[error("port {port} is {reason} by {current_owner}")]
    Collision {
        port: u16,
        reason: CollisionReason,
        current_owner: String,
    },

    /// The durable write failed; the reservation was not committed.
    #[error("failed to persist reservation table: {0}")]
    Persistence(String),
}
