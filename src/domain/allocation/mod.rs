//! Allocation module - Node port ownership.
//!
//! Vocabulary for the two sources of port ownership (running cluster
//! services and manual reservations) and the rule that merges them.
//!
//! ## Key Types
//!
//! - `PortRecord` / `PortStatus` - one port and its holder
//! - `PortRange` - the inclusive span of ports accounted for
//! - `LiveSnapshot` - ports held by running services, rebuilt per refresh
//! - `ClusterService` - inventory entry the snapshot is built from
//! - `ReservationError` - why a reservation was refused
//!
//! ## Precedence
//!
//! `resolve_port` applies live > manual > free to a single port.

mod cluster_service;
mod errors;
mod live_snapshot;
mod port_range;
mod port_record;
mod resolver;

pub use cluster_service::{ClusterService, ExposureType, ServicePort};
pub use errors::{CollisionReason, ReservationError};
pub use live_snapshot::{build_live_snapshot, LiveSnapshot};
pub use port_range::{PortRange, DEFAULT_MAX_PORT, DEFAULT_MIN_PORT};
pub use port_record::{PortRecord, PortStatus, FREE_OWNER};
pub use resolver::resolve_port;
