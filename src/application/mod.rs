//! Application layer - The port ledger and its background refresher.

mod port_ledger;
mod snapshot_refresher;

pub use port_ledger::PortLedger;
pub use snapshot_refresher::{SnapshotRefresher, SnapshotRefresherConfig};
