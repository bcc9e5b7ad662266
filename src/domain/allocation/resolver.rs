//! Precedence rule between the live snapshot and manual reservations.

use super::port_record::{PortRecord, PortStatus};

/// Resolves one port from its two possible sources.
///
/// Live beats manual, manual beats free. A port may sit in both tables
/// for a while (a reserved port that has since been deployed); the live
/// record is the one reported.
pub fn resolve_port(
    port: u16,
    live: Option<&PortRecord>,
    reserved: Option<&PortRecord>,
) -> PortRecord {
    if let Some(record) = live {
        return PortRecord {
            port,
            status: PortStatus::OccupiedLive,
            ..record.clone()
        };
    }
    if let Some(record) = reserved {
        return PortRecord {
            port,
            status: PortStatus::ReservedManual,
            ..record.clone()
        };
    }
    PortRecord::free(port)
}
