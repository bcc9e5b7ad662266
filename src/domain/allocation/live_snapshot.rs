//! Ports currently held by running cluster services.
//!
//! A snapshot is built once per refresh cycle and never mutated; the
//! ledger swaps whole snapshots rather than editing entries.

use std::collections::HashMap;

use crate::domain::foundation::Timestamp;

use super::cluster_service::ClusterService;
use super::port_record::PortRecord;

/// Immutable port → live record map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveSnapshot {
    ports: HashMap<u16, PortRecord>,
}

impl LiveSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, port: u16) -> Option<&PortRecord> {
        self.ports.get(&port)
    }

    pub fn contains(&self, port: u16) -> bool {
        self.ports.contains_key(&port)
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}

/// Builds a fresh snapshot from a full service inventory.
///
/// Only node-exposed and load-balanced services contribute. When two
/// services claim the same node port in one inventory, the one listed
/// last wins.
pub fn build_live_snapshot(services: &[ClusterService], observed_at: Timestamp) -> LiveSnapshot {
    let mut ports = HashMap::new();
    for service in services {
        for port in service.exposed_node_ports() {
            ports.insert(
                port,
                PortRecord::live(port, &service.namespace, &service.name, observed_at),
            );
        }
    }
    LiveSnapshot { ports }
}
