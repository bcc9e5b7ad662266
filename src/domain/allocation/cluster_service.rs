//! Cluster services as reported by the service inventory.

use serde::{Deserialize, Serialize};

/// How a service is exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExposureType {
    ClusterIP,
    NodePort,
    LoadBalancer,
    ExternalName,
    Other(String),
}

impl ExposureType {
    /// Parses the `spec.type` value of a Kubernetes Service.
    ///
    /// An absent type defaults to `ClusterIP`, as on the API server.
    pub fn from_spec_type(value: Option<&str>) -> Self {
        match value {
            None | Some("ClusterIP") => ExposureType::ClusterIP,
            Some("NodePort") => ExposureType::NodePort,
            Some("LoadBalancer") => ExposureType::LoadBalancer,
            Some("ExternalName") => ExposureType::ExternalName,
            Some(other) => ExposureType::Other(other.to_string()),
        }
    }

    /// Whether services of this type bind a port on every node.
    pub fn publishes_node_port(&self) -> bool {
        matches!(self, ExposureType::NodePort | ExposureType::LoadBalancer)
    }
}

/// A single port entry of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePort {
    /// Node port assigned by the cluster; `None` when unset or zero.
    pub node_port: Option<u16>,
}

impl ServicePort {
    pub fn with_node_port(node_port: u16) -> Self {
        Self {
            node_port: Some(node_port).filter(|p| *p != 0),
        }
    }
}

/// A service in the cluster inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterService {
    pub namespace: String,
    pub name: String,
    pub exposure: ExposureType,
    pub ports: Vec<ServicePort>,
}

impl ClusterService {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        exposure: ExposureType,
        ports: Vec<ServicePort>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            exposure,
            ports,
        }
    }

    /// Node ports this service holds on every node.
    pub fn exposed_node_ports(&self) -> impl Iterator<Item = u16> + '_ {
        let publishes = self.exposure.publishes_node_port();
        self.ports
            .iter()
            .filter(move |_| publishes)
            .filter_map(|p| p.node_port)
    }
}
