//! Node port range configuration

use serde::Deserialize;

use crate::domain::allocation::{PortRange, DEFAULT_MAX_PORT, DEFAULT_MIN_PORT};

use super::error::ValidationError;

/// Bounds of the node port range, both inclusive
#[derive(Debug, Clone, Deserialize)]
pub struct PortsConfig {
    #[serde(default = "default_min_port")]
    pub min_port: u16,

    #[serde(default = "default_max_port")]
    pub max_port: u16,
}

impl PortsConfig {
    /// Build the validated range
    pub fn range(&self) -> Result<PortRange, ValidationError> {
        Ok(PortRange::new(self.min_port, self.max_port)?)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.range().map(|_| ())
    }
}

impl Default for PortsConfig {
    fn default() -> Self {
        Self {
            min_port: default_min_port(),
            max_port: default_max_port(),
        }
    }
}

fn default_min_port() -> u16 {
    DEFAULT_MIN_PORT
}

fn default_max_port() -> u16 {
    DEFAULT_MAX_PORT
}
