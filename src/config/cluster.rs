//! Cluster API configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;

/// Cluster API access and refresh cadence
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterConfig {
    /// When false, no refresher runs and the live snapshot stays empty
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// API server URL; derived from the in-cluster environment when unset
    pub api_url: Option<String>,

    /// Service-account token file
    #[serde(default = "default_token_path")]
    pub token_path: PathBuf,

    /// Service-account CA bundle
    #[serde(default = "default_ca_path")]
    pub ca_path: PathBuf,

    /// Seconds between refresh cycles
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Upper bound in seconds on a single inventory query
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl ClusterConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.poll_interval_secs == 0 {
            return Err(ValidationError::InvalidPollInterval);
        }
        if self.request_timeout_secs == 0 {
            return Err(ValidationError::InvalidClusterTimeout);
        }
        Ok(())
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            api_url: None,
            token_path: default_token_path(),
            ca_path: default_ca_path(),
            poll_interval_secs: default_poll_interval(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_token_path() -> PathBuf {
    PathBuf::from("/var/run/secrets/kubernetes.io/serviceaccount/token")
}

fn default_ca_path() -> PathBuf {
    PathBuf::from("/var/run/secrets/kubernetes.io/serviceaccount/ca.crt")
}

fn default_poll_interval() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    5
}
