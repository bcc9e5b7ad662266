//! Kubernetes Service Inventory - Implementation of ServiceInventory
//! against the cluster API server.
//!
//! Issues a single `GET /api/v1/services` (all namespaces) per call,
//! authenticated with the pod's service-account token.
//!
//! # Configuration
//!
//! ```ignore
//! let config = KubernetesConfig::in_cluster(token_path, ca_path)?
//!     .with_timeout(Duration::from_secs(5));
//!
//! let inventory = KubernetesServiceInventory::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Certificate, Client};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::domain::allocation::{ClusterService, ExposureType, ServicePort};
use crate::ports::{InventoryError, ServiceInventory};

/// Environment variables the kubelet sets in every pod.
const SERVICE_HOST_ENV: &str = "KUBERNETES_SERVICE_HOST";
const SERVICE_PORT_ENV: &str = "KUBERNETES_SERVICE_PORT";

/// Configuration for the Kubernetes API client.
#[derive(Debug, Clone)]
pub struct KubernetesConfig {
    /// Bearer token for the API server.
    token: Secret<String>,
    /// Base URL of the API server (e.g. `https://10.0.0.1:443`).
    pub api_url: String,
    /// PEM bundle used to verify the API server certificate.
    pub ca_pem: Option<Vec<u8>>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl KubernetesConfig {
    /// Creates a configuration from an explicit URL and token.
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            token: Secret::new(token.into()),
            api_url: api_url.into(),
            ca_pem: None,
            timeout: Duration::from_secs(5),
        }
    }

    /// Loads credentials from the in-cluster service-account mount.
    ///
    /// The API server address comes from `KUBERNETES_SERVICE_HOST` /
    /// `KUBERNETES_SERVICE_PORT`. A missing CA file is tolerated (the
    /// system roots are used instead); a missing token or address is not.
    pub fn in_cluster(token_path: &Path, ca_path: &Path) -> Result<Self, InventoryError> {
        let host = std::env::var(SERVICE_HOST_ENV).map_err(|_| {
            InventoryError::Credentials(format!("{SERVICE_HOST_ENV} is not set"))
        })?;
        let port = std::env::var(SERVICE_PORT_ENV).unwrap_or_else(|_| "443".to_string());
        let api_url = if host.contains(':') {
            format!("https://[{host}]:{port}")
        } else {
            format!("https://{host}:{port}")
        };

        let mut config = Self::new(api_url, String::new());
        config.load_token(token_path)?;
        config.ca_pem = std::fs::read(ca_path).ok();
        Ok(config)
    }

    /// Reads the bearer token from `path`.
    pub fn load_token(&mut self, path: &Path) -> Result<(), InventoryError> {
        let token = std::fs::read_to_string(path).map_err(|e| {
            InventoryError::Credentials(format!("cannot read token {}: {e}", path.display()))
        })?;
        self.token = Secret::new(token.trim().to_string());
        Ok(())
    }

    /// Sets the API server URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Sets the CA bundle.
    pub fn with_ca_pem(mut self, pem: Vec<u8>) -> Self {
        self.ca_pem = Some(pem);
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn token(&self) -> &str {
        self.token.expose_secret()
    }
}

/// Service inventory backed by the Kubernetes API server.
pub struct KubernetesServiceInventory {
    config: KubernetesConfig,
    client: Client,
}

impl KubernetesServiceInventory {
    /// Creates the inventory, building an HTTP client that trusts the
    /// configured CA bundle.
    pub fn new(config: KubernetesConfig) -> Result<Self, InventoryError> {
        let mut builder = Client::builder().timeout(config.timeout);
        if let Some(pem) = &config.ca_pem {
            let cert = Certificate::from_pem(pem)
                .map_err(|e| InventoryError::Credentials(format!("invalid CA bundle: {e}")))?;
            builder = builder.add_root_certificate(cert);
        }
        let client = builder
            .build()
            .map_err(|e| InventoryError::Request(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn services_url(&self) -> String {
        format!("{}/api/v1/services", self.config.api_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ServiceInventory for KubernetesServiceInventory {
    async fn list_services(&self) -> Result<Vec<ClusterService>, InventoryError> {
        let url = self.services_url();
        tracing::trace!("Listing services from {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.config.token())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    InventoryError::Timeout(self.config.timeout)
                } else {
                    InventoryError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(InventoryError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let list: ServiceList = response
            .json()
            .await
            .map_err(|e| InventoryError::InvalidResponse(e.to_string()))?;

        Ok(list.into_services())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// API server wire types (only the fields we read)
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct ServiceList {
    #[serde(default)]
    items: Vec<ServiceItem>,
}

#[derive(Debug, Deserialize)]
struct ServiceItem {
    metadata: ObjectMeta,
    #[serde(default)]
    spec: Option<ServiceSpec>,
}

#[derive(Debug, Deserialize)]
struct ObjectMeta {
    name: String,
    #[serde(default)]
    namespace: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServiceSpec {
    #[serde(rename = "type", default)]
    service_type: Option<String>,
    #[serde(default)]
    ports: Vec<ServicePortSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServicePortSpec {
    #[serde(default)]
    node_port: Option<i32>,
}

impl ServiceList {
    fn into_services(self) -> Vec<ClusterService> {
        self.items.into_iter().map(ServiceItem::into_service).collect()
    }
}

impl ServiceItem {
    fn into_service(self) -> ClusterService {
        let spec = self.spec.unwrap_or(ServiceSpec {
            service_type: None,
            ports: Vec::new(),
        });
        let ports = spec
            .ports
            .into_iter()
            .map(|p| ServicePort {
                node_port: p
                    .node_port
                    .and_then(|n| u16::try_from(n).ok())
                    .filter(|n| *n != 0),
            })
            .collect();

        ClusterService::new(
            self.metadata.namespace.unwrap_or_else(|| "default".to_string()),
            self.metadata.name,
            ExposureType::from_spec_type(spec.service_type.as_deref()),
            ports,
        )
    }
}
