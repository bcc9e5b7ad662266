//! Resolved state of a single port.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::foundation::Timestamp;

/// Owner shown for ports nobody holds.
pub const FREE_OWNER: &str = "-";

/// Where a port's record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortStatus {
    Free,
    #[serde(alias = "occupied_k8s")]
    OccupiedLive,
    ReservedManual,
}

/// One port and whoever holds it.
///
/// The same shape is used for live-snapshot entries, persisted
/// reservations and the merged view. Older reservation files wrote the
/// owner as `service_name` and used empty strings for absent values; both
/// are accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRecord {
    pub port: u16,
    pub status: PortStatus,
    #[serde(alias = "service_name")]
    pub owner: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub namespace: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_timestamp_as_none"
    )]
    pub updated_at: Option<Timestamp>,
}

impl PortRecord {
    /// Placeholder for a port neither table knows about.
    pub fn free(port: u16) -> Self {
        Self {
            port,
            status: PortStatus::Free,
            owner: FREE_OWNER.to_string(),
            namespace: None,
            updated_at: None,
        }
    }

    /// Port exposed by the cluster service `<namespace>/<name>`.
    pub fn live(port: u16, namespace: &str, name: &str, observed_at: Timestamp) -> Self {
        Self {
            port,
            status: PortStatus::OccupiedLive,
            owner: format!("{namespace}/{name}"),
            namespace: Some(namespace.to_string()),
            updated_at: Some(observed_at),
        }
    }

    /// Manual reservation made by `owner`.
    pub fn reserved(port: u16, owner: impl Into<String>, reserved_at: Timestamp) -> Self {
        Self {
            port,
            status: PortStatus::ReservedManual,
            owner: owner.into(),
            namespace: None,
            updated_at: Some(reserved_at),
        }
    }

    pub fn is_free(&self) -> bool {
        self.status == PortStatus::Free
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()))
}

fn blank_timestamp_as_none<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.is_empty() => Ok(None),
        Some(raw) => Timestamp::parse(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}"))),
    }
}
