//! HTTP DTOs for ledger endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::allocation::{CollisionReason, PortRecord, PortStatus};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to reserve a port.
///
/// `port` is a wide integer so values that do not fit a port number are
/// reported as out of range instead of as malformed JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct ReserveRequest {
    pub port: i64,
    pub name: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// One port of the merged view.
#[derive(Debug, Clone, Serialize)]
pub struct PortRecordResponse {
    pub port: u16,
    pub status: PortStatus,
    pub owner: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<PortRecord> for PortRecordResponse {
    fn from(record: PortRecord) -> Self {
        Self {
            port: record.port,
            status: record.status,
            owner: record.owner,
            namespace: record.namespace,
            updated_at: record.updated_at.map(|ts| ts.as_datetime().to_rfc3339()),
        }
    }
}

/// Response for a committed reservation.
#[derive(Debug, Clone, Serialize)]
pub struct ReserveResponse {
    pub port: u16,
    pub status: PortStatus,
    pub owner: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    pub message: String,
}

impl From<PortRecord> for ReserveResponse {
    fn from(record: PortRecord) -> Self {
        Self {
            port: record.port,
            status: record.status,
            owner: record.owner,
            updated_at: record.updated_at.map(|ts| ts.as_datetime().to_rfc3339()),
            message: "Reserved".to_string(),
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn out_of_range(port: i64, min: u16, max: u16) -> Self {
        Self {
            code: "PORT_OUT_OF_RANGE".to_string(),
            message: format!("Port {} is outside the range {}-{}", port, min, max),
            details: Some(json!({ "min_port": min, "max_port": max })),
        }
    }

    /// Conflict naming the current owner so clients can explain it.
    pub fn collision(port: u16, reason: CollisionReason, current_owner: &str) -> Self {
        let (code, message) = match reason {
            CollisionReason::OccupiedLive => (
                "PORT_OCCUPIED",
                format!("Port {} is in use by service {}", port, current_owner),
            ),
            CollisionReason::ReservedManual => (
                "PORT_RESERVED",
                format!("Port {} is already reserved by {}", port, current_owner),
            ),
        };
        Self {
            code: code.to_string(),
            message,
            details: Some(json!({
                "reason": reason,
                "current_owner": current_owner,
            })),
        }
    }

    pub fn persistence_failed(message: impl Into<String>) -> Self {
        Self {
            code: "PERSISTENCE_FAILED".to_string(),
            message: message.into(),
            details: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;

    #[test]
    fn reserve_request_deserializes() {
        let json = r#"{"port": 30001, "name": "foo"}"#;
        let req: ReserveRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.port, 30001);
        assert_eq!(req.name, "foo");
    }

    #[test]
    fn reserve_request_accepts_oversized_port() {
        let json = r#"{"port": 99999999, "name": "foo"}"#;
        let req: ReserveRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.port, 99_999_999);
    }

    #[test]
    fn free_port_response_omits_optional_fields() {
        let response: PortRecordResponse = PortRecord::free(30000).into();
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value, json!({"port": 30000, "status": "free", "owner": "-"}));
    }

    #[test]
    fn live_port_response_includes_namespace() {
        let response: PortRecordResponse =
            PortRecord::live(30080, "shop", "web", Timestamp::now()).into();
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["status"], "occupied_live");
        assert_eq!(value["owner"], "shop/web");
        assert_eq!(value["namespace"], "shop");
        assert!(value["updated_at"].is_string());
    }

    #[test]
    fn reserve_response_says_reserved() {
        let response: ReserveResponse =
            PortRecord::reserved(30001, "foo", Timestamp::now()).into();
        assert_eq!(response.message, "Reserved");
        assert_eq!(response.status, PortStatus::ReservedManual);
    }

    #[test]
    fn collision_response_carries_owner_and_reason() {
        let error = ErrorResponse::collision(30001, CollisionReason::ReservedManual, "foo");
        assert_eq!(error.code, "PORT_RESERVED");
        assert!(error.message.contains("foo"));
        let details = error.details.unwrap();
        assert_eq!(details["reason"], "reserved_manual");
        assert_eq!(details["current_owner"], "foo");
    }

    #[test]
    fn live_collision_uses_occupied_code() {
        let error = ErrorResponse::collision(30001, CollisionReason::OccupiedLive, "ns/svc");
        assert_eq!(error.code, "PORT_OCCUPIED");
    }
}
