//! HTTP handlers for ledger endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::PortLedger;
use crate::domain::allocation::ReservationError;

use super::dto::{ErrorResponse, PortRecordResponse, ReserveRequest, ReserveResponse};

// ════════════════════════════════════════════════════════════════════════════
// Error Type
// ════════════════════════════════════════════════════════════════════════════

/// Ledger API error that implements IntoResponse.
#[derive(Debug)]
pub enum LedgerApiError {
    BadRequest(String),
    Reservation(ReservationError),
}

impl IntoResponse for LedgerApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            LedgerApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(msg))
            }
            LedgerApiError::Reservation(ReservationError::OutOfRange { port, min, max }) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::out_of_range(port, min, max),
            ),
            LedgerApiError::Reservation(ReservationError::Collision {
                port,
                reason,
                current_owner,
            }) => (
                StatusCode::CONFLICT,
                ErrorResponse::collision(port, reason, &current_owner),
            ),
            LedgerApiError::Reservation(ReservationError::Persistence(msg)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::persistence_failed(format!("Reservation not saved: {}", msg)),
            ),
        };
        (status, Json(error)).into_response()
    }
}

impl From<ReservationError> for LedgerApiError {
    fn from(error: ReservationError) -> Self {
        LedgerApiError::Reservation(error)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════

/// Shared state for ledger endpoints.
#[derive(Clone)]
pub struct LedgerAppState {
    pub ledger: Arc<PortLedger>,
}

impl LedgerAppState {
    pub fn new(ledger: Arc<PortLedger>) -> Self {
        Self { ledger }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/ports - Every port in the range with its resolved owner
pub async fn list_ports(State(state): State<LedgerAppState>) -> Json<Vec<PortRecordResponse>> {
    let records = state.ledger.list_all().await;
    Json(records.into_iter().map(Into::into).collect())
}

/// POST /api/reserve - Reserve a free port
pub async fn reserve_port(
    State(state): State<LedgerAppState>,
    Json(req): Json<ReserveRequest>,
) -> Result<(StatusCode, Json<ReserveResponse>), LedgerApiError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(LedgerApiError::BadRequest(
            "Reservation name cannot be empty".to_string(),
        ));
    }

    let port = state.ledger.range().check(req.port)?;
    let record = state.ledger.reserve(port, name).await?;

    Ok((StatusCode::OK, Json(record.into())))
}

/// GET /health - Liveness probe
pub async fn health() -> &'static str {
    "OK"
}
