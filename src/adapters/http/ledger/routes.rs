//! HTTP routes for ledger endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{list_ports, reserve_port, LedgerAppState};

/// Create the ledger API router.
///
/// # Routes
/// - `GET /ports` - Merged state of every port in the range
/// - `POST /reserve` - Reserve a port (`{"port": 30001, "name": "svc-a"}`)
pub fn ledger_routes() -> Router<LedgerAppState> {
    Router::new()
        .route("/ports", get(list_ports))
        .route("/reserve", post(reserve_port))
}
