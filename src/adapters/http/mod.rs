//! HTTP adapters - REST API implementations.
//!
//! `app_router` assembles the full service: ledger endpoints under `/api`,
//! the `/health` probe, request tracing, request ids and a per-request
//! timeout.

pub mod ledger;

use std::time::Duration;

use axum::{http::HeaderName, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

pub use ledger::{ledger_routes, LedgerAppState};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the complete application router.
pub fn app_router(state: LedgerAppState, request_timeout: Duration) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .nest("/api", ledger_routes())
        .route("/health", get(ledger::health))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(request_timeout))
                .layer(PropagateRequestIdLayer::new(request_id)),
        )
}
