//! HTTP adapter for ledger endpoints.
//!
//! - `GET /api/ports` - Every port in the range with its resolved owner
//! - `POST /api/reserve` - Reserve a free port

mod dto;
mod handlers;
mod routes;

pub use dto::{ErrorResponse, PortRecordResponse, ReserveRequest, ReserveResponse};
pub use handlers::{health, LedgerApiError, LedgerAppState};
pub use routes::ledger_routes;
