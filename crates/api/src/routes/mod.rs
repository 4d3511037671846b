//! API route definitions.

use axum::{
    Json, Router,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use strongroom_core::{
    approval::ApprovalError, deposit::DepositError, ledger::LedgerError,
    reconciliation::ReconciliationError,
};
use strongroom_shared::AppError;

use crate::AppState;

pub mod approvals;
pub mod deposits;
pub mod health;
pub mod positions;
pub mod reconciliation;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(positions::routes())
        .merge(deposits::routes())
        .merge(approvals::routes())
        .merge(reconciliation::routes())
}

// ============================================================================
// Error Mapping
// ============================================================================

/// An error that knows its HTTP status and API error code.
pub(crate) trait ApiError: std::fmt::Display {
    fn status_code(&self) -> u16;
    fn error_code(&self) -> &'static str;
}

macro_rules! api_error {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ApiError for $ty {
                fn status_code(&self) -> u16 {
                    <$ty>::status_code(self)
                }

                fn error_code(&self) -> &'static str {
                    <$ty>::error_code(self)
                }
            }
        )+
    };
}

api_error!(LedgerError, DepositError, ApprovalError, ReconciliationError, AppError);

/// Maps a domain error to `{ "error": CODE, "message": text }`.
///
/// Server-side failures are logged and their details withheld.
pub(crate) fn error_response(e: &impl ApiError) -> Response {
    let status =
        StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status.is_server_error() {
        error!(error = %e, "Request failed");
        return (
            status,
            Json(json!({
                "error": e.error_code(),
                "message": "An error occurred"
            })),
        )
            .into_response();
    }

    (
        status,
        Json(json!({
            "error": e.error_code(),
            "message": e.to_string()
        })),
    )
        .into_response()
}

/// Fallback for requests that match no route.
pub(crate) async fn not_found(uri: Uri) -> Response {
    error_response(&AppError::NotFound(format!("No route for {}", uri.path())))
}

/// Shorthand for a 400 with a validation message.
pub(crate) fn validation_error(message: impl Into<String>) -> Response {
    error_response(&AppError::Validation(message.into()))
}
