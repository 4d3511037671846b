//! Reconciliation routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use strongroom_core::reconciliation::{BatchItem, ReconcileData, ReconciliationService};
use strongroom_db::repositories::ReconciliationRepository;

use super::{error_response, validation_error};
use crate::AppState;

/// Creates the reconciliation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reconciliation/pending", get(pending))
        .route("/reconciliation/summary", get(summary))
        .route("/reconciliation/batch", post(reconcile_batch))
        .route("/reconciliation/{kind}/{id}", post(reconcile))
}

/// Query for pending transactions.
#[derive(Debug, Deserialize)]
pub struct PendingQuery {
    /// Business date.
    pub date: NaiveDate,
    /// Comma-separated store ids; all stores when absent.
    pub store_ids: Option<String>,
}

/// Query for the summary.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// Inclusive start.
    pub from: NaiveDate,
    /// Inclusive end.
    pub to: NaiveDate,
    /// Comma-separated store ids; all stores when absent.
    pub store_ids: Option<String>,
}

/// Request body for a batch.
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    /// Items to reconcile.
    pub items: Vec<BatchItem>,
}

fn parse_store_ids(raw: Option<&str>) -> Result<Vec<Uuid>, Response> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Uuid::parse_str(s).map_err(|_| validation_error(format!("Invalid store id: {s}")))
        })
        .collect()
}

fn repo(state: &AppState) -> ReconciliationRepository {
    ReconciliationRepository::new((*state.db).clone())
}

/// GET `/reconciliation/pending?date=&store_ids=` - Unreconciled rows of every kind.
async fn pending(
    State(state): State<AppState>,
    Query(query): Query<PendingQuery>,
) -> impl IntoResponse {
    let store_ids = match parse_store_ids(query.store_ids.as_deref()) {
        Ok(ids) => ids,
        Err(response) => return response,
    };
    match repo(&state).pending_transactions(query.date, &store_ids).await {
        Ok(transactions) => {
            (StatusCode::OK, Json(json!({ "transactions": transactions }))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// POST `/reconciliation/{kind}/{id}` - Reconcile one transaction.
async fn reconcile(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, Uuid)>,
    Json(payload): Json<ReconcileData>,
) -> impl IntoResponse {
    let kind = match ReconciliationService::parse_kind(&kind) {
        Ok(kind) => kind,
        Err(e) => return error_response(&e),
    };
    match repo(&state).reconcile(kind, id, payload, Utc::now()).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "id": id, "type": kind, "success": true })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST `/reconciliation/batch` - Reconcile many transactions.
async fn reconcile_batch(
    State(state): State<AppState>,
    Json(payload): Json<BatchRequest>,
) -> impl IntoResponse {
    if payload.items.is_empty() {
        return validation_error("items must not be empty");
    }
    let outcome = repo(&state).reconcile_batch(payload.items, Utc::now()).await;
    (StatusCode::OK, Json(json!(outcome))).into_response()
}

/// GET `/reconciliation/summary?from=&to=&store_ids=` - Progress counts.
async fn summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> impl IntoResponse {
    let store_ids = match parse_store_ids(query.store_ids.as_deref()) {
        Ok(ids) => ids,
        Err(response) => return response,
    };
    match repo(&state).summary(query.from, query.to, &store_ids).await {
        Ok(summary) => (StatusCode::OK, Json(json!(summary))).into_response(),
        Err(e) => error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::routes::test_support::{get, post_json, send};

    #[test]
    fn test_parse_store_ids() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(
            parse_store_ids(Some(&format!("{a}, {b}"))).unwrap(),
            vec![a, b]
        );
        assert!(parse_store_ids(None).unwrap().is_empty());
        assert!(parse_store_ids(Some("not-a-uuid")).is_err());
    }

    #[tokio::test]
    async fn test_unknown_kind_is_rejected() {
        let uri = format!("/api/v1/reconciliation/refund/{}", Uuid::new_v4());
        let (status, body) =
            send(post_json(&uri, &json!({ "reconciled_by": "auditor1" }))).await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn test_blank_reconciler_is_rejected() {
        let uri = format!("/api/v1/reconciliation/sale/{}", Uuid::new_v4());
        let (status, body) = send(post_json(&uri, &json!({ "reconciled_by": " " }))).await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn test_inverted_summary_range_is_rejected() {
        let (status, body) =
            send(get("/api/v1/reconciliation/summary?from=2025-01-22&to=2025-01-20")).await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "VALIDATION_FAILED");
    }
}
