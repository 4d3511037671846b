//! Transfer and adjustment approval routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use strongroom_core::approval::{AdjustmentType, ApprovalStatus, Priority};
use strongroom_core::ledger::AccountType;
use strongroom_db::repositories::{
    ApprovalRepository, ApproveInput, SubmitAdjustmentInput, SubmitTransferInput,
};

use super::{error_response, validation_error};
use crate::AppState;

/// Creates the approval routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/stores/{store_id}/transfers",
            get(list_transfers).post(submit_transfer),
        )
        .route("/transfers/{id}", get(get_transfer))
        .route("/transfers/{id}/approve", post(approve_transfer))
        .route("/transfers/{id}/reject", post(reject_transfer))
        .route("/transfers/{id}/complete", post(complete_transfer))
        .route(
            "/stores/{store_id}/adjustments",
            get(list_adjustments).post(submit_adjustment),
        )
        .route("/adjustments/{id}", get(get_adjustment))
        .route("/adjustments/{id}/approve", post(approve_adjustment))
        .route("/adjustments/{id}/reject", post(reject_adjustment))
        .route("/adjustments/{id}/complete", post(complete_adjustment))
}

/// Request body for a transfer.
#[derive(Debug, Deserialize)]
pub struct SubmitTransferRequest {
    /// Amount to move from sales cash to petty cash.
    pub requested_amount: Decimal,
    /// `low`, `medium` or `high`; defaults to medium.
    #[serde(default)]
    pub priority: Option<String>,
    /// Why the money is needed.
    #[serde(default)]
    pub reason: Option<String>,
    /// Who is asking.
    pub requested_by: String,
}

/// Request body for an adjustment.
#[derive(Debug, Deserialize)]
pub struct SubmitAdjustmentRequest {
    /// `initial_setup`, `correction`, `injection` or `loss`.
    pub adjustment_type: String,
    /// `sales_cash` or `petty_cash`.
    pub account: String,
    /// Positive magnitude.
    pub requested_amount: Decimal,
    /// Why the adjustment is needed.
    pub reason: String,
    /// `low`, `medium` or `high`; defaults to medium.
    #[serde(default)]
    pub priority: Option<String>,
    /// Who is asking.
    pub requested_by: String,
}

/// Request body for approving.
#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    /// Who approves.
    pub approved_by: String,
    /// Defaults to the requested amount.
    #[serde(default)]
    pub approved_amount: Option<Decimal>,
    /// Optional notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request body for rejecting.
#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    /// Who rejects.
    pub approved_by: String,
    /// Required explanation.
    pub notes: String,
}

/// Request body for completing.
#[derive(Debug, Deserialize)]
pub struct CompleteRequest {
    /// Who applies the cash movement.
    pub completed_by: String,
    /// Business date the movement lands on; defaults to today.
    #[serde(default)]
    pub business_date: Option<NaiveDate>,
}

/// Query for listing requests.
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    /// Restrict to one status.
    pub status: Option<String>,
}

fn parse_priority(raw: Option<&str>) -> Result<Priority, Response> {
    match raw {
        None => Ok(Priority::default()),
        Some(s) => {
            Priority::parse(s).ok_or_else(|| validation_error(format!("Unknown priority: {s}")))
        }
    }
}

fn parse_status(raw: Option<&str>) -> Result<Option<ApprovalStatus>, Response> {
    raw.map(|s| {
        ApprovalStatus::parse(s).ok_or_else(|| validation_error(format!("Unknown status: {s}")))
    })
    .transpose()
}

fn repo(state: &AppState) -> ApprovalRepository {
    ApprovalRepository::new((*state.db).clone())
}

// ============================================================================
// Transfers
// ============================================================================

/// POST `/stores/{store_id}/transfers` - Request a sales-to-petty transfer.
async fn submit_transfer(
    State(state): State<AppState>,
    Path(store_id): Path<Uuid>,
    Json(payload): Json<SubmitTransferRequest>,
) -> impl IntoResponse {
    let priority = match parse_priority(payload.priority.as_deref()) {
        Ok(p) => p,
        Err(response) => return response,
    };

    let input = SubmitTransferInput {
        store_id,
        requested_amount: payload.requested_amount,
        priority,
        reason: payload.reason,
        requested_by: payload.requested_by,
    };
    match repo(&state).submit_transfer(input, Utc::now()).await {
        Ok(transfer) => (StatusCode::CREATED, Json(json!(transfer))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET `/stores/{store_id}/transfers?status=` - A store's transfers.
async fn list_transfers(
    State(state): State<AppState>,
    Path(store_id): Path<Uuid>,
    Query(query): Query<StatusQuery>,
) -> impl IntoResponse {
    let status = match parse_status(query.status.as_deref()) {
        Ok(s) => s,
        Err(response) => return response,
    };
    match repo(&state).list_transfers(store_id, status).await {
        Ok(transfers) => (StatusCode::OK, Json(json!({ "transfers": transfers }))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET `/transfers/{id}` - One transfer.
async fn get_transfer(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    match repo(&state).get_transfer(id).await {
        Ok(transfer) => (StatusCode::OK, Json(json!(transfer))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST `/transfers/{id}/approve`
async fn approve_transfer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApproveRequest>,
) -> impl IntoResponse {
    let input = ApproveInput {
        approved_amount: payload.approved_amount,
        approved_by: payload.approved_by,
        notes: payload.notes,
    };
    match repo(&state).approve_transfer(id, input, Utc::now()).await {
        Ok(transfer) => (StatusCode::OK, Json(json!(transfer))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST `/transfers/{id}/reject`
async fn reject_transfer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectRequest>,
) -> impl IntoResponse {
    match repo(&state)
        .reject_transfer(id, &payload.approved_by, &payload.notes, Utc::now())
        .await
    {
        Ok(transfer) => (StatusCode::OK, Json(json!(transfer))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST `/transfers/{id}/complete`
async fn complete_transfer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompleteRequest>,
) -> impl IntoResponse {
    let now = Utc::now();
    let business_date = payload.business_date.unwrap_or_else(|| now.date_naive());
    match repo(&state)
        .complete_transfer(id, &payload.completed_by, business_date, now)
        .await
    {
        Ok(transfer) => (StatusCode::OK, Json(json!(transfer))).into_response(),
        Err(e) => error_response(&e),
    }
}

// ============================================================================
// Adjustments
// ============================================================================

/// POST `/stores/{store_id}/adjustments` - Request a manual adjustment.
async fn submit_adjustment(
    State(state): State<AppState>,
    Path(store_id): Path<Uuid>,
    Json(payload): Json<SubmitAdjustmentRequest>,
) -> impl IntoResponse {
    let Some(adjustment_type) = AdjustmentType::parse(&payload.adjustment_type) else {
        return validation_error(format!(
            "Unknown adjustment type: {}",
            payload.adjustment_type
        ));
    };
    let Some(account) = AccountType::parse(&payload.account) else {
        return validation_error(format!("Unknown account: {}", payload.account));
    };
    let priority = match parse_priority(payload.priority.as_deref()) {
        Ok(p) => p,
        Err(response) => return response,
    };

    let input = SubmitAdjustmentInput {
        store_id,
        adjustment_type,
        account,
        requested_amount: payload.requested_amount,
        reason: payload.reason,
        priority,
        requested_by: payload.requested_by,
    };
    match repo(&state).submit_adjustment(input, Utc::now()).await {
        Ok(adjustment) => (StatusCode::CREATED, Json(json!(adjustment))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET `/stores/{store_id}/adjustments?status=` - A store's adjustments.
async fn list_adjustments(
    State(state): State<AppState>,
    Path(store_id): Path<Uuid>,
    Query(query): Query<StatusQuery>,
) -> impl IntoResponse {
    let status = match parse_status(query.status.as_deref()) {
        Ok(s) => s,
        Err(response) => return response,
    };
    match repo(&state).list_adjustments(store_id, status).await {
        Ok(adjustments) => {
            (StatusCode::OK, Json(json!({ "adjustments": adjustments }))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// GET `/adjustments/{id}` - One adjustment.
async fn get_adjustment(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    match repo(&state).get_adjustment(id).await {
        Ok(adjustment) => (StatusCode::OK, Json(json!(adjustment))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST `/adjustments/{id}/approve`
async fn approve_adjustment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApproveRequest>,
) -> impl IntoResponse {
    let input = ApproveInput {
        approved_amount: payload.approved_amount,
        approved_by: payload.approved_by,
        notes: payload.notes,
    };
    match repo(&state).approve_adjustment(id, input, Utc::now()).await {
        Ok(adjustment) => (StatusCode::OK, Json(json!(adjustment))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST `/adjustments/{id}/reject`
async fn reject_adjustment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectRequest>,
) -> impl IntoResponse {
    match repo(&state)
        .reject_adjustment(id, &payload.approved_by, &payload.notes, Utc::now())
        .await
    {
        Ok(adjustment) => (StatusCode::OK, Json(json!(adjustment))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST `/adjustments/{id}/complete`
async fn complete_adjustment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompleteRequest>,
) -> impl IntoResponse {
    let now = Utc::now();
    let business_date = payload.business_date.unwrap_or_else(|| now.date_naive());
    match repo(&state)
        .complete_adjustment(id, &payload.completed_by, business_date, now)
        .await
    {
        Ok(adjustment) => (StatusCode::OK, Json(json!(adjustment))).into_response(),
        Err(e) => error_response(&e),
    }
}
