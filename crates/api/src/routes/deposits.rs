//! Multi-day deposit routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use strongroom_db::repositories::{CreateDepositInput, DepositRepository};

use super::error_response;
use crate::AppState;

/// Creates the deposit routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stores/{store_id}/deposits/pending", get(pending_deposits))
        .route(
            "/stores/{store_id}/deposits",
            get(list_deposits).post(create_deposit),
        )
        .route("/deposits/{deposit_id}", get(get_deposit))
}

/// Request body for a multi-day deposit.
#[derive(Debug, Deserialize)]
pub struct CreateDepositRequest {
    /// Positions to include.
    pub position_ids: Vec<Uuid>,
    /// Amount taken to the bank.
    pub amount: Decimal,
    /// Bank slip number.
    pub deposit_slip_number: String,
    /// Receiving bank.
    pub bank_name: String,
    /// Who took the cash.
    pub deposited_by: String,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Physically counted amount.
    #[serde(default)]
    pub counted_amount: Option<Decimal>,
    /// Reason for an out-of-tolerance count.
    #[serde(default)]
    pub variance_reason: Option<String>,
}

/// GET `/stores/{store_id}/deposits/pending` - Cash waiting to be banked.
async fn pending_deposits(
    State(state): State<AppState>,
    Path(store_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = DepositRepository::new((*state.db).clone(), state.cash.clone());
    match repo.pending_summary(store_id, Utc::now()).await {
        Ok(pending) => (StatusCode::OK, Json(json!(pending))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST `/stores/{store_id}/deposits` - Deposit several days at once.
async fn create_deposit(
    State(state): State<AppState>,
    Path(store_id): Path<Uuid>,
    Json(payload): Json<CreateDepositRequest>,
) -> impl IntoResponse {
    let repo = DepositRepository::new((*state.db).clone(), state.cash.clone());
    let input = CreateDepositInput {
        store_id,
        position_ids: payload.position_ids,
        amount: payload.amount,
        deposit_slip_number: payload.deposit_slip_number,
        bank_name: payload.bank_name,
        deposited_by: payload.deposited_by,
        notes: payload.notes,
        counted_amount: payload.counted_amount,
        variance_reason: payload.variance_reason,
    };

    match repo.create_multi_day_deposit(input, Utc::now()).await {
        Ok(created) => (StatusCode::CREATED, Json(json!(created))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET `/stores/{store_id}/deposits` - A store's deposits, newest first.
async fn list_deposits(
    State(state): State<AppState>,
    Path(store_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = DepositRepository::new((*state.db).clone(), state.cash.clone());
    match repo.list_deposits(store_id).await {
        Ok(deposits) => (StatusCode::OK, Json(json!({ "deposits": deposits }))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET `/deposits/{deposit_id}` - One deposit with its day mappings.
async fn get_deposit(
    State(state): State<AppState>,
    Path(deposit_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = DepositRepository::new((*state.db).clone(), state.cash.clone());
    match repo.get_deposit(deposit_id).await {
        Ok(deposit) => (StatusCode::OK, Json(json!(deposit))).into_response(),
        Err(e) => error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::{Value, json};
    use uuid::Uuid;

    use crate::routes::test_support::{post_json, send};

    #[rstest]
    #[case::no_positions(json!({
        "position_ids": [],
        "amount": "2750",
        "deposit_slip_number": "DEP001",
        "bank_name": "HDFC Bank",
        "deposited_by": "manager1"
    }))]
    #[case::zero_amount(json!({
        "position_ids": [Uuid::new_v4()],
        "amount": "0",
        "deposit_slip_number": "DEP001",
        "bank_name": "HDFC Bank",
        "deposited_by": "manager1"
    }))]
    #[case::blank_slip(json!({
        "position_ids": [Uuid::new_v4()],
        "amount": "850",
        "deposit_slip_number": "  ",
        "bank_name": "HDFC Bank",
        "deposited_by": "manager1"
    }))]
    #[tokio::test]
    async fn test_invalid_deposit_is_rejected(#[case] body: Value) {
        let uri = format!("/api/v1/stores/{}/deposits", Uuid::new_v4());
        let (status, response) = send(post_json(&uri, &body)).await;
        assert_eq!(status, 400);
        assert_eq!(response["error"], "VALIDATION_FAILED");
    }
}
