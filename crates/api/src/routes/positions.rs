//! Daily cash position, balance and movement routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use strongroom_core::ledger::{AccountType, CashFlowCategory, LedgerError};
use strongroom_db::repositories::{LedgerRepository, MovementFilter, MovementRepository};

use super::{error_response, validation_error};
use crate::AppState;

/// Creates the position routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stores/{store_id}/positions", get(list_positions))
        .route(
            "/stores/{store_id}/positions/{date}",
            get(get_position).post(ensure_position),
        )
        .route("/stores/{store_id}/positions/{date}/postings", post(post_flow))
        .route("/stores/{store_id}/positions/{date}/count", post(record_count))
        .route("/stores/{store_id}/positions/{date}/holiday", post(mark_holiday))
        .route("/stores/{store_id}/balances/{account}", get(current_balance))
        .route(
            "/stores/{store_id}/balances/{account}/expected",
            get(expected_balance),
        )
        .route("/stores/{store_id}/movements", get(list_movements))
}

/// Query for a date range.
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    /// Inclusive start.
    pub from: NaiveDate,
    /// Inclusive end.
    pub to: NaiveDate,
}

/// Request body for a posting.
#[derive(Debug, Deserialize)]
pub struct PostingRequest {
    /// Flow category, e.g. `cash_sales`.
    pub category: String,
    /// Positive amount.
    pub amount: Decimal,
    /// Who posted it.
    pub posted_by: String,
}

/// Request body for a physical count.
#[derive(Debug, Deserialize)]
pub struct CountRequest {
    /// Counted cash.
    pub counted_amount: Decimal,
    /// Required when the variance is beyond tolerance.
    #[serde(default)]
    pub variance_reason: Option<String>,
}

/// Request body for a bank holiday.
#[derive(Debug, Deserialize)]
pub struct HolidayRequest {
    /// Name of the holiday.
    pub holiday_name: String,
}

/// Query for the expected balance.
#[derive(Debug, Deserialize)]
pub struct ExpectedQuery {
    /// End of the business date to evaluate.
    pub date: NaiveDate,
}

/// Query for listing movements.
#[derive(Debug, Deserialize)]
pub struct MovementQuery {
    /// `sales_cash` or `petty_cash`.
    pub account: Option<String>,
    /// Inclusive start.
    pub from: Option<NaiveDate>,
    /// Inclusive end.
    pub to: Option<NaiveDate>,
}

/// GET `/stores/{store_id}/positions?from=&to=` - Positions in a range, newest first.
async fn list_positions(
    State(state): State<AppState>,
    Path(store_id): Path<Uuid>,
    Query(range): Query<RangeQuery>,
) -> impl IntoResponse {
    let ledger = LedgerRepository::new((*state.db).clone());
    match ledger.positions_in_range(store_id, range.from, range.to).await {
        Ok(positions) => (StatusCode::OK, Json(json!({ "positions": positions }))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET `/stores/{store_id}/positions/{date}` - One position.
async fn get_position(
    State(state): State<AppState>,
    Path((store_id, date)): Path<(Uuid, NaiveDate)>,
) -> impl IntoResponse {
    let ledger = LedgerRepository::new((*state.db).clone());
    match ledger.get_position(store_id, date).await {
        Ok(Some(position)) => (StatusCode::OK, Json(json!(position))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "NOT_FOUND",
                "message": format!("No cash position for store {store_id} on {date}")
            })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST `/stores/{store_id}/positions/{date}` - Get or create a position.
async fn ensure_position(
    State(state): State<AppState>,
    Path((store_id, date)): Path<(Uuid, NaiveDate)>,
) -> impl IntoResponse {
    let ledger = LedgerRepository::new((*state.db).clone());
    match ledger.ensure_position(store_id, date).await {
        Ok(position) => (StatusCode::OK, Json(json!(position))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST `/stores/{store_id}/positions/{date}/postings` - Add to a flow category.
async fn post_flow(
    State(state): State<AppState>,
    Path((store_id, date)): Path<(Uuid, NaiveDate)>,
    Json(payload): Json<PostingRequest>,
) -> impl IntoResponse {
    let Some(category) = CashFlowCategory::parse(&payload.category) else {
        return validation_error(format!("Unknown flow category: {}", payload.category));
    };

    let ledger = LedgerRepository::new((*state.db).clone());
    match ledger
        .post(store_id, date, category, payload.amount, &payload.posted_by)
        .await
    {
        Ok(position) => (StatusCode::OK, Json(json!(position))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST `/stores/{store_id}/positions/{date}/count` - Record a physical count.
async fn record_count(
    State(state): State<AppState>,
    Path((store_id, date)): Path<(Uuid, NaiveDate)>,
    Json(payload): Json<CountRequest>,
) -> impl IntoResponse {
    let ledger = LedgerRepository::new((*state.db).clone());
    match ledger
        .record_cash_count(
            store_id,
            date,
            payload.counted_amount,
            payload.variance_reason,
            state.cash.variance_base_tolerance,
        )
        .await
    {
        Ok((position, evaluation)) => (
            StatusCode::OK,
            Json(json!({
                "position": position,
                "evaluation": evaluation
            })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST `/stores/{store_id}/positions/{date}/holiday` - Mark a bank holiday.
async fn mark_holiday(
    State(state): State<AppState>,
    Path((store_id, date)): Path<(Uuid, NaiveDate)>,
    Json(payload): Json<HolidayRequest>,
) -> impl IntoResponse {
    let ledger = LedgerRepository::new((*state.db).clone());
    match ledger
        .mark_bank_holiday(store_id, date, &payload.holiday_name)
        .await
    {
        Ok(position) => {
            info!(store_id = %store_id, business_date = %date, "Bank holiday marked");
            (StatusCode::OK, Json(json!(position))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// GET `/stores/{store_id}/balances/{account}` - Current account balance.
async fn current_balance(
    State(state): State<AppState>,
    Path((store_id, account)): Path<(Uuid, String)>,
) -> impl IntoResponse {
    let Some(account) = AccountType::parse(&account) else {
        return validation_error(format!("Unknown account: {account}"));
    };

    let ledger = LedgerRepository::new((*state.db).clone());
    match ledger.current_account_balance(store_id, account).await {
        Ok(balance) => (
            StatusCode::OK,
            Json(json!({
                "store_id": store_id,
                "account": account,
                "balance": balance
            })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET `/stores/{store_id}/balances/{account}/expected?date=` - Expected cash at end of day.
async fn expected_balance(
    State(state): State<AppState>,
    Path((store_id, account)): Path<(Uuid, String)>,
    Query(query): Query<ExpectedQuery>,
) -> impl IntoResponse {
    let Some(account) = AccountType::parse(&account) else {
        return validation_error(format!("Unknown account: {account}"));
    };

    let ledger = LedgerRepository::new((*state.db).clone());
    match ledger.expected_cash_amount(store_id, account, query.date).await {
        Ok(expected) => (
            StatusCode::OK,
            Json(json!({
                "store_id": store_id,
                "account": account,
                "date": query.date,
                "expected_amount": expected
            })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET `/stores/{store_id}/movements` - Movement log entries.
async fn list_movements(
    State(state): State<AppState>,
    Path(store_id): Path<Uuid>,
    Query(query): Query<MovementQuery>,
) -> impl IntoResponse {
    let account = match query.account.as_deref().map(AccountType::parse) {
        None => None,
        Some(Some(account)) => Some(account),
        Some(None) => {
            return validation_error(format!(
                "Unknown account: {}",
                query.account.as_deref().unwrap_or_default()
            ));
        }
    };

    let movements = MovementRepository::new((*state.db).clone());
    let filter = MovementFilter {
        account,
        from: query.from,
        to: query.to,
    };
    match movements.list(store_id, filter).await {
        Ok(rows) => (StatusCode::OK, Json(json!({ "movements": rows }))).into_response(),
        Err(e) => error_response(&LedgerError::Database(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use uuid::Uuid;

    use crate::routes::test_support::{get, post_json, send};

    #[tokio::test]
    async fn test_unknown_category_is_rejected() {
        let uri = format!("/api/v1/stores/{}/positions/2025-01-20/postings", Uuid::new_v4());
        let (status, body) = send(post_json(
            &uri,
            &json!({ "category": "lottery_winnings", "amount": "10", "posted_by": "cashier1" }),
        ))
        .await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn test_unknown_account_is_rejected() {
        let uri = format!("/api/v1/stores/{}/balances/safe_cash", Uuid::new_v4());
        let (status, body) = send(get(&uri)).await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn test_inverted_range_is_rejected() {
        let uri = format!(
            "/api/v1/stores/{}/positions?from=2025-01-22&to=2025-01-20",
            Uuid::new_v4()
        );
        let (status, body) = send(get(&uri)).await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "VALIDATION_FAILED");
    }
}
