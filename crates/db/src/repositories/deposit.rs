//! Deposit aggregator repository.
//!
//! One deposit freezes several daily positions at once. Everything except
//! the movement log entry happens in a single database transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use strongroom_core::deposit::{
    DepositCountCheck, DepositError, DepositPlan, DepositRequest, DepositService, PendingSummary,
    PositionForDeposit,
};
use strongroom_core::ledger::{AccountType, MovementType};
use strongroom_shared::CashConfig;

use super::convert::deposit_status_to_core;
use super::movement::{MovementRepository, NewMovement};
use crate::entities::{
    cash_deposits, daily_cash_positions, deposit_day_mappings,
    sea_orm_active_enums::DepositStatus,
};

/// Input for a multi-day deposit.
#[derive(Debug, Clone)]
pub struct CreateDepositInput {
    /// Store making the deposit.
    pub store_id: Uuid,
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
    pub notes: Option<String>,
    /// Physically counted amount, if counted.
    pub counted_amount: Option<Decimal>,
    /// Reason for an out-of-tolerance count.
    pub variance_reason: Option<String>,
}

/// A persisted deposit with its per-day attribution.
#[derive(Debug, Clone, Serialize)]
pub struct DepositWithMappings {
    /// The deposit.
    pub deposit: cash_deposits::Model,
    /// One mapping per included day, ordered by date.
    pub mappings: Vec<deposit_day_mappings::Model>,
}

/// Pending positions with their alert summary.
#[derive(Debug, Clone, Serialize)]
pub struct PendingDeposits {
    /// Summary of the pending cash.
    pub summary: PendingSummary,
    /// Pending positions, oldest first.
    pub positions: Vec<daily_cash_positions::Model>,
}

/// Deposit aggregator repository.
#[derive(Debug, Clone)]
pub struct DepositRepository {
    db: DatabaseConnection,
    movements: MovementRepository,
    config: CashConfig,
}

impl DepositRepository {
    /// Creates a new deposit repository.
    #[must_use]
    pub fn new(db: DatabaseConnection, config: CashConfig) -> Self {
        Self {
            movements: MovementRepository::new(db.clone()),
            db,
            config,
        }
    }

    /// Creates a deposit covering several days.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Input fails validation
    /// - A position does not belong to the store
    /// - A position is already deposited (including by a concurrent depositor)
    /// - The amount does not match the selected days' total
    /// - A counted amount is out of tolerance without a reason
    /// - Database operation fails
    pub async fn create_multi_day_deposit(
        &self,
        input: CreateDepositInput,
        now: DateTime<Utc>,
    ) -> Result<DepositWithMappings, DepositError> {
        DepositService::validate_request(&DepositRequest {
            position_ids: &input.position_ids,
            amount: input.amount,
            deposit_slip_number: &input.deposit_slip_number,
            bank_name: &input.bank_name,
            deposited_by: &input.deposited_by,
        })?;

        let positions = daily_cash_positions::Entity::find()
            .filter(daily_cash_positions::Column::StoreId.eq(input.store_id))
            .filter(daily_cash_positions::Column::Id.is_in(input.position_ids.clone()))
            .order_by_asc(daily_cash_positions::Column::BusinessDate)
            .all(&self.db)
            .await
            .map_err(|e| DepositError::Database(e.to_string()))?;

        let candidates: Vec<PositionForDeposit> = positions.iter().map(to_candidate).collect();
        let plan = DepositService::plan(
            &input.position_ids,
            &candidates,
            input.amount,
            self.config.deposit_match_tolerance,
        )?;
        let count = DepositService::check_count(
            &plan,
            input.counted_amount,
            input.variance_reason.clone(),
            self.config.variance_base_tolerance,
        )?;

        let created = self.persist(&input, &plan, count, now).await?;

        info!(
            store_id = %input.store_id,
            deposit_id = %created.deposit.id,
            amount = %input.amount,
            days_included = plan.days_included,
            "Multi-day deposit created"
        );

        let movement = NewMovement {
            store_id: input.store_id,
            movement_date: plan.to_date,
            movement_type: MovementType::Deposit,
            account: AccountType::SalesCash,
            amount: -plan.accumulated_amount,
            reference_type: Some("cash_deposit".to_string()),
            reference_id: Some(created.deposit.id),
            description: Some(format!(
                "Deposit {} at {}",
                input.deposit_slip_number, input.bank_name
            )),
            created_by: input.deposited_by.clone(),
        };
        if let Err(e) = self.movements.append(movement).await {
            warn!(
                deposit_id = %created.deposit.id,
                error = %e,
                "Failed to record deposit movement"
            );
        }

        Ok(created)
    }

    async fn persist(
        &self,
        input: &CreateDepositInput,
        plan: &DepositPlan,
        count: Option<DepositCountCheck>,
        now: DateTime<Utc>,
    ) -> Result<DepositWithMappings, DepositError> {
        let now = now.fixed_offset();
        let deposit_id = Uuid::new_v4();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DepositError::Database(e.to_string()))?;

        let deposit = cash_deposits::ActiveModel {
            id: Set(deposit_id),
            store_id: Set(input.store_id),
            amount: Set(input.amount),
            deposit_slip_number: Set(input.deposit_slip_number.trim().to_string()),
            bank_name: Set(input.bank_name.trim().to_string()),
            deposited_by: Set(input.deposited_by.trim().to_string()),
            from_date: Set(plan.from_date),
            to_date: Set(plan.to_date),
            days_included: Set(i32::try_from(plan.days_included).unwrap_or(i32::MAX)),
            accumulated_amount: Set(plan.accumulated_amount),
            counted_amount: Set(count.as_ref().map(|c| c.counted)),
            count_variance: Set(count.as_ref().map(|c| c.variance)),
            variance_reason: Set(count.and_then(|c| c.reason)),
            notes: Set(input.notes.clone().filter(|n| !n.trim().is_empty())),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| DepositError::Database(e.to_string()))?;

        let mut mappings = Vec::with_capacity(plan.allocations.len());
        for allocation in &plan.allocations {
            let updated = daily_cash_positions::Entity::update_many()
                .col_expr(
                    daily_cash_positions::Column::DepositStatus,
                    Expr::value(DepositStatus::Deposited),
                )
                .col_expr(
                    daily_cash_positions::Column::DepositId,
                    Expr::value(Some(deposit_id)),
                )
                .col_expr(
                    daily_cash_positions::Column::DepositedAmount,
                    Expr::value(Some(allocation.amount_included)),
                )
                .col_expr(
                    daily_cash_positions::Column::DepositedAt,
                    Expr::value(Some(now)),
                )
                .col_expr(daily_cash_positions::Column::UpdatedAt, Expr::value(now))
                .filter(daily_cash_positions::Column::Id.eq(allocation.position_id))
                .filter(
                    daily_cash_positions::Column::DepositStatus.ne(DepositStatus::Deposited),
                )
                .exec(&txn)
                .await
                .map_err(|e| DepositError::Database(e.to_string()))?;

            if updated.rows_affected == 0 {
                warn!(
                    position_id = %allocation.position_id,
                    "Position deposited concurrently, rolling back deposit"
                );
                return Err(DepositError::AlreadyDeposited {
                    position_id: allocation.position_id,
                    business_date: allocation.business_date,
                });
            }

            let mapping = deposit_day_mappings::ActiveModel {
                id: Set(Uuid::new_v4()),
                deposit_id: Set(deposit_id),
                position_id: Set(allocation.position_id),
                business_date: Set(allocation.business_date),
                amount_included: Set(allocation.amount_included),
            }
            .insert(&txn)
            .await
            .map_err(|e| DepositError::Database(e.to_string()))?;
            mappings.push(mapping);
        }

        txn.commit()
            .await
            .map_err(|e| DepositError::Database(e.to_string()))?;

        Ok(DepositWithMappings { deposit, mappings })
    }

    /// Gets a deposit with its mappings.
    pub async fn get_deposit(&self, deposit_id: Uuid) -> Result<DepositWithMappings, DepositError> {
        let deposit = cash_deposits::Entity::find_by_id(deposit_id)
            .one(&self.db)
            .await
            .map_err(|e| DepositError::Database(e.to_string()))?
            .ok_or(DepositError::DepositNotFound(deposit_id))?;

        let mappings = deposit_day_mappings::Entity::find()
            .filter(deposit_day_mappings::Column::DepositId.eq(deposit_id))
            .order_by_asc(deposit_day_mappings::Column::BusinessDate)
            .all(&self.db)
            .await
            .map_err(|e| DepositError::Database(e.to_string()))?;

        Ok(DepositWithMappings { deposit, mappings })
    }

    /// Lists a store's deposits, most recent first.
    pub async fn list_deposits(
        &self,
        store_id: Uuid,
    ) -> Result<Vec<cash_deposits::Model>, DepositError> {
        cash_deposits::Entity::find()
            .filter(cash_deposits::Column::StoreId.eq(store_id))
            .order_by_desc(cash_deposits::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DepositError::Database(e.to_string()))
    }

    /// Pending positions and how urgently they need banking.
    pub async fn pending_summary(
        &self,
        store_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<PendingDeposits, DepositError> {
        let positions = daily_cash_positions::Entity::find()
            .filter(daily_cash_positions::Column::StoreId.eq(store_id))
            .filter(daily_cash_positions::Column::DepositStatus.eq(DepositStatus::Pending))
            .order_by_asc(daily_cash_positions::Column::BusinessDate)
            .all(&self.db)
            .await
            .map_err(|e| DepositError::Database(e.to_string()))?;

        let candidates: Vec<PositionForDeposit> = positions.iter().map(to_candidate).collect();
        let summary = DepositService::summarize_pending(
            &candidates,
            now,
            self.config.variance_base_tolerance,
            self.config.warning_days,
        );

        Ok(PendingDeposits { summary, positions })
    }
}

fn to_candidate(position: &daily_cash_positions::Model) -> PositionForDeposit {
    PositionForDeposit {
        id: position.id,
        business_date: position.business_date,
        closing_balance: position.closing_balance,
        status: deposit_status_to_core(&position.deposit_status),
    }
}
