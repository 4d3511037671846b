//! Approval workflow repository for cash transfers and adjustments.
//!
//! Status flips are optimistic: each transition updates the row only while
//! it still has the expected status, so two approvers cannot both win.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use strongroom_core::approval::{
    AdjustmentType, ApprovalAction, ApprovalError, ApprovalService, ApprovalStatus, CashEffect,
    Priority,
};
use strongroom_core::ledger::AccountType;

use super::convert::{
    account_to_core, account_to_db, adjustment_type_to_core, adjustment_type_to_db,
    approval_status_to_core, approval_status_to_db, priority_to_db,
};
use super::ledger::{LedgerRepository, Rollup, account_balance_on, apply_rollup_on};
use super::movement::{NewMovement, append_on, lock_account_on};
use crate::entities::{cash_adjustments, cash_transfers};

/// Input for requesting a transfer from sales cash to petty cash.
#[derive(Debug, Clone)]
pub struct SubmitTransferInput {
    /// Requesting store.
    pub store_id: Uuid,
    /// Amount to move.
    pub requested_amount: Decimal,
    /// Requested priority.
    pub priority: Priority,
    /// Why the money is needed.
    pub reason: Option<String>,
    /// Who is asking.
    pub requested_by: String,
}

/// Input for requesting a manual adjustment.
#[derive(Debug, Clone)]
pub struct SubmitAdjustmentInput {
    /// Requesting store.
    pub store_id: Uuid,
    /// Kind of adjustment.
    pub adjustment_type: AdjustmentType,
    /// Account to adjust.
    pub account: AccountType,
    /// Positive magnitude; the type decides the sign.
    pub requested_amount: Decimal,
    /// Why the adjustment is needed.
    pub reason: String,
    /// Requested priority; initial setup is always raised to high.
    pub priority: Priority,
    /// Who is asking.
    pub requested_by: String,
}

/// Approver's decision on a pending request.
#[derive(Debug, Clone)]
pub struct ApproveInput {
    /// Amount approved; defaults to the requested amount.
    pub approved_amount: Option<Decimal>,
    /// Who approved.
    pub approved_by: String,
    /// Optional notes.
    pub notes: Option<String>,
}

/// Request kind, used to name the row in errors.
#[derive(Debug, Clone, Copy)]
enum RequestKind {
    Transfer,
    Adjustment,
}

/// Approval workflow repository.
#[derive(Debug, Clone)]
pub struct ApprovalRepository {
    db: DatabaseConnection,
    ledger: LedgerRepository,
}

impl ApprovalRepository {
    /// Creates a new approval repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            ledger: LedgerRepository::new(db.clone()),
            db,
        }
    }

    // ========================================================================
    // Transfers
    // ========================================================================

    /// Submits a transfer request, snapshotting both balances.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientFunds` if the request exceeds current sales cash.
    pub async fn submit_transfer(
        &self,
        input: SubmitTransferInput,
        now: DateTime<Utc>,
    ) -> Result<cash_transfers::Model, ApprovalError> {
        let sales_cash = self.balance(input.store_id, AccountType::SalesCash).await?;
        let petty_cash = self.balance(input.store_id, AccountType::PettyCash).await?;

        ApprovalService::validate_transfer(input.requested_amount, &input.requested_by, sales_cash)?;

        let now = now.fixed_offset();
        let transfer = cash_transfers::ActiveModel {
            id: Set(Uuid::new_v4()),
            store_id: Set(input.store_id),
            requested_amount: Set(input.requested_amount),
            approved_amount: Set(None),
            status: Set(approval_status_to_db(ApprovalStatus::Pending)),
            priority: Set(priority_to_db(input.priority)),
            reason: Set(input.reason.filter(|r| !r.trim().is_empty())),
            requested_by: Set(input.requested_by.trim().to_string()),
            approved_by: Set(None),
            approval_date: Set(None),
            approval_notes: Set(None),
            completed_by: Set(None),
            completed_at: Set(None),
            sales_cash_balance: Set(sales_cash),
            petty_cash_balance: Set(petty_cash),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| ApprovalError::Database(e.to_string()))?;

        info!(
            store_id = %transfer.store_id,
            transfer_id = %transfer.id,
            amount = %transfer.requested_amount,
            "Cash transfer requested"
        );
        Ok(transfer)
    }

    /// Gets a transfer.
    pub async fn get_transfer(&self, id: Uuid) -> Result<cash_transfers::Model, ApprovalError> {
        cash_transfers::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ApprovalError::Database(e.to_string()))?
            .ok_or(ApprovalError::TransferNotFound(id))
    }

    /// Lists a store's transfers, newest first.
    pub async fn list_transfers(
        &self,
        store_id: Uuid,
        status: Option<ApprovalStatus>,
    ) -> Result<Vec<cash_transfers::Model>, ApprovalError> {
        let mut query =
            cash_transfers::Entity::find().filter(cash_transfers::Column::StoreId.eq(store_id));
        if let Some(status) = status {
            query = query.filter(cash_transfers::Column::Status.eq(approval_status_to_db(status)));
        }
        query
            .order_by_desc(cash_transfers::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| ApprovalError::Database(e.to_string()))
    }

    /// Approves a pending transfer.
    ///
    /// # Errors
    ///
    /// Returns `WouldUnderflow` if the approved amount exceeds current sales
    /// cash, and `InvalidTransition` if the transfer is no longer pending.
    pub async fn approve_transfer(
        &self,
        id: Uuid,
        input: ApproveInput,
        now: DateTime<Utc>,
    ) -> Result<cash_transfers::Model, ApprovalError> {
        let transfer = self.get_transfer(id).await?;
        let current = approval_status_to_core(&transfer.status);

        let action = ApprovalService::approve(
            current,
            transfer.requested_amount,
            input.approved_amount,
            &input.approved_by,
            input.notes,
            now,
        )?;
        let ApprovalAction::Approve {
            approved_amount,
            approved_by,
            approval_date,
            approval_notes,
            ..
        } = action
        else {
            return Err(ApprovalError::InvalidTransition {
                from: current,
                to: ApprovalStatus::Approved,
            });
        };

        let sales_cash = self.balance(transfer.store_id, AccountType::SalesCash).await?;
        ApprovalService::ensure_no_underflow(AccountType::SalesCash, sales_cash, -approved_amount)?;

        let result = cash_transfers::Entity::update_many()
            .col_expr(
                cash_transfers::Column::Status,
                Expr::value(approval_status_to_db(ApprovalStatus::Approved)),
            )
            .col_expr(
                cash_transfers::Column::ApprovedAmount,
                Expr::value(Some(approved_amount)),
            )
            .col_expr(cash_transfers::Column::ApprovedBy, Expr::value(Some(approved_by)))
            .col_expr(
                cash_transfers::Column::ApprovalDate,
                Expr::value(Some(approval_date.fixed_offset())),
            )
            .col_expr(cash_transfers::Column::ApprovalNotes, Expr::value(approval_notes))
            .col_expr(
                cash_transfers::Column::UpdatedAt,
                Expr::value(now.fixed_offset()),
            )
            .filter(cash_transfers::Column::Id.eq(id))
            .filter(
                cash_transfers::Column::Status.eq(approval_status_to_db(ApprovalStatus::Pending)),
            )
            .exec(&self.db)
            .await
            .map_err(|e| ApprovalError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(self.lost_race(RequestKind::Transfer, id, ApprovalStatus::Approved).await);
        }

        info!(transfer_id = %id, amount = %approved_amount, "Cash transfer approved");
        self.get_transfer(id).await
    }

    /// Rejects a pending transfer. Notes are required.
    pub async fn reject_transfer(
        &self,
        id: Uuid,
        approved_by: &str,
        notes: &str,
        now: DateTime<Utc>,
    ) -> Result<cash_transfers::Model, ApprovalError> {
        let transfer = self.get_transfer(id).await?;
        let current = approval_status_to_core(&transfer.status);
        let ApprovalAction::Reject {
            new_status,
            approved_by,
            approval_date,
            approval_notes,
        } = ApprovalService::reject(current, approved_by, notes, now)?
        else {
            return Err(ApprovalError::InvalidTransition {
                from: current,
                to: ApprovalStatus::Rejected,
            });
        };

        let result = cash_transfers::Entity::update_many()
            .col_expr(
                cash_transfers::Column::Status,
                Expr::value(approval_status_to_db(new_status)),
            )
            .col_expr(cash_transfers::Column::ApprovedBy, Expr::value(Some(approved_by)))
            .col_expr(
                cash_transfers::Column::ApprovalDate,
                Expr::value(Some(approval_date.fixed_offset())),
            )
            .col_expr(
                cash_transfers::Column::ApprovalNotes,
                Expr::value(Some(approval_notes)),
            )
            .col_expr(
                cash_transfers::Column::UpdatedAt,
                Expr::value(now.fixed_offset()),
            )
            .filter(cash_transfers::Column::Id.eq(id))
            .filter(
                cash_transfers::Column::Status.eq(approval_status_to_db(ApprovalStatus::Pending)),
            )
            .exec(&self.db)
            .await
            .map_err(|e| ApprovalError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(self.lost_race(RequestKind::Transfer, id, ApprovalStatus::Rejected).await);
        }

        info!(transfer_id = %id, "Cash transfer rejected");
        self.get_transfer(id).await
    }

    /// Completes an approved transfer.
    ///
    /// Moves the approved amount from sales cash to petty cash and mirrors
    /// the outflow on the business date's position, all in one transaction.
    pub async fn complete_transfer(
        &self,
        id: Uuid,
        completed_by: &str,
        business_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<cash_transfers::Model, ApprovalError> {
        let transfer = self.get_transfer(id).await?;
        let current = approval_status_to_core(&transfer.status);
        let ApprovalAction::Complete {
            new_status,
            completed_by,
            completed_at,
        } = ApprovalService::complete(current, completed_by, now)?
        else {
            return Err(ApprovalError::InvalidTransition {
                from: current,
                to: ApprovalStatus::Completed,
            });
        };

        let amount = transfer.approved_amount.unwrap_or(transfer.requested_amount);
        let effects = ApprovalService::transfer_effects(amount);
        self.ensure_rollup_position(transfer.store_id, business_date, &effects)
            .await?;

        let txn = self.begin().await?;

        lock_account_on(&txn, transfer.store_id, AccountType::SalesCash)
            .await
            .map_err(|e| ApprovalError::Database(e.to_string()))?;
        let sales_cash = account_balance_on(&txn, transfer.store_id, AccountType::SalesCash, None)
            .await
            .map_err(|e| ApprovalError::Database(e.to_string()))?;
        ApprovalService::ensure_no_underflow(AccountType::SalesCash, sales_cash, -amount)?;

        let result = cash_transfers::Entity::update_many()
            .col_expr(
                cash_transfers::Column::Status,
                Expr::value(approval_status_to_db(new_status)),
            )
            .col_expr(
                cash_transfers::Column::CompletedBy,
                Expr::value(Some(completed_by.clone())),
            )
            .col_expr(
                cash_transfers::Column::CompletedAt,
                Expr::value(Some(completed_at.fixed_offset())),
            )
            .col_expr(
                cash_transfers::Column::UpdatedAt,
                Expr::value(now.fixed_offset()),
            )
            .filter(cash_transfers::Column::Id.eq(id))
            .filter(
                cash_transfers::Column::Status.eq(approval_status_to_db(ApprovalStatus::Approved)),
            )
            .exec(&txn)
            .await
            .map_err(|e| ApprovalError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            drop(txn);
            return Err(self.lost_race(RequestKind::Transfer, id, ApprovalStatus::Completed).await);
        }

        apply_effects(
            &txn,
            transfer.store_id,
            business_date,
            &effects,
            "cash_transfer",
            id,
            &completed_by,
        )
        .await?;

        txn.commit()
            .await
            .map_err(|e| ApprovalError::Database(e.to_string()))?;

        info!(
            transfer_id = %id,
            store_id = %transfer.store_id,
            amount = %amount,
            "Cash transfer completed"
        );
        self.get_transfer(id).await
    }

    // ========================================================================
    // Adjustments
    // ========================================================================

    /// Submits an adjustment request, snapshotting the account balance.
    pub async fn submit_adjustment(
        &self,
        input: SubmitAdjustmentInput,
        now: DateTime<Utc>,
    ) -> Result<cash_adjustments::Model, ApprovalError> {
        let priority = ApprovalService::validate_adjustment(
            input.adjustment_type,
            input.requested_amount,
            &input.requested_by,
            &input.reason,
            input.priority,
        )?;
        let snapshot = self.balance(input.store_id, input.account).await?;

        let now = now.fixed_offset();
        let adjustment = cash_adjustments::ActiveModel {
            id: Set(Uuid::new_v4()),
            store_id: Set(input.store_id),
            adjustment_type: Set(adjustment_type_to_db(input.adjustment_type)),
            account_type: Set(account_to_db(input.account)),
            requested_amount: Set(input.requested_amount),
            approved_amount: Set(None),
            reason: Set(input.reason.trim().to_string()),
            status: Set(approval_status_to_db(ApprovalStatus::Pending)),
            priority: Set(priority_to_db(priority)),
            requested_by: Set(input.requested_by.trim().to_string()),
            approved_by: Set(None),
            approval_date: Set(None),
            approval_notes: Set(None),
            completed_by: Set(None),
            completed_at: Set(None),
            balance_snapshot: Set(snapshot),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| ApprovalError::Database(e.to_string()))?;

        info!(
            store_id = %adjustment.store_id,
            adjustment_id = %adjustment.id,
            adjustment_type = %input.adjustment_type,
            amount = %adjustment.requested_amount,
            priority = %priority,
            "Cash adjustment requested"
        );
        Ok(adjustment)
    }

    /// Gets an adjustment.
    pub async fn get_adjustment(
        &self,
        id: Uuid,
    ) -> Result<cash_adjustments::Model, ApprovalError> {
        cash_adjustments::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ApprovalError::Database(e.to_string()))?
            .ok_or(ApprovalError::AdjustmentNotFound(id))
    }

    /// Lists a store's adjustments, newest first.
    pub async fn list_adjustments(
        &self,
        store_id: Uuid,
        status: Option<ApprovalStatus>,
    ) -> Result<Vec<cash_adjustments::Model>, ApprovalError> {
        let mut query =
            cash_adjustments::Entity::find().filter(cash_adjustments::Column::StoreId.eq(store_id));
        if let Some(status) = status {
            query =
                query.filter(cash_adjustments::Column::Status.eq(approval_status_to_db(status)));
        }
        query
            .order_by_desc(cash_adjustments::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| ApprovalError::Database(e.to_string()))
    }

    /// Approves a pending adjustment.
    ///
    /// # Errors
    ///
    /// Returns `WouldUnderflow` if the signed amount would take the account
    /// below zero, and `InvalidTransition` if it is no longer pending.
    pub async fn approve_adjustment(
        &self,
        id: Uuid,
        input: ApproveInput,
        now: DateTime<Utc>,
    ) -> Result<cash_adjustments::Model, ApprovalError> {
        let adjustment = self.get_adjustment(id).await?;
        let current = approval_status_to_core(&adjustment.status);

        let action = ApprovalService::approve(
            current,
            adjustment.requested_amount,
            input.approved_amount,
            &input.approved_by,
            input.notes,
            now,
        )?;
        let ApprovalAction::Approve {
            approved_amount,
            approved_by,
            approval_date,
            approval_notes,
            ..
        } = action
        else {
            return Err(ApprovalError::InvalidTransition {
                from: current,
                to: ApprovalStatus::Approved,
            });
        };

        let account = account_to_core(&adjustment.account_type);
        let signed = adjustment_type_to_core(&adjustment.adjustment_type).signed_amount(approved_amount);
        let balance = self.balance(adjustment.store_id, account).await?;
        ApprovalService::ensure_no_underflow(account, balance, signed)?;

        let result = cash_adjustments::Entity::update_many()
            .col_expr(
                cash_adjustments::Column::Status,
                Expr::value(approval_status_to_db(ApprovalStatus::Approved)),
            )
            .col_expr(
                cash_adjustments::Column::ApprovedAmount,
                Expr::value(Some(approved_amount)),
            )
            .col_expr(cash_adjustments::Column::ApprovedBy, Expr::value(Some(approved_by)))
            .col_expr(
                cash_adjustments::Column::ApprovalDate,
                Expr::value(Some(approval_date.fixed_offset())),
            )
            .col_expr(cash_adjustments::Column::ApprovalNotes, Expr::value(approval_notes))
            .col_expr(
                cash_adjustments::Column::UpdatedAt,
                Expr::value(now.fixed_offset()),
            )
            .filter(cash_adjustments::Column::Id.eq(id))
            .filter(
                cash_adjustments::Column::Status
                    .eq(approval_status_to_db(ApprovalStatus::Pending)),
            )
            .exec(&self.db)
            .await
            .map_err(|e| ApprovalError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(
                self.lost_race(RequestKind::Adjustment, id, ApprovalStatus::Approved)
                    .await,
            );
        }

        info!(adjustment_id = %id, amount = %signed, "Cash adjustment approved");
        self.get_adjustment(id).await
    }

    /// Rejects a pending adjustment. Notes are required.
    pub async fn reject_adjustment(
        &self,
        id: Uuid,
        approved_by: &str,
        notes: &str,
        now: DateTime<Utc>,
    ) -> Result<cash_adjustments::Model, ApprovalError> {
        let adjustment = self.get_adjustment(id).await?;
        let current = approval_status_to_core(&adjustment.status);
        let ApprovalAction::Reject {
            new_status,
            approved_by,
            approval_date,
            approval_notes,
        } = ApprovalService::reject(current, approved_by, notes, now)?
        else {
            return Err(ApprovalError::InvalidTransition {
                from: current,
                to: ApprovalStatus::Rejected,
            });
        };

        let result = cash_adjustments::Entity::update_many()
            .col_expr(
                cash_adjustments::Column::Status,
                Expr::value(approval_status_to_db(new_status)),
            )
            .col_expr(cash_adjustments::Column::ApprovedBy, Expr::value(Some(approved_by)))
            .col_expr(
                cash_adjustments::Column::ApprovalDate,
                Expr::value(Some(approval_date.fixed_offset())),
            )
            .col_expr(
                cash_adjustments::Column::ApprovalNotes,
                Expr::value(Some(approval_notes)),
            )
            .col_expr(
                cash_adjustments::Column::UpdatedAt,
                Expr::value(now.fixed_offset()),
            )
            .filter(cash_adjustments::Column::Id.eq(id))
            .filter(
                cash_adjustments::Column::Status
                    .eq(approval_status_to_db(ApprovalStatus::Pending)),
            )
            .exec(&self.db)
            .await
            .map_err(|e| ApprovalError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(
                self.lost_race(RequestKind::Adjustment, id, ApprovalStatus::Rejected)
                    .await,
            );
        }

        info!(adjustment_id = %id, "Cash adjustment rejected");
        self.get_adjustment(id).await
    }

    /// Completes an approved adjustment.
    ///
    /// Appends one signed movement on the named account; sales-cash
    /// adjustments are also mirrored on the business date's position.
    pub async fn complete_adjustment(
        &self,
        id: Uuid,
        completed_by: &str,
        business_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<cash_adjustments::Model, ApprovalError> {
        let adjustment = self.get_adjustment(id).await?;
        let current = approval_status_to_core(&adjustment.status);
        let ApprovalAction::Complete {
            new_status,
            completed_by,
            completed_at,
        } = ApprovalService::complete(current, completed_by, now)?
        else {
            return Err(ApprovalError::InvalidTransition {
                from: current,
                to: ApprovalStatus::Completed,
            });
        };

        let account = account_to_core(&adjustment.account_type);
        let magnitude = adjustment
            .approved_amount
            .unwrap_or(adjustment.requested_amount);
        let effect = ApprovalService::adjustment_effect(
            adjustment_type_to_core(&adjustment.adjustment_type),
            account,
            magnitude,
        );
        let effects = [effect];
        self.ensure_rollup_position(adjustment.store_id, business_date, &effects)
            .await?;

        let txn = self.begin().await?;

        lock_account_on(&txn, adjustment.store_id, account)
            .await
            .map_err(|e| ApprovalError::Database(e.to_string()))?;
        let balance = account_balance_on(&txn, adjustment.store_id, account, None)
            .await
            .map_err(|e| ApprovalError::Database(e.to_string()))?;
        ApprovalService::ensure_no_underflow(account, balance, effect.amount)?;

        let result = cash_adjustments::Entity::update_many()
            .col_expr(
                cash_adjustments::Column::Status,
                Expr::value(approval_status_to_db(new_status)),
            )
            .col_expr(
                cash_adjustments::Column::CompletedBy,
                Expr::value(Some(completed_by.clone())),
            )
            .col_expr(
                cash_adjustments::Column::CompletedAt,
                Expr::value(Some(completed_at.fixed_offset())),
            )
            .col_expr(
                cash_adjustments::Column::UpdatedAt,
                Expr::value(now.fixed_offset()),
            )
            .filter(cash_adjustments::Column::Id.eq(id))
            .filter(
                cash_adjustments::Column::Status
                    .eq(approval_status_to_db(ApprovalStatus::Approved)),
            )
            .exec(&txn)
            .await
            .map_err(|e| ApprovalError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            drop(txn);
            return Err(
                self.lost_race(RequestKind::Adjustment, id, ApprovalStatus::Completed)
                    .await,
            );
        }

        apply_effects(
            &txn,
            adjustment.store_id,
            business_date,
            &effects,
            "cash_adjustment",
            id,
            &completed_by,
        )
        .await?;

        txn.commit()
            .await
            .map_err(|e| ApprovalError::Database(e.to_string()))?;

        info!(
            adjustment_id = %id,
            store_id = %adjustment.store_id,
            account = %account,
            amount = %effect.amount,
            "Cash adjustment completed"
        );
        self.get_adjustment(id).await
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn balance(&self, store_id: Uuid, account: AccountType) -> Result<Decimal, ApprovalError> {
        account_balance_on(&self.db, store_id, account, None)
            .await
            .map_err(|e| ApprovalError::Database(e.to_string()))
    }

    async fn begin(&self) -> Result<DatabaseTransaction, ApprovalError> {
        self.db
            .begin()
            .await
            .map_err(|e| ApprovalError::Database(e.to_string()))
    }

    /// Ensures the position that mirrors the effects exists, if any effect has a rollup.
    async fn ensure_rollup_position(
        &self,
        store_id: Uuid,
        business_date: NaiveDate,
        effects: &[CashEffect],
    ) -> Result<(), ApprovalError> {
        if effects.iter().all(|e| e.rollup.is_none()) {
            return Ok(());
        }
        self.ledger.ensure_position(store_id, business_date).await?;
        Ok(())
    }

    /// Builds the error for a conditional update that matched no row.
    async fn lost_race(&self, kind: RequestKind, id: Uuid, to: ApprovalStatus) -> ApprovalError {
        let observed = match kind {
            RequestKind::Transfer => self
                .get_transfer(id)
                .await
                .map(|t| approval_status_to_core(&t.status)),
            RequestKind::Adjustment => self
                .get_adjustment(id)
                .await
                .map(|a| approval_status_to_core(&a.status)),
        };

        match observed {
            Ok(from) => {
                warn!(request_id = %id, from = %from, to = %to, "Lost approval race");
                ApprovalError::InvalidTransition { from, to }
            }
            Err(e) => e,
        }
    }
}

/// Appends the movements and rollup updates for a completed request.
async fn apply_effects<C: ConnectionTrait>(
    conn: &C,
    store_id: Uuid,
    business_date: NaiveDate,
    effects: &[CashEffect],
    reference_type: &str,
    reference_id: Uuid,
    created_by: &str,
) -> Result<(), ApprovalError> {
    for effect in effects {
        append_on(
            conn,
            NewMovement {
                store_id,
                movement_date: business_date,
                movement_type: effect.movement_type,
                account: effect.account,
                amount: effect.amount,
                reference_type: Some(reference_type.to_string()),
                reference_id: Some(reference_id),
                description: None,
                created_by: created_by.to_string(),
            },
        )
        .await
        .map_err(|e| ApprovalError::Database(e.to_string()))?;

        if let Some((category, delta)) = effect.rollup_delta() {
            let rollup = apply_rollup_on(conn, store_id, business_date, category, delta)
                .await
                .map_err(|e| ApprovalError::Database(e.to_string()))?;
            if let Rollup::Frozen(frozen) = rollup {
                return Err(ApprovalError::PositionDeposited {
                    store_id,
                    business_date: frozen,
                });
            }
        }
    }
    Ok(())
}
