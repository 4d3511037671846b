//! Ledger store repository for daily cash positions.
//!
//! Positions are created lazily, one per store per business date, and are
//! kept in step with the movement log by every posting. A change to one
//! day's closing balance is carried through the run of consecutive days
//! that follow it, so each opening stays equal to the previous closing.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use strongroom_core::deposit::variance_tolerance;
use strongroom_core::ledger::{
    AccountType, CashFlowCategory, CountEvaluation, FlowDirection, LedgerError, MovementType,
    OpeningSeed, PositionFlows, previous_business_date,
};

use super::convert::category_column;
use super::movement::{NewMovement, append_on, balance_on, lock_account_on};
use crate::entities::{daily_cash_positions, sea_orm_active_enums::DepositStatus};

/// Ledger store repository.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets or creates the position for a store and business date.
    ///
    /// The opening balance is the previous day's closing balance, or zero
    /// when there is no previous day. Concurrent callers converge on a
    /// single row through the unique (store, date) constraint. Creating a
    /// day that an existing later day chains from re-seeds that later day.
    pub async fn ensure_position(
        &self,
        store_id: Uuid,
        business_date: NaiveDate,
    ) -> Result<daily_cash_positions::Model, LedgerError> {
        if let Some(existing) = self.get_position(store_id, business_date).await? {
            return Ok(existing);
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        let seed = opening_seed_on(&txn, store_id, business_date)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;
        let now = Utc::now().fixed_offset();

        let position = daily_cash_positions::ActiveModel {
            id: Set(Uuid::new_v4()),
            store_id: Set(store_id),
            business_date: Set(business_date),
            opening_balance: Set(seed.opening_balance),
            cash_sales: Set(Decimal::ZERO),
            so_advances: Set(Decimal::ZERO),
            gift_voucher_sales: Set(Decimal::ZERO),
            hand_bill_collections: Set(Decimal::ZERO),
            petty_transfers_in: Set(Decimal::ZERO),
            other_receipts: Set(Decimal::ZERO),
            cash_adjustments: Set(Decimal::ZERO),
            cash_returns: Set(Decimal::ZERO),
            cash_refunds: Set(Decimal::ZERO),
            petty_transfers_out: Set(Decimal::ZERO),
            cash_deposits: Set(Decimal::ZERO),
            closing_balance: Set(seed.opening_balance),
            deposit_status: Set(DepositStatus::Pending),
            deposit_id: Set(None),
            deposited_amount: Set(None),
            deposited_at: Set(None),
            counted_amount: Set(None),
            count_variance: Set(None),
            variance_reason: Set(None),
            variance_resolved: Set(false),
            is_bank_holiday: Set(false),
            holiday_name: Set(None),
            opening_gap: Set(seed.gap),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = daily_cash_positions::Entity::insert(position)
            .on_conflict(
                OnConflict::columns([
                    daily_cash_positions::Column::StoreId,
                    daily_cash_positions::Column::BusinessDate,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        if inserted > 0 {
            reseed_following_on(&txn, store_id, business_date, seed.opening_balance)
                .await
                .map_err(|e| LedgerError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        if inserted > 0 {
            debug!(
                store_id = %store_id,
                business_date = %business_date,
                opening_balance = %seed.opening_balance,
                opening_gap = seed.gap,
                "Created daily cash position"
            );
        }

        self.get_position(store_id, business_date)
            .await?
            .ok_or(LedgerError::PositionNotFound {
                store_id,
                business_date,
            })
    }

    /// Gets the position for a store and business date, if any.
    pub async fn get_position(
        &self,
        store_id: Uuid,
        business_date: NaiveDate,
    ) -> Result<Option<daily_cash_positions::Model>, LedgerError> {
        daily_cash_positions::Entity::find()
            .filter(daily_cash_positions::Column::StoreId.eq(store_id))
            .filter(daily_cash_positions::Column::BusinessDate.eq(business_date))
            .one(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))
    }

    /// Lists positions in an inclusive date range, most recent first.
    pub async fn positions_in_range(
        &self,
        store_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<daily_cash_positions::Model>, LedgerError> {
        if from > to {
            return Err(LedgerError::Validation(format!(
                "Range start {from} is after range end {to}"
            )));
        }

        daily_cash_positions::Entity::find()
            .filter(daily_cash_positions::Column::StoreId.eq(store_id))
            .filter(daily_cash_positions::Column::BusinessDate.gte(from))
            .filter(daily_cash_positions::Column::BusinessDate.lte(to))
            .order_by_desc(daily_cash_positions::Column::BusinessDate)
            .all(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))
    }

    /// Positions not yet banked, oldest first.
    pub async fn pending_positions(
        &self,
        store_id: Uuid,
    ) -> Result<Vec<daily_cash_positions::Model>, LedgerError> {
        daily_cash_positions::Entity::find()
            .filter(daily_cash_positions::Column::StoreId.eq(store_id))
            .filter(daily_cash_positions::Column::DepositStatus.eq(DepositStatus::Pending))
            .order_by_asc(daily_cash_positions::Column::BusinessDate)
            .all(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))
    }

    /// Records a posting against a category of the day's position.
    ///
    /// The category column and the closing balance move together, and a
    /// `posting` movement is appended on sales cash in the same transaction.
    /// Deposited positions are frozen, and so is any earlier day whose
    /// change would have to be carried into a deposited day.
    pub async fn post(
        &self,
        store_id: Uuid,
        business_date: NaiveDate,
        category: CashFlowCategory,
        amount: Decimal,
        posted_by: &str,
    ) -> Result<daily_cash_positions::Model, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::Validation(format!(
                "Posting amount must be positive, got {amount}"
            )));
        }
        if !category.is_postable() {
            return Err(LedgerError::Validation(format!(
                "{category} is maintained by completed adjustments and cannot be posted"
            )));
        }
        if posted_by.trim().is_empty() {
            return Err(LedgerError::Validation("posted_by is required".to_string()));
        }

        let position = self.ensure_position(store_id, business_date).await?;
        let signed = category.signed(amount);

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        lock_account_on(&txn, store_id, AccountType::SalesCash)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;
        let rollup = apply_rollup_on(&txn, store_id, business_date, category, amount)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;
        if let Rollup::Frozen(frozen) = rollup {
            return Err(LedgerError::PositionDeposited {
                store_id,
                business_date: frozen,
            });
        }

        append_on(
            &txn,
            NewMovement {
                store_id,
                movement_date: business_date,
                movement_type: MovementType::Posting,
                account: AccountType::SalesCash,
                amount: signed,
                reference_type: Some("daily_cash_position".to_string()),
                reference_id: Some(position.id),
                description: Some(category.as_str().to_string()),
                created_by: posted_by.to_string(),
            },
        )
        .await
        .map_err(|e| LedgerError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        debug!(
            store_id = %store_id,
            business_date = %business_date,
            category = %category,
            amount = %amount,
            "Posted to cash position"
        );

        self.get_position(store_id, business_date)
            .await?
            .ok_or(LedgerError::PositionNotFound {
                store_id,
                business_date,
            })
    }

    /// Adds a cash sale.
    pub async fn add_cash_sale(
        &self,
        store_id: Uuid,
        business_date: NaiveDate,
        amount: Decimal,
        posted_by: &str,
    ) -> Result<daily_cash_positions::Model, LedgerError> {
        self.post(store_id, business_date, CashFlowCategory::CashSales, amount, posted_by)
            .await
    }

    /// Adds a sales-order advance.
    pub async fn add_so_advance(
        &self,
        store_id: Uuid,
        business_date: NaiveDate,
        amount: Decimal,
        posted_by: &str,
    ) -> Result<daily_cash_positions::Model, LedgerError> {
        self.post(store_id, business_date, CashFlowCategory::SoAdvances, amount, posted_by)
            .await
    }

    /// Adds a gift voucher sale.
    pub async fn add_gift_voucher_sale(
        &self,
        store_id: Uuid,
        business_date: NaiveDate,
        amount: Decimal,
        posted_by: &str,
    ) -> Result<daily_cash_positions::Model, LedgerError> {
        self.post(
            store_id,
            business_date,
            CashFlowCategory::GiftVoucherSales,
            amount,
            posted_by,
        )
        .await
    }

    /// Adds a hand-bill collection.
    pub async fn add_hand_bill_collection(
        &self,
        store_id: Uuid,
        business_date: NaiveDate,
        amount: Decimal,
        posted_by: &str,
    ) -> Result<daily_cash_positions::Model, LedgerError> {
        self.post(
            store_id,
            business_date,
            CashFlowCategory::HandBillCollections,
            amount,
            posted_by,
        )
        .await
    }

    /// Adds a transfer in from petty cash.
    pub async fn add_petty_transfer_in(
        &self,
        store_id: Uuid,
        business_date: NaiveDate,
        amount: Decimal,
        posted_by: &str,
    ) -> Result<daily_cash_positions::Model, LedgerError> {
        self.post(
            store_id,
            business_date,
            CashFlowCategory::PettyTransfersIn,
            amount,
            posted_by,
        )
        .await
    }

    /// Adds a miscellaneous receipt.
    pub async fn add_other_receipt(
        &self,
        store_id: Uuid,
        business_date: NaiveDate,
        amount: Decimal,
        posted_by: &str,
    ) -> Result<daily_cash_positions::Model, LedgerError> {
        self.post(store_id, business_date, CashFlowCategory::OtherReceipts, amount, posted_by)
            .await
    }

    /// Adds a cash return.
    pub async fn add_cash_return(
        &self,
        store_id: Uuid,
        business_date: NaiveDate,
        amount: Decimal,
        posted_by: &str,
    ) -> Result<daily_cash_positions::Model, LedgerError> {
        self.post(store_id, business_date, CashFlowCategory::CashReturns, amount, posted_by)
            .await
    }

    /// Adds a cash refund.
    pub async fn add_cash_refund(
        &self,
        store_id: Uuid,
        business_date: NaiveDate,
        amount: Decimal,
        posted_by: &str,
    ) -> Result<daily_cash_positions::Model, LedgerError> {
        self.post(store_id, business_date, CashFlowCategory::CashRefunds, amount, posted_by)
            .await
    }

    /// Adds a transfer out to petty cash.
    pub async fn add_petty_transfer_out(
        &self,
        store_id: Uuid,
        business_date: NaiveDate,
        amount: Decimal,
        posted_by: &str,
    ) -> Result<daily_cash_positions::Model, LedgerError> {
        self.post(
            store_id,
            business_date,
            CashFlowCategory::PettyTransfersOut,
            amount,
            posted_by,
        )
        .await
    }

    /// Current balance of an account.
    ///
    /// The movement log is canonical. A store with no movements yet falls
    /// back to the latest closing balance for sales cash and zero for petty
    /// cash.
    pub async fn current_account_balance(
        &self,
        store_id: Uuid,
        account: AccountType,
    ) -> Result<Decimal, LedgerError> {
        account_balance_on(&self.db, store_id, account, None)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))
    }

    /// Cash the system expects on hand at the end of `date`.
    ///
    /// Counted amounts never affect this figure.
    pub async fn expected_cash_amount(
        &self,
        store_id: Uuid,
        account: AccountType,
        date: NaiveDate,
    ) -> Result<Decimal, LedgerError> {
        account_balance_on(&self.db, store_id, account, Some(date))
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))
    }

    /// Records a physical count against the day's closing balance.
    ///
    /// The tolerance scales with the number of pending days up to `date`.
    pub async fn record_cash_count(
        &self,
        store_id: Uuid,
        business_date: NaiveDate,
        counted_amount: Decimal,
        variance_reason: Option<String>,
        base_tolerance: Decimal,
    ) -> Result<(daily_cash_positions::Model, CountEvaluation), LedgerError> {
        let position = self.ensure_position(store_id, business_date).await?;

        let pending_days = daily_cash_positions::Entity::find()
            .filter(daily_cash_positions::Column::StoreId.eq(store_id))
            .filter(daily_cash_positions::Column::BusinessDate.lte(business_date))
            .filter(daily_cash_positions::Column::DepositStatus.eq(DepositStatus::Pending))
            .count(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;
        let days = u32::try_from(pending_days).unwrap_or(u32::MAX);

        let evaluation = CountEvaluation::evaluate(
            position.closing_balance,
            counted_amount,
            variance_tolerance(base_tolerance, days),
            variance_reason,
        )?;

        let updated = daily_cash_positions::Entity::update_many()
            .col_expr(
                daily_cash_positions::Column::CountedAmount,
                Expr::value(Some(evaluation.counted)),
            )
            .col_expr(
                daily_cash_positions::Column::CountVariance,
                Expr::value(Some(evaluation.variance)),
            )
            .col_expr(
                daily_cash_positions::Column::VarianceReason,
                Expr::value(evaluation.reason.clone()),
            )
            .col_expr(
                daily_cash_positions::Column::VarianceResolved,
                Expr::value(evaluation.is_resolved()),
            )
            .col_expr(
                daily_cash_positions::Column::UpdatedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(daily_cash_positions::Column::Id.eq(position.id))
            .exec(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        if updated.rows_affected == 0 {
            return Err(LedgerError::PositionNotFound {
                store_id,
                business_date,
            });
        }

        info!(
            store_id = %store_id,
            business_date = %business_date,
            counted = %evaluation.counted,
            variance = %evaluation.variance,
            tolerance = %evaluation.tolerance,
            "Recorded cash count"
        );

        let position = self
            .get_position(store_id, business_date)
            .await?
            .ok_or(LedgerError::PositionNotFound {
                store_id,
                business_date,
            })?;
        Ok((position, evaluation))
    }

    /// Marks a business date as a bank holiday.
    ///
    /// Allowed on deposited days since balances are not touched.
    pub async fn mark_bank_holiday(
        &self,
        store_id: Uuid,
        business_date: NaiveDate,
        holiday_name: &str,
    ) -> Result<daily_cash_positions::Model, LedgerError> {
        let name = holiday_name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation("holiday_name is required".to_string()));
        }

        let position = self.ensure_position(store_id, business_date).await?;

        daily_cash_positions::Entity::update_many()
            .col_expr(daily_cash_positions::Column::IsBankHoliday, Expr::value(true))
            .col_expr(
                daily_cash_positions::Column::HolidayName,
                Expr::value(Some(name.to_string())),
            )
            .col_expr(
                daily_cash_positions::Column::UpdatedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(daily_cash_positions::Column::Id.eq(position.id))
            .exec(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        self.get_position(store_id, business_date)
            .await?
            .ok_or(LedgerError::PositionNotFound {
                store_id,
                business_date,
            })
    }
}

/// Balance of an account on any connection, up to an optional date.
///
/// Falls back to the position rollup when the account has no movements.
pub(crate) async fn account_balance_on<C: ConnectionTrait>(
    conn: &C,
    store_id: Uuid,
    account: AccountType,
    up_to: Option<NaiveDate>,
) -> Result<Decimal, DbErr> {
    if let Some(balance) = balance_on(conn, store_id, account, up_to).await? {
        return Ok(balance);
    }

    match account {
        AccountType::PettyCash => Ok(Decimal::ZERO),
        AccountType::SalesCash => {
            let mut query = daily_cash_positions::Entity::find()
                .filter(daily_cash_positions::Column::StoreId.eq(store_id));
            if let Some(date) = up_to {
                query = query.filter(daily_cash_positions::Column::BusinessDate.lte(date));
            }
            let latest = query
                .order_by_desc(daily_cash_positions::Column::BusinessDate)
                .one(conn)
                .await?;
            Ok(latest.map_or(Decimal::ZERO, |p| p.closing_balance))
        }
    }
}

/// Reads the flow columns of a position.
#[must_use]
pub fn position_flows(position: &daily_cash_positions::Model) -> PositionFlows {
    PositionFlows {
        cash_sales: position.cash_sales,
        so_advances: position.so_advances,
        gift_voucher_sales: position.gift_voucher_sales,
        hand_bill_collections: position.hand_bill_collections,
        petty_transfers_in: position.petty_transfers_in,
        other_receipts: position.other_receipts,
        cash_adjustments: position.cash_adjustments,
        cash_returns: position.cash_returns,
        cash_refunds: position.cash_refunds,
        petty_transfers_out: position.petty_transfers_out,
        cash_deposits: position.cash_deposits,
    }
}

/// Signed delta a flow column contributes to the closing balance.
#[must_use]
pub fn closing_delta(category: CashFlowCategory, column_delta: Decimal) -> Decimal {
    match category.direction() {
        FlowDirection::Inflow => column_delta,
        FlowDirection::Outflow => -column_delta,
    }
}

/// Outcome of mirroring a flow on the daily positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rollup {
    /// The position and the days chained after it were updated.
    Applied,
    /// The deposited position on this date refused the change.
    Frozen(NaiveDate),
}

/// Applies a rollup column delta to a position inside an open transaction.
///
/// The closing delta is carried into the consecutive days that follow. On
/// `Frozen` some rows may already be updated; the caller must roll back.
pub(crate) async fn apply_rollup_on<C: ConnectionTrait>(
    conn: &C,
    store_id: Uuid,
    business_date: NaiveDate,
    category: CashFlowCategory,
    column_delta: Decimal,
) -> Result<Rollup, DbErr> {
    let column = category_column(category);
    let delta = closing_delta(category, column_delta);
    let result = daily_cash_positions::Entity::update_many()
        .col_expr(column, Expr::col(column).add(column_delta))
        .col_expr(
            daily_cash_positions::Column::ClosingBalance,
            Expr::col(daily_cash_positions::Column::ClosingBalance).add(delta),
        )
        .col_expr(
            daily_cash_positions::Column::UpdatedAt,
            Expr::value(Utc::now().fixed_offset()),
        )
        .filter(daily_cash_positions::Column::StoreId.eq(store_id))
        .filter(daily_cash_positions::Column::BusinessDate.eq(business_date))
        .filter(daily_cash_positions::Column::DepositStatus.ne(DepositStatus::Deposited))
        .exec(conn)
        .await?;
    if result.rows_affected == 0 {
        return Ok(Rollup::Frozen(business_date));
    }
    if delta.is_zero() {
        return Ok(Rollup::Applied);
    }

    let chained = chained_after_on(conn, store_id, business_date).await?;
    if let Some(frozen) = chained
        .iter()
        .find(|p| p.deposit_status == DepositStatus::Deposited)
    {
        return Ok(Rollup::Frozen(frozen.business_date));
    }
    shift_on(conn, chained.into_iter().map(|p| p.id).collect(), delta).await?;
    Ok(Rollup::Applied)
}

/// Seeds a new day from the previous day, locking that day's row.
async fn opening_seed_on<C: ConnectionTrait>(
    conn: &C,
    store_id: Uuid,
    business_date: NaiveDate,
) -> Result<OpeningSeed, DbErr> {
    let previous_closing = match previous_business_date(business_date) {
        Some(previous) => daily_cash_positions::Entity::find()
            .filter(daily_cash_positions::Column::StoreId.eq(store_id))
            .filter(daily_cash_positions::Column::BusinessDate.eq(previous))
            .lock_exclusive()
            .one(conn)
            .await?
            .map(|p| p.closing_balance),
        None => None,
    };

    let has_earlier = previous_closing.is_some()
        || daily_cash_positions::Entity::find()
            .filter(daily_cash_positions::Column::StoreId.eq(store_id))
            .filter(daily_cash_positions::Column::BusinessDate.lt(business_date))
            .count(conn)
            .await?
            > 0;

    Ok(OpeningSeed::from_previous(previous_closing, has_earlier))
}

/// Points the day after a newly created position at its closing balance.
///
/// Deposited days keep their opening balance and stop the carry.
async fn reseed_following_on<C: ConnectionTrait>(
    conn: &C,
    store_id: Uuid,
    business_date: NaiveDate,
    closing: Decimal,
) -> Result<(), DbErr> {
    let chained = chained_after_on(conn, store_id, business_date).await?;
    let Some(next) = chained.first() else {
        return Ok(());
    };
    if next.deposit_status == DepositStatus::Deposited {
        warn!(
            store_id = %store_id,
            business_date = %next.business_date,
            "Deposited position keeps its opening balance"
        );
        return Ok(());
    }

    let delta = closing - next.opening_balance;
    daily_cash_positions::Entity::update_many()
        .col_expr(daily_cash_positions::Column::OpeningBalance, Expr::value(closing))
        .col_expr(
            daily_cash_positions::Column::ClosingBalance,
            Expr::col(daily_cash_positions::Column::ClosingBalance).add(delta),
        )
        .col_expr(daily_cash_positions::Column::OpeningGap, Expr::value(false))
        .col_expr(
            daily_cash_positions::Column::UpdatedAt,
            Expr::value(Utc::now().fixed_offset()),
        )
        .filter(daily_cash_positions::Column::Id.eq(next.id))
        .exec(conn)
        .await?;
    if delta.is_zero() {
        return Ok(());
    }

    let rest: Vec<_> = chained[1..]
        .iter()
        .take_while(|p| p.deposit_status != DepositStatus::Deposited)
        .map(|p| p.id)
        .collect();
    if rest.len() + 1 < chained.len() {
        warn!(
            store_id = %store_id,
            business_date = %business_date,
            "Re-seed stopped at a deposited position"
        );
    }
    shift_on(conn, rest, delta).await
}

/// The consecutive days after `business_date`, oldest first, locked for update.
async fn chained_after_on<C: ConnectionTrait>(
    conn: &C,
    store_id: Uuid,
    business_date: NaiveDate,
) -> Result<Vec<daily_cash_positions::Model>, DbErr> {
    let later = daily_cash_positions::Entity::find()
        .filter(daily_cash_positions::Column::StoreId.eq(store_id))
        .filter(daily_cash_positions::Column::BusinessDate.gt(business_date))
        .order_by_asc(daily_cash_positions::Column::BusinessDate)
        .lock_exclusive()
        .all(conn)
        .await?;

    let mut previous = business_date;
    Ok(later
        .into_iter()
        .take_while(|p| {
            let consecutive = previous_business_date(p.business_date) == Some(previous);
            previous = p.business_date;
            consecutive
        })
        .collect())
}

/// Moves the opening and closing balances of the given positions by `delta`.
async fn shift_on<C: ConnectionTrait>(
    conn: &C,
    position_ids: Vec<Uuid>,
    delta: Decimal,
) -> Result<(), DbErr> {
    if position_ids.is_empty() {
        return Ok(());
    }
    daily_cash_positions::Entity::update_many()
        .col_expr(
            daily_cash_positions::Column::OpeningBalance,
            Expr::col(daily_cash_positions::Column::OpeningBalance).add(delta),
        )
        .col_expr(
            daily_cash_positions::Column::ClosingBalance,
            Expr::col(daily_cash_positions::Column::ClosingBalance).add(delta),
        )
        .col_expr(
            daily_cash_positions::Column::UpdatedAt,
            Expr::value(Utc::now().fixed_offset()),
        )
        .filter(daily_cash_positions::Column::Id.is_in(position_ids))
        .exec(conn)
        .await?;
    Ok(())
}
