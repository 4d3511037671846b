//! Movement log repository.
//!
//! Cash movements are append-only. The sum of an account's movements is
//! its canonical running balance.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use strongroom_core::ledger::{AccountType, MovementType};

use super::convert::{account_to_db, movement_type_to_db};
use crate::entities::cash_movements;

/// A movement about to be appended.
#[derive(Debug, Clone)]
pub struct NewMovement {
    /// Store the cash belongs to.
    pub store_id: Uuid,
    /// Business date of the movement.
    pub movement_date: NaiveDate,
    /// Movement type.
    pub movement_type: MovementType,
    /// Account affected.
    pub account: AccountType,
    /// Signed amount.
    pub amount: Decimal,
    /// Kind of record that caused the movement.
    pub reference_type: Option<String>,
    /// Id of that record.
    pub reference_id: Option<Uuid>,
    /// Free-text description.
    pub description: Option<String>,
    /// Who caused it.
    pub created_by: String,
}

/// Filter for listing movements.
#[derive(Debug, Clone, Default)]
pub struct MovementFilter {
    /// Restrict to one account.
    pub account: Option<AccountType>,
    /// Inclusive lower bound on the movement date.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on the movement date.
    pub to: Option<NaiveDate>,
}

/// Movement log repository.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    db: DatabaseConnection,
}

impl MovementRepository {
    /// Creates a new movement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends a movement.
    pub async fn append(&self, movement: NewMovement) -> Result<cash_movements::Model, DbErr> {
        append_on(&self.db, movement).await
    }

    /// Sum of an account's movements, optionally up to a date.
    ///
    /// Returns `None` when the account has no movements at all.
    pub async fn balance(
        &self,
        store_id: Uuid,
        account: AccountType,
        up_to: Option<NaiveDate>,
    ) -> Result<Option<Decimal>, DbErr> {
        balance_on(&self.db, store_id, account, up_to).await
    }

    /// Lists a store's movements, oldest first.
    pub async fn list(
        &self,
        store_id: Uuid,
        filter: MovementFilter,
    ) -> Result<Vec<cash_movements::Model>, DbErr> {
        let mut query =
            cash_movements::Entity::find().filter(cash_movements::Column::StoreId.eq(store_id));
        if let Some(account) = filter.account {
            query = query.filter(cash_movements::Column::AccountType.eq(account_to_db(account)));
        }
        if let Some(from) = filter.from {
            query = query.filter(cash_movements::Column::MovementDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(cash_movements::Column::MovementDate.lte(to));
        }

        query
            .order_by_asc(cash_movements::Column::MovementDate)
            .order_by_asc(cash_movements::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Movements caused by one record, e.g. a deposit or a transfer.
    pub async fn for_reference(
        &self,
        reference_type: &str,
        reference_id: Uuid,
    ) -> Result<Vec<cash_movements::Model>, DbErr> {
        cash_movements::Entity::find()
            .filter(cash_movements::Column::ReferenceType.eq(reference_type))
            .filter(cash_movements::Column::ReferenceId.eq(reference_id))
            .order_by_asc(cash_movements::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Number of movements a store has.
    pub async fn count(&self, store_id: Uuid) -> Result<u64, DbErr> {
        cash_movements::Entity::find()
            .filter(cash_movements::Column::StoreId.eq(store_id))
            .count(&self.db)
            .await
    }
}

/// Appends a movement on any connection, including an open transaction.
pub(crate) async fn append_on<C: ConnectionTrait>(
    conn: &C,
    movement: NewMovement,
) -> Result<cash_movements::Model, DbErr> {
    cash_movements::ActiveModel {
        id: Set(Uuid::new_v4()),
        store_id: Set(movement.store_id),
        movement_date: Set(movement.movement_date),
        movement_type: Set(movement_type_to_db(movement.movement_type)),
        account_type: Set(account_to_db(movement.account)),
        amount: Set(movement.amount),
        reference_type: Set(movement.reference_type),
        reference_id: Set(movement.reference_id),
        description: Set(movement.description),
        created_by: Set(movement.created_by),
        created_at: Set(Utc::now().fixed_offset()),
    }
    .insert(conn)
    .await
}

/// Sums an account's movements on any connection.
pub(crate) async fn balance_on<C: ConnectionTrait>(
    conn: &C,
    store_id: Uuid,
    account: AccountType,
    up_to: Option<NaiveDate>,
) -> Result<Option<Decimal>, DbErr> {
    let mut query = cash_movements::Entity::find()
        .filter(cash_movements::Column::StoreId.eq(store_id))
        .filter(cash_movements::Column::AccountType.eq(account_to_db(account)));
    if let Some(date) = up_to {
        query = query.filter(cash_movements::Column::MovementDate.lte(date));
    }

    let amounts: Vec<Decimal> = query
        .select_only()
        .column(cash_movements::Column::Amount)
        .into_tuple()
        .all(conn)
        .await?;

    if amounts.is_empty() {
        return Ok(None);
    }
    Ok(Some(amounts.into_iter().sum()))
}

/// Serializes balance-guarded writes to one store's account.
///
/// The lock is transaction-scoped and released on commit or rollback.
pub(crate) async fn lock_account_on<C: ConnectionTrait>(
    conn: &C,
    store_id: Uuid,
    account: AccountType,
) -> Result<(), DbErr> {
    let sql = format!(
        "SELECT pg_advisory_xact_lock(hashtext('{store_id}:{}'))",
        account.as_str()
    );
    conn.execute_unprepared(&sql).await?;
    Ok(())
}
