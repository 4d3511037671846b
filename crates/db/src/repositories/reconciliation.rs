//! Reconciliation repository across the six transaction tables.
//!
//! Each table is reached through a [`ReconciliationHandler`] looked up by
//! [`TransactionKind`]. One generic handler serves every table that
//! implements [`ReconcilableEntity`].

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use futures::future::join_all;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select,
};
use tracing::{info, warn};
use uuid::Uuid;

use strongroom_core::reconciliation::{
    BatchItem, BatchOutcome, KindCounts, PendingTransaction, ReconcileData, ReconcileOutcome,
    ReconciliationError, ReconciliationService, ReconciliationSource, ReconciliationStatus,
    ReconciliationSummary, ResolvedReconcile, TransactionKind,
};

use super::convert::{reconciliation_status_to_db, source_to_db};
use crate::entities::{expenses, gift_vouchers, hand_bills, returns, sales, sales_orders};

/// Columns shared by every reconcilable table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileField {
    /// Primary key.
    Id,
    /// Owning store.
    StoreId,
    /// Business date.
    BusinessDate,
    /// `pending` or `reconciled`.
    Status,
    /// Who reconciled the row.
    ReconciledBy,
    /// When it was reconciled.
    ReconciledAt,
    /// External system it was matched against.
    Source,
    /// Free-form notes.
    Notes,
    /// Identifier in the external system.
    ExternalReference,
    /// Row creation time.
    CreatedAt,
}

/// A `SeaORM` entity carrying the reconciliation columns.
pub trait ReconcilableEntity: EntityTrait {
    /// Kind routed to this table.
    const KIND: TransactionKind;

    /// Maps a shared field to this table's column.
    fn column(field: ReconcileField) -> Self::Column;

    /// Projects a row into the kind-agnostic pending view.
    fn to_pending(model: Self::Model) -> PendingTransaction;
}

macro_rules! reconcilable_entity {
    ($module:ident, $kind:expr) => {
        impl ReconcilableEntity for $module::Entity {
            const KIND: TransactionKind = $kind;

            fn column(field: ReconcileField) -> Self::Column {
                match field {
                    ReconcileField::Id => $module::Column::Id,
                    ReconcileField::StoreId => $module::Column::StoreId,
                    ReconcileField::BusinessDate => $module::Column::BusinessDate,
                    ReconcileField::Status => $module::Column::ReconciliationStatus,
                    ReconcileField::ReconciledBy => $module::Column::ReconciledBy,
                    ReconcileField::ReconciledAt => $module::Column::ReconciledAt,
                    ReconcileField::Source => $module::Column::ReconciliationSource,
                    ReconcileField::Notes => $module::Column::ReconciliationNotes,
                    ReconcileField::ExternalReference => $module::Column::ExternalReference,
                    ReconcileField::CreatedAt => $module::Column::CreatedAt,
                }
            }

            fn to_pending(model: Self::Model) -> PendingTransaction {
                PendingTransaction {
                    id: model.id,
                    kind: Self::KIND,
                    store_id: model.store_id,
                    business_date: model.business_date,
                    amount: model.amount,
                    reference_number: model.reference_number,
                    description: model.description,
                    created_at: model.created_at.with_timezone(&Utc),
                }
            }
        }
    };
}

reconcilable_entity!(sales, TransactionKind::Sale);
reconcilable_entity!(expenses, TransactionKind::Expense);
reconcilable_entity!(returns, TransactionKind::Return);
reconcilable_entity!(hand_bills, TransactionKind::HandBill);
reconcilable_entity!(gift_vouchers, TransactionKind::GiftVoucher);
reconcilable_entity!(sales_orders, TransactionKind::SalesOrder);

/// Storage operations for one transaction kind.
#[async_trait]
pub trait ReconciliationHandler: Send + Sync {
    /// Kind served by this handler.
    fn kind(&self) -> TransactionKind;

    /// Unreconciled rows for a business date. Empty `store_ids` means all stores.
    async fn pending(
        &self,
        db: &DatabaseConnection,
        business_date: NaiveDate,
        store_ids: &[Uuid],
    ) -> Result<Vec<PendingTransaction>, DbErr>;

    /// Flips one row from pending to reconciled.
    async fn reconcile(
        &self,
        db: &DatabaseConnection,
        id: Uuid,
        data: &ResolvedReconcile,
        now: DateTime<Utc>,
    ) -> Result<ReconcileOutcome, DbErr>;

    /// Row counts by status in an inclusive date range.
    async fn counts(
        &self,
        db: &DatabaseConnection,
        from: NaiveDate,
        to: NaiveDate,
        store_ids: &[Uuid],
    ) -> Result<KindCounts, DbErr>;
}

/// Handler for any [`ReconcilableEntity`].
pub struct EntityHandler<E>(PhantomData<fn() -> E>);

impl<E> EntityHandler<E> {
    /// Creates a handler.
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<E> Default for EntityHandler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ReconcilableEntity> EntityHandler<E> {
    fn scoped(query: Select<E>, store_ids: &[Uuid]) -> Select<E> {
        if store_ids.is_empty() {
            query
        } else {
            query.filter(E::column(ReconcileField::StoreId).is_in(store_ids.iter().copied()))
        }
    }

    fn with_status(status: ReconciliationStatus) -> sea_orm::Condition {
        sea_orm::Condition::all()
            .add(E::column(ReconcileField::Status).eq(reconciliation_status_to_db(status)))
    }
}

#[async_trait]
impl<E> ReconciliationHandler for EntityHandler<E>
where
    E: ReconcilableEntity,
    E::Model: Sync,
{
    fn kind(&self) -> TransactionKind {
        E::KIND
    }

    async fn pending(
        &self,
        db: &DatabaseConnection,
        business_date: NaiveDate,
        store_ids: &[Uuid],
    ) -> Result<Vec<PendingTransaction>, DbErr> {
        let query = E::find()
            .filter(Self::with_status(ReconciliationStatus::Pending))
            .filter(E::column(ReconcileField::BusinessDate).eq(business_date));
        let rows = Self::scoped(query, store_ids)
            .order_by_asc(E::column(ReconcileField::CreatedAt))
            .all(db)
            .await?;
        Ok(rows.into_iter().map(E::to_pending).collect())
    }

    async fn reconcile(
        &self,
        db: &DatabaseConnection,
        id: Uuid,
        data: &ResolvedReconcile,
        now: DateTime<Utc>,
    ) -> Result<ReconcileOutcome, DbErr> {
        let result = E::update_many()
            .col_expr(
                E::column(ReconcileField::Status),
                Expr::value(reconciliation_status_to_db(ReconciliationStatus::Reconciled)),
            )
            .col_expr(
                E::column(ReconcileField::ReconciledBy),
                Expr::value(Some(data.reconciled_by.clone())),
            )
            .col_expr(
                E::column(ReconcileField::ReconciledAt),
                Expr::value(Some(now.fixed_offset())),
            )
            .col_expr(
                E::column(ReconcileField::Source),
                Expr::value(source_to_db(data.source)),
            )
            .col_expr(
                E::column(ReconcileField::Notes),
                Expr::value(data.notes.clone()),
            )
            .col_expr(
                E::column(ReconcileField::ExternalReference),
                Expr::value(data.external_reference.clone()),
            )
            .filter(E::column(ReconcileField::Id).eq(id))
            .filter(Self::with_status(ReconciliationStatus::Pending))
            .exec(db)
            .await?;

        if result.rows_affected > 0 {
            return Ok(ReconcileOutcome::Reconciled);
        }

        let exists = E::find()
            .filter(E::column(ReconcileField::Id).eq(id))
            .count(db)
            .await?
            > 0;
        Ok(if exists {
            ReconcileOutcome::AlreadyReconciled
        } else {
            ReconcileOutcome::NotFound
        })
    }

    async fn counts(
        &self,
        db: &DatabaseConnection,
        from: NaiveDate,
        to: NaiveDate,
        store_ids: &[Uuid],
    ) -> Result<KindCounts, DbErr> {
        let in_range = || {
            Self::scoped(
                E::find()
                    .filter(E::column(ReconcileField::BusinessDate).gte(from))
                    .filter(E::column(ReconcileField::BusinessDate).lte(to)),
                store_ids,
            )
        };

        let pending = in_range()
            .filter(Self::with_status(ReconciliationStatus::Pending))
            .count(db)
            .await?;
        let reconciled = in_range()
            .filter(Self::with_status(ReconciliationStatus::Reconciled))
            .count(db)
            .await?;

        Ok(KindCounts {
            kind: E::KIND,
            total: pending + reconciled,
            pending,
            reconciled,
        })
    }
}

type HandlerTable = HashMap<TransactionKind, Box<dyn ReconciliationHandler>>;

/// Reconciliation repository.
#[derive(Clone)]
pub struct ReconciliationRepository {
    db: DatabaseConnection,
    handlers: Arc<HandlerTable>,
}

impl fmt::Debug for ReconciliationRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReconciliationRepository")
            .field("kinds", &self.handlers.len())
            .finish_non_exhaustive()
    }
}

impl ReconciliationRepository {
    /// Creates a repository with a handler for every transaction kind.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        let handlers: Vec<Box<dyn ReconciliationHandler>> = vec![
            Box::new(EntityHandler::<sales::Entity>::new()),
            Box::new(EntityHandler::<expenses::Entity>::new()),
            Box::new(EntityHandler::<returns::Entity>::new()),
            Box::new(EntityHandler::<hand_bills::Entity>::new()),
            Box::new(EntityHandler::<gift_vouchers::Entity>::new()),
            Box::new(EntityHandler::<sales_orders::Entity>::new()),
        ];
        let handlers: HandlerTable = handlers.into_iter().map(|h| (h.kind(), h)).collect();
        Self {
            db,
            handlers: Arc::new(handlers),
        }
    }

    fn handler(
        &self,
        kind: TransactionKind,
    ) -> Result<&dyn ReconciliationHandler, ReconciliationError> {
        self.handlers
            .get(&kind)
            .map(|h| &**h)
            .ok_or_else(|| ReconciliationError::UnknownKind(kind.to_string()))
    }

    /// Unreconciled transactions of every kind for a business date.
    pub async fn pending_transactions(
        &self,
        business_date: NaiveDate,
        store_ids: &[Uuid],
    ) -> Result<Vec<PendingTransaction>, ReconciliationError> {
        let mut pending = Vec::new();
        for kind in TransactionKind::ALL {
            let rows = self
                .handler(kind)?
                .pending(&self.db, business_date, store_ids)
                .await
                .map_err(|e| ReconciliationError::Database(e.to_string()))?;
            pending.extend(rows);
        }
        Ok(pending)
    }

    /// Reconciles one transaction. The source defaults to `manual`.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyReconciled` if the row was reconciled before; the
    /// earlier audit data is left untouched.
    pub async fn reconcile(
        &self,
        kind: TransactionKind,
        id: Uuid,
        data: ReconcileData,
        now: DateTime<Utc>,
    ) -> Result<(), ReconciliationError> {
        self.reconcile_with_default(kind, id, data, ReconciliationSource::Manual, now)
            .await
    }

    /// Reconciles many transactions concurrently. The source defaults to `batch`.
    ///
    /// Each item commits on its own; failures do not undo earlier successes.
    pub async fn reconcile_batch(&self, items: Vec<BatchItem>, now: DateTime<Utc>) -> BatchOutcome {
        let futures = items.into_iter().map(|item| async move {
            let result = self
                .reconcile_with_default(item.kind, item.id, item.data, ReconciliationSource::Batch, now)
                .await;
            ReconciliationService::item_result(item.kind, item.id, &result)
        });

        let outcome = BatchOutcome::from_results(join_all(futures).await);
        info!(
            succeeded = outcome.succeeded,
            failed = outcome.failed,
            "Batch reconciliation finished"
        );
        outcome
    }

    /// Reconciliation progress over an inclusive date range.
    pub async fn summary(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        store_ids: &[Uuid],
    ) -> Result<ReconciliationSummary, ReconciliationError> {
        if from > to {
            return Err(ReconciliationError::Validation(format!(
                "Range start {from} is after range end {to}"
            )));
        }

        let mut counts = Vec::with_capacity(TransactionKind::ALL.len());
        for kind in TransactionKind::ALL {
            let kind_counts = self
                .handler(kind)?
                .counts(&self.db, from, to, store_ids)
                .await
                .map_err(|e| ReconciliationError::Database(e.to_string()))?;
            counts.push(kind_counts);
        }
        Ok(ReconciliationSummary::from_counts(counts))
    }

    async fn reconcile_with_default(
        &self,
        kind: TransactionKind,
        id: Uuid,
        data: ReconcileData,
        default_source: ReconciliationSource,
        now: DateTime<Utc>,
    ) -> Result<(), ReconciliationError> {
        let resolved = ReconciliationService::resolve(data, default_source)?;
        let outcome = self
            .handler(kind)?
            .reconcile(&self.db, id, &resolved, now)
            .await
            .map_err(|e| ReconciliationError::Database(e.to_string()))?;

        if outcome == ReconcileOutcome::AlreadyReconciled {
            warn!(kind = %kind, id = %id, "Transaction already reconciled");
        }
        ReconciliationService::check_outcome(outcome, kind, id)?;

        info!(
            kind = %kind,
            id = %id,
            source = %resolved.source,
            reconciled_by = %resolved.reconciled_by,
            "Transaction reconciled"
        );
        Ok(())
    }
}
