//! `SeaORM` Entity for returns table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{ReconciliationSource, ReconciliationStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "returns")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub store_id: Uuid,
    pub business_date: Date,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub amount: Decimal,
    pub reference_number: Option<String>,
    pub description: Option<String>,
    pub reconciliation_status: ReconciliationStatus,
    pub reconciled_by: Option<String>,
    pub reconciled_at: Option<DateTimeWithTimeZone>,
    pub reconciliation_source: ReconciliationSource,
    pub reconciliation_notes: Option<String>,
    pub external_reference: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
