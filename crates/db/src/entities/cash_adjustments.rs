//! `SeaORM` Entity for cash_adjustments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{AccountType, AdjustmentType, ApprovalStatus, Priority};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_adjustments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub store_id: Uuid,
    pub adjustment_type: AdjustmentType,
    pub account_type: AccountType,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub requested_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub approved_amount: Option<Decimal>,
    pub reason: String,
    pub status: ApprovalStatus,
    pub priority: Priority,
    pub requested_by: String,
    pub approved_by: Option<String>,
    pub approval_date: Option<DateTimeWithTimeZone>,
    pub approval_notes: Option<String>,
    pub completed_by: Option<String>,
    pub completed_at: Option<DateTimeWithTimeZone>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub balance_snapshot: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
