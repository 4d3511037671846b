//! `SeaORM` Entity for cash_deposits table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_deposits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub store_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub amount: Decimal,
    pub deposit_slip_number: String,
    pub bank_name: String,
    pub deposited_by: String,
    pub from_date: Date,
    pub to_date: Date,
    pub days_included: i32,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub accumulated_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub counted_amount: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub count_variance: Option<Decimal>,
    pub variance_reason: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::deposit_day_mappings::Entity")]
    DepositDayMappings,
    #[sea_orm(has_many = "super::daily_cash_positions::Entity")]
    DailyCashPositions,
}

impl Related<super::deposit_day_mappings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DepositDayMappings.def()
    }
}

impl Related<super::daily_cash_positions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DailyCashPositions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
