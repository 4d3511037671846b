//! `SeaORM` Entity for deposit_day_mappings table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "deposit_day_mappings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub deposit_id: Uuid,
    pub position_id: Uuid,
    pub business_date: Date,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub amount_included: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cash_deposits::Entity",
        from = "Column::DepositId",
        to = "super::cash_deposits::Column::Id",
        on_delete = "Cascade"
    )]
    CashDeposits,
    #[sea_orm(
        belongs_to = "super::daily_cash_positions::Entity",
        from = "Column::PositionId",
        to = "super::daily_cash_positions::Column::Id"
    )]
    DailyCashPositions,
}

impl Related<super::cash_deposits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashDeposits.def()
    }
}

impl Related<super::daily_cash_positions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DailyCashPositions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
