//! `SeaORM` Entity for daily_cash_positions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::DepositStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "daily_cash_positions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub store_id: Uuid,
    pub business_date: Date,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub opening_balance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub cash_sales: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub so_advances: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub gift_voucher_sales: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub hand_bill_collections: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub petty_transfers_in: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub other_receipts: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub cash_adjustments: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub cash_returns: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub cash_refunds: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub petty_transfers_out: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub cash_deposits: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub closing_balance: Decimal,
    pub deposit_status: DepositStatus,
    pub deposit_id: Option<Uuid>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub deposited_amount: Option<Decimal>,
    pub deposited_at: Option<DateTimeWithTimeZone>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub counted_amount: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub count_variance: Option<Decimal>,
    pub variance_reason: Option<String>,
    pub variance_resolved: bool,
    pub is_bank_holiday: bool,
    pub holiday_name: Option<String>,
    pub opening_gap: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cash_deposits::Entity",
        from = "Column::DepositId",
        to = "super::cash_deposits::Column::Id"
    )]
    CashDeposits,
    #[sea_orm(has_many = "super::deposit_day_mappings::Entity")]
    DepositDayMappings,
}

impl Related<super::cash_deposits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashDeposits.def()
    }
}

impl Related<super::deposit_day_mappings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DepositDayMappings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
