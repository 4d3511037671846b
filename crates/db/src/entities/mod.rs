//! `SeaORM` entity definitions.

pub mod prelude;

pub mod cash_adjustments;
pub mod cash_deposits;
pub mod cash_movements;
pub mod cash_transfers;
pub mod daily_cash_positions;
pub mod deposit_day_mappings;
pub mod expenses;
pub mod gift_vouchers;
pub mod hand_bills;
pub mod returns;
pub mod sales;
pub mod sales_orders;
pub mod sea_orm_active_enums;
