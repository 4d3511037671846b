//! Entity aliases.

pub use super::cash_adjustments::Entity as CashAdjustments;
pub use super::cash_deposits::Entity as CashDeposits;
pub use super::cash_movements::Entity as CashMovements;
pub use super::cash_transfers::Entity as CashTransfers;
pub use super::daily_cash_positions::Entity as DailyCashPositions;
pub use super::deposit_day_mappings::Entity as DepositDayMappings;
pub use super::expenses::Entity as Expenses;
pub use super::gift_vouchers::Entity as GiftVouchers;
pub use super::hand_bills::Entity as HandBills;
pub use super::returns::Entity as Returns;
pub use super::sales::Entity as Sales;
pub use super::sales_orders::Entity as SalesOrders;
