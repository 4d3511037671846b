//! Ledger domain types: cash accounts, flow categories, and position flows.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cash pool a movement or balance belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Cash collected from customers, subject to bank deposit.
    SalesCash,
    /// Operating float for day-to-day store expenses.
    PettyCash,
}

impl AccountType {
    /// Returns the string representation of the account.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SalesCash => "sales_cash",
            Self::PettyCash => "petty_cash",
        }
    }

    /// Parses an account from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sales_cash" => Some(Self::SalesCash),
            "petty_cash" => Some(Self::PettyCash),
            _ => None,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of event recorded in the movement log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// A category posting against the day's position.
    Posting,
    /// Cash taken to the bank.
    Deposit,
    /// Sales cash leaving for petty cash.
    TransferOut,
    /// Petty cash arriving from sales cash.
    TransferIn,
    /// A completed manual adjustment.
    Adjustment,
}

impl MovementType {
    /// Returns the string representation of the movement type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Posting => "posting",
            Self::Deposit => "deposit",
            Self::TransferOut => "transfer_out",
            Self::TransferIn => "transfer_in",
            Self::Adjustment => "adjustment",
        }
    }

    /// Parses a movement type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "posting" => Some(Self::Posting),
            "deposit" => Some(Self::Deposit),
            "transfer_out" => Some(Self::TransferOut),
            "transfer_in" => Some(Self::TransferIn),
            "adjustment" => Some(Self::Adjustment),
            _ => None,
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a category adds to or takes from the day's cash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowDirection {
    /// Increases the closing balance.
    Inflow,
    /// Decreases the closing balance.
    Outflow,
}

/// One inflow or outflow column of a daily cash position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashFlowCategory {
    /// Cash sales.
    CashSales,
    /// Sales-order advances taken in cash.
    SoAdvances,
    /// Gift vouchers sold for cash.
    GiftVoucherSales,
    /// Hand-bill collections.
    HandBillCollections,
    /// Transfers into the till from petty cash.
    PettyTransfersIn,
    /// Miscellaneous receipts.
    OtherReceipts,
    /// Signed effect of completed sales-cash adjustments.
    CashAdjustments,
    /// Cash paid out for returns.
    CashReturns,
    /// Cash refunds.
    CashRefunds,
    /// Transfers out of the till into petty cash.
    PettyTransfersOut,
    /// Cash deposited to the bank directly from the day's till.
    CashDeposits,
}

impl CashFlowCategory {
    /// All categories in column order.
    pub const ALL: [Self; 11] = [
        Self::CashSales,
        Self::SoAdvances,
        Self::GiftVoucherSales,
        Self::HandBillCollections,
        Self::PettyTransfersIn,
        Self::OtherReceipts,
        Self::CashAdjustments,
        Self::CashReturns,
        Self::CashRefunds,
        Self::PettyTransfersOut,
        Self::CashDeposits,
    ];

    /// Returns the direction this category moves the closing balance.
    #[must_use]
    pub fn direction(&self) -> FlowDirection {
        match self {
            Self::CashSales
            | Self::SoAdvances
            | Self::GiftVoucherSales
            | Self::HandBillCollections
            | Self::PettyTransfersIn
            | Self::OtherReceipts
            | Self::CashAdjustments => FlowDirection::Inflow,
            Self::CashReturns | Self::CashRefunds | Self::PettyTransfersOut | Self::CashDeposits => {
                FlowDirection::Outflow
            }
        }
    }

    /// Returns true if external posting collaborators may write this category.
    ///
    /// Adjustments only arrive through the approval workflow.
    #[must_use]
    pub fn is_postable(&self) -> bool {
        !matches!(self, Self::CashAdjustments)
    }

    /// Applies the category's direction to a positive amount.
    #[must_use]
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self.direction() {
            FlowDirection::Inflow => amount,
            FlowDirection::Outflow => -amount,
        }
    }

    /// Returns the string representation of the category.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CashSales => "cash_sales",
            Self::SoAdvances => "so_advances",
            Self::GiftVoucherSales => "gift_voucher_sales",
            Self::HandBillCollections => "hand_bill_collections",
            Self::PettyTransfersIn => "petty_transfers_in",
            Self::OtherReceipts => "other_receipts",
            Self::CashAdjustments => "cash_adjustments",
            Self::CashReturns => "cash_returns",
            Self::CashRefunds => "cash_refunds",
            Self::PettyTransfersOut => "petty_transfers_out",
            Self::CashDeposits => "cash_deposits",
        }
    }

    /// Parses a category from a string.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.to_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for CashFlowCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The inflow and outflow columns of one day's position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionFlows {
    /// Cash sales.
    pub cash_sales: Decimal,
    /// Sales-order advances.
    pub so_advances: Decimal,
    /// Gift voucher sales.
    pub gift_voucher_sales: Decimal,
    /// Hand-bill collections.
    pub hand_bill_collections: Decimal,
    /// Transfers in from petty cash.
    pub petty_transfers_in: Decimal,
    /// Other receipts.
    pub other_receipts: Decimal,
    /// Signed adjustments.
    pub cash_adjustments: Decimal,
    /// Cash returns.
    pub cash_returns: Decimal,
    /// Cash refunds.
    pub cash_refunds: Decimal,
    /// Transfers out to petty cash.
    pub petty_transfers_out: Decimal,
    /// Direct bank deposits.
    pub cash_deposits: Decimal,
}

impl PositionFlows {
    /// Returns the amount recorded for a category.
    #[must_use]
    pub fn get(&self, category: CashFlowCategory) -> Decimal {
        match category {
            CashFlowCategory::CashSales => self.cash_sales,
            CashFlowCategory::SoAdvances => self.so_advances,
            CashFlowCategory::GiftVoucherSales => self.gift_voucher_sales,
            CashFlowCategory::HandBillCollections => self.hand_bill_collections,
            CashFlowCategory::PettyTransfersIn => self.petty_transfers_in,
            CashFlowCategory::OtherReceipts => self.other_receipts,
            CashFlowCategory::CashAdjustments => self.cash_adjustments,
            CashFlowCategory::CashReturns => self.cash_returns,
            CashFlowCategory::CashRefunds => self.cash_refunds,
            CashFlowCategory::PettyTransfersOut => self.petty_transfers_out,
            CashFlowCategory::CashDeposits => self.cash_deposits,
        }
    }

    /// Adds a positive amount to a category.
    pub fn add(&mut self, category: CashFlowCategory, amount: Decimal) {
        let slot = match category {
            CashFlowCategory::CashSales => &mut self.cash_sales,
            CashFlowCategory::SoAdvances => &mut self.so_advances,
            CashFlowCategory::GiftVoucherSales => &mut self.gift_voucher_sales,
            CashFlowCategory::HandBillCollections => &mut self.hand_bill_collections,
            CashFlowCategory::PettyTransfersIn => &mut self.petty_transfers_in,
            CashFlowCategory::OtherReceipts => &mut self.other_receipts,
            CashFlowCategory::CashAdjustments => &mut self.cash_adjustments,
            CashFlowCategory::CashReturns => &mut self.cash_returns,
            CashFlowCategory::CashRefunds => &mut self.cash_refunds,
            CashFlowCategory::PettyTransfersOut => &mut self.petty_transfers_out,
            CashFlowCategory::CashDeposits => &mut self.cash_deposits,
        };
        *slot += amount;
    }

    /// Sum of all inflow columns.
    #[must_use]
    pub fn total_inflows(&self) -> Decimal {
        self.sum_direction(FlowDirection::Inflow)
    }

    /// Sum of all outflow columns.
    #[must_use]
    pub fn total_outflows(&self) -> Decimal {
        self.sum_direction(FlowDirection::Outflow)
    }

    fn sum_direction(&self, direction: FlowDirection) -> Decimal {
        CashFlowCategory::ALL
            .iter()
            .filter(|c| c.direction() == direction)
            .map(|c| self.get(*c))
            .sum()
    }
}
