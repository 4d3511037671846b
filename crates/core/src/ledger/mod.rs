//! Daily cash position rules.
//!
//! This module implements the pure parts of the ledger store:
//! - Cash accounts and inflow/outflow categories
//! - Opening balance seeding and closing balance closure
//! - Physical count evaluation against the computed position
//! - Error types for ledger operations

pub mod balance;
pub mod count;
pub mod error;
pub mod types;

#[cfg(test)]
mod balance_props;

pub use balance::{OpeningSeed, closing_balance, previous_business_date};
pub use count::CountEvaluation;
pub use error::LedgerError;
pub use types::{AccountType, CashFlowCategory, FlowDirection, MovementType, PositionFlows};
