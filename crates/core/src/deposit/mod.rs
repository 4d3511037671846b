//! Multi-day deposit aggregation.
//!
//! Stores bank cash every few days, so a single deposit covers several
//! daily positions. This module validates the selected days, attributes
//! each day's closing balance to the deposit and scales the count tolerance
//! with the number of days included.

pub mod error;
pub mod service;
pub mod tolerance;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::DepositError;
pub use service::{DepositRequest, DepositService};
pub use tolerance::{DEFAULT_BASE_TOLERANCE, default_variance_tolerance, variance_tolerance};
pub use types::{
    DepositAllocation, DepositCountCheck, DepositPlan, DepositStatus, PendingSummary,
    PositionForDeposit, Urgency, days_old,
};
