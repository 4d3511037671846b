//! Approval workflow for cash transfers and adjustments.
//!
//! Any manual change to cash goes through the same state machine:
//! pending → approved → completed, or pending → rejected.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::ApprovalError;
pub use service::ApprovalService;
pub use types::{AdjustmentType, ApprovalAction, ApprovalStatus, CashEffect, Priority};
