//! Approval workflow error types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use super::types::ApprovalStatus;
use crate::ledger::{AccountType, LedgerError};

/// Errors that can occur during transfer and adjustment workflows.
#[derive(Debug, Error)]
pub enum ApprovalError {
    /// Transfer not found.
    #[error("Cash transfer {0} not found")]
    TransferNotFound(Uuid),

    /// Adjustment not found.
    #[error("Cash adjustment {0} not found")]
    AdjustmentNotFound(Uuid),

    /// Input failed validation.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: ApprovalStatus,
        /// The attempted target status.
        to: ApprovalStatus,
    },

    /// A transfer asks for more than the sales cash on hand.
    #[error("Requested transfer {requested} exceeds available sales cash {available}")]
    InsufficientFunds {
        /// Requested amount.
        requested: Decimal,
        /// Current sales-cash balance.
        available: Decimal,
    },

    /// Applying the change would take an account below zero.
    #[error("Applying {change} to {account} balance {balance} would go below zero")]
    WouldUnderflow {
        /// Account that would go negative.
        account: AccountType,
        /// Current balance.
        balance: Decimal,
        /// Signed change that was attempted.
        change: Decimal,
    },

    /// The business date's position could not be found or created.
    #[error("No cash position for store {store_id} on {business_date}")]
    PositionNotFound {
        /// Store identifier.
        store_id: Uuid,
        /// Business date requested.
        business_date: NaiveDate,
    },

    /// The business date's position is deposited and cannot absorb the change.
    #[error("Cash position for store {store_id} on {business_date} is already deposited")]
    PositionDeposited {
        /// Store identifier.
        store_id: Uuid,
        /// Business date of the frozen position.
        business_date: NaiveDate,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl ApprovalError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::TransferNotFound(_)
            | Self::AdjustmentNotFound(_)
            | Self::PositionNotFound { .. } => 404,
            Self::Validation(_) => 400,
            Self::InvalidTransition { .. } | Self::PositionDeposited { .. } => 409,
            Self::InsufficientFunds { .. } | Self::WouldUnderflow { .. } => 422,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TransferNotFound(_)
            | Self::AdjustmentNotFound(_)
            | Self::PositionNotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::WouldUnderflow { .. } => "WOULD_UNDERFLOW",
            Self::PositionDeposited { .. } => "POSITION_DEPOSITED",
            Self::Database(_) => "PERSISTENCE_FAILURE",
        }
    }
}

impl From<LedgerError> for ApprovalError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::PositionNotFound {
                store_id,
                business_date,
            } => Self::PositionNotFound {
                store_id,
                business_date,
            },
            LedgerError::PositionDeposited {
                store_id,
                business_date,
            } => Self::PositionDeposited {
                store_id,
                business_date,
            },
            LedgerError::Validation(msg) => Self::Validation(msg),
            err @ LedgerError::VarianceExceedsTolerance { .. } => Self::Validation(err.to_string()),
            LedgerError::Database(msg) => Self::Database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_invalid_transition_message() {
        let err = ApprovalError::InvalidTransition {
            from: ApprovalStatus::Approved,
            to: ApprovalStatus::Approved,
        };
        assert_eq!(
            err.to_string(),
            "Invalid status transition from approved to approved"
        );
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
    }

    #[test]
    fn test_insufficient_funds_carries_numbers() {
        let err = ApprovalError::InsufficientFunds {
            requested: dec!(500),
            available: dec!(320.50),
        };
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("320.50"));
        assert_eq!(err.status_code(), 422);
    }

    #[test]
    fn test_underflow() {
        let err = ApprovalError::WouldUnderflow {
            account: AccountType::PettyCash,
            balance: dec!(20),
            change: dec!(-50),
        };
        assert!(err.to_string().contains("petty_cash"));
        assert_eq!(err.error_code(), "WOULD_UNDERFLOW");
    }

    #[test]
    fn test_not_found_codes() {
        assert_eq!(ApprovalError::TransferNotFound(Uuid::nil()).status_code(), 404);
        assert_eq!(
            ApprovalError::AdjustmentNotFound(Uuid::nil()).error_code(),
            "NOT_FOUND"
        );
    }

    #[test]
    fn test_ledger_errors_keep_their_kind() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 22).unwrap();
        let missing: ApprovalError = LedgerError::PositionNotFound {
            store_id: Uuid::nil(),
            business_date: date,
        }
        .into();
        assert!(matches!(missing, ApprovalError::PositionNotFound { .. }));
        assert_eq!(missing.status_code(), 404);

        let frozen: ApprovalError = LedgerError::PositionDeposited {
            store_id: Uuid::nil(),
            business_date: date,
        }
        .into();
        assert_eq!(frozen.error_code(), "POSITION_DEPOSITED");
        assert_eq!(frozen.status_code(), 409);

        let db: ApprovalError = LedgerError::Database("timeout".into()).into();
        assert_eq!(db.status_code(), 500);
    }
}
