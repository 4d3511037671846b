//! Ledger error types for cash position operations.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// No position exists for the store and date.
    #[error("No cash position for store {store_id} on {business_date}")]
    PositionNotFound {
        /// Store identifier.
        store_id: Uuid,
        /// Business date requested.
        business_date: NaiveDate,
    },

    /// Input failed validation.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The position has been deposited and its closing balance is frozen.
    #[error("Cash position for store {store_id} on {business_date} is already deposited")]
    PositionDeposited {
        /// Store identifier.
        store_id: Uuid,
        /// Business date of the frozen position.
        business_date: NaiveDate,
    },

    /// Counted cash differs from the expected amount beyond tolerance.
    #[error(
        "Counted {counted} differs from expected {expected} by {variance}, beyond tolerance {tolerance}; a variance reason is required"
    )]
    VarianceExceedsTolerance {
        /// Expected amount.
        expected: Decimal,
        /// Counted amount.
        counted: Decimal,
        /// `counted - expected`.
        variance: Decimal,
        /// Allowed absolute variance.
        tolerance: Decimal,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl LedgerError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::PositionNotFound { .. } => 404,
            Self::Validation(_) => 400,
            Self::PositionDeposited { .. } => 409,
            Self::VarianceExceedsTolerance { .. } => 422,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::PositionNotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::PositionDeposited { .. } => "POSITION_DEPOSITED",
            Self::VarianceExceedsTolerance { .. } => "VARIANCE_EXCEEDS_TOLERANCE",
            Self::Database(_) => "PERSISTENCE_FAILURE",
        }
    }
}
