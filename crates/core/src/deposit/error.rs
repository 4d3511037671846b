//! Deposit error types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while aggregating a multi-day deposit.
#[derive(Debug, Error)]
pub enum DepositError {
    /// A selected position does not exist for the store.
    #[error("Cash position not found: {0}")]
    PositionNotFound(Uuid),

    /// Deposit not found.
    #[error("Deposit not found: {0}")]
    DepositNotFound(Uuid),

    /// Input failed validation.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The supplied amount does not match the selected days.
    #[error(
        "Deposit amount {supplied} does not match the selected days' total {expected} (difference {difference})"
    )]
    AmountMismatch {
        /// Sum of the selected closing balances.
        expected: Decimal,
        /// Amount supplied by the caller.
        supplied: Decimal,
        /// `supplied - expected`.
        difference: Decimal,
    },

    /// The counted amount differs from the total beyond tolerance.
    #[error(
        "Counted {counted} differs from computed total {expected} by {variance}, beyond tolerance {tolerance}; a variance reason is required"
    )]
    VarianceExceedsTolerance {
        /// Sum of the selected closing balances.
        expected: Decimal,
        /// Physically counted amount.
        counted: Decimal,
        /// `counted - expected`.
        variance: Decimal,
        /// Allowed absolute variance for the number of days.
        tolerance: Decimal,
    },

    /// A selected position is already deposited.
    #[error("Cash position {position_id} for {business_date} is already deposited")]
    AlreadyDeposited {
        /// Position identifier.
        position_id: Uuid,
        /// Business date of the position.
        business_date: NaiveDate,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl DepositError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::PositionNotFound(_) | Self::DepositNotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::AmountMismatch { .. } | Self::VarianceExceedsTolerance { .. } => 422,
            Self::AlreadyDeposited { .. } => 409,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::PositionNotFound(_) | Self::DepositNotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::AmountMismatch { .. } => "AMOUNT_MISMATCH",
            Self::VarianceExceedsTolerance { .. } => "VARIANCE_EXCEEDS_TOLERANCE",
            Self::AlreadyDeposited { .. } => "ALREADY_DEPOSITED",
            Self::Database(_) => "PERSISTENCE_FAILURE",
        }
    }
}
