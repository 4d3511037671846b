//! Reconciliation error types.

use thiserror::Error;
use uuid::Uuid;

use super::types::TransactionKind;

/// Errors that can occur while reconciling transactions.
#[derive(Debug, Error)]
pub enum ReconciliationError {
    /// No row of that kind has the id.
    #[error("{kind} transaction {id} not found")]
    NotFound {
        /// Transaction kind.
        kind: TransactionKind,
        /// Row identifier.
        id: Uuid,
    },

    /// Input failed validation.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The row was reconciled earlier and is left as is.
    #[error("{kind} transaction {id} is already reconciled")]
    AlreadyReconciled {
        /// Transaction kind.
        kind: TransactionKind,
        /// Row identifier.
        id: Uuid,
    },

    /// The transaction type is not one of the known kinds.
    #[error("Unknown transaction type: {0}")]
    UnknownKind(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl ReconciliationError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) | Self::UnknownKind(_) => 400,
            Self::AlreadyReconciled { .. } => 409,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) | Self::UnknownKind(_) => "VALIDATION_FAILED",
            Self::AlreadyReconciled { .. } => "ALREADY_RECONCILED",
            Self::Database(_) => "PERSISTENCE_FAILURE",
        }
    }
}
