//! Physical cash count evaluation against the computed position.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;

/// Outcome of comparing a counted amount with the expected amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountEvaluation {
    /// Amount the system expected in the till.
    pub expected: Decimal,
    /// Amount physically counted.
    pub counted: Decimal,
    /// `counted - expected`.
    pub variance: Decimal,
    /// Tolerance the variance was measured against.
    pub tolerance: Decimal,
    /// True if `|variance| <= tolerance`.
    pub within_tolerance: bool,
    /// Reason recorded for the variance, if any.
    pub reason: Option<String>,
}

impl CountEvaluation {
    /// Evaluates a count.
    ///
    /// A variance beyond `tolerance` must carry a non-blank reason.
    pub fn evaluate(
        expected: Decimal,
        counted: Decimal,
        tolerance: Decimal,
        reason: Option<String>,
    ) -> Result<Self, LedgerError> {
        if counted.is_sign_negative() {
            return Err(LedgerError::Validation(format!(
                "Counted amount cannot be negative: {counted}"
            )));
        }

        let variance = counted - expected;
        let within_tolerance = variance.abs() <= tolerance;
        let reason = reason.filter(|r| !r.trim().is_empty());

        if !within_tolerance && reason.is_none() {
            return Err(LedgerError::VarianceExceedsTolerance {
                expected,
                counted,
                variance,
                tolerance,
            });
        }

        Ok(Self {
            expected,
            counted,
            variance,
            tolerance,
            within_tolerance,
            reason,
        })
    }

    /// Returns true if the variance needs no further follow-up.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.within_tolerance || self.reason.is_some()
    }
}
