//! Approval workflow domain types for transfers and adjustments.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ledger::{AccountType, CashFlowCategory, MovementType};

/// Status of a transfer or adjustment request.
///
/// The valid transitions are:
/// - Pending → Approved (approve)
/// - Pending → Rejected (reject)
/// - Approved → Completed (complete)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    /// Awaiting an approver.
    Pending,
    /// Approved and waiting to be applied.
    Approved,
    /// Rejected by an approver (terminal).
    Rejected,
    /// Applied to the ledger (terminal).
    Completed,
}

impl ApprovalStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Returns true if no transition leaves this status.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Completed)
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Urgency an approver should give a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Normal handling.
    #[default]
    Medium,
    /// Blocking store operations.
    High,
}

impl Priority {
    /// Returns the string representation of the priority.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parses a priority from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reason a manual cash adjustment is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentType {
    /// First float for a new store.
    InitialSetup,
    /// Correction of a recording error.
    Correction,
    /// Cash brought in from outside the store.
    Injection,
    /// Write-off of missing cash.
    Loss,
}

impl AdjustmentType {
    /// Returns the string representation of the adjustment type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InitialSetup => "initial_setup",
            Self::Correction => "correction",
            Self::Injection => "injection",
            Self::Loss => "loss",
        }
    }

    /// Parses an adjustment type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "initial_setup" => Some(Self::InitialSetup),
            "correction" => Some(Self::Correction),
            "injection" => Some(Self::Injection),
            "loss" => Some(Self::Loss),
            _ => None,
        }
    }

    /// Applies the type's sign to a stored magnitude. Losses are negative.
    #[must_use]
    pub fn signed_amount(&self, magnitude: Decimal) -> Decimal {
        match self {
            Self::Loss => -magnitude.abs(),
            Self::InitialSetup | Self::Correction | Self::Injection => magnitude.abs(),
        }
    }

    /// Priority the request is persisted with.
    ///
    /// Initial setup always blocks a new store, so it is raised to high.
    #[must_use]
    pub fn effective_priority(&self, requested: Priority) -> Priority {
        match self {
            Self::InitialSetup => Priority::High,
            Self::Correction | Self::Injection | Self::Loss => requested,
        }
    }
}

impl fmt::Display for AdjustmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A state transition with its audit fields.
#[derive(Debug, Clone)]
pub enum ApprovalAction {
    /// Approve a pending request.
    Approve {
        /// The new status after approval.
        new_status: ApprovalStatus,
        /// Amount approved, possibly less than requested.
        approved_amount: Decimal,
        /// Who approved.
        approved_by: String,
        /// When.
        approval_date: DateTime<Utc>,
        /// Optional notes from the approver.
        approval_notes: Option<String>,
    },
    /// Reject a pending request.
    Reject {
        /// The new status after rejection.
        new_status: ApprovalStatus,
        /// Who rejected.
        approved_by: String,
        /// When.
        approval_date: DateTime<Utc>,
        /// Why.
        approval_notes: String,
    },
    /// Apply an approved request to the ledger.
    Complete {
        /// The new status after completion.
        new_status: ApprovalStatus,
        /// Who applied it.
        completed_by: String,
        /// When.
        completed_at: DateTime<Utc>,
    },
}

impl ApprovalAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub fn new_status(&self) -> ApprovalStatus {
        match self {
            Self::Approve { new_status, .. }
            | Self::Reject { new_status, .. }
            | Self::Complete { new_status, .. } => *new_status,
        }
    }
}

/// One signed change to a cash account applied at completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CashEffect {
    /// Account the movement is recorded against.
    pub account: AccountType,
    /// Movement log entry type.
    pub movement_type: MovementType,
    /// Signed amount.
    pub amount: Decimal,
    /// Position column that mirrors this effect, if any.
    pub rollup: Option<CashFlowCategory>,
}

impl CashEffect {
    /// Returns the column and the value to add to it.
    ///
    /// The signed adjustment column takes the signed amount; the other
    /// columns hold magnitudes.
    #[must_use]
    pub fn rollup_delta(&self) -> Option<(CashFlowCategory, Decimal)> {
        self.rollup.map(|category| match category {
            CashFlowCategory::CashAdjustments => (category, self.amount),
            _ => (category, self.amount.abs()),
        })
    }
}
