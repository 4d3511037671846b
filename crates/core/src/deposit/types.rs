//! Deposit domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Bank deposit state of a daily cash position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositStatus {
    /// Cash is still in the store.
    Pending,
    /// Cash has been banked; the position is frozen.
    Deposited,
    /// Part of the day's cash has been banked.
    Partial,
    /// Rolled into a later day's deposit.
    CarriedForward,
}

impl DepositStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Deposited => "deposited",
            Self::Partial => "partial",
            Self::CarriedForward => "carried_forward",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "deposited" => Some(Self::Deposited),
            "partial" => Some(Self::Partial),
            "carried_forward" => Some(Self::CarriedForward),
            _ => None,
        }
    }

    /// Returns true if the position's closing balance is frozen.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        matches!(self, Self::Deposited)
    }
}

impl fmt::Display for DepositStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Alert level for cash waiting to be banked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    /// Within the normal banking cadence.
    Normal,
    /// Exactly at the warning threshold.
    Warning,
    /// Past the warning threshold.
    Critical,
}

impl Urgency {
    /// Default age in days at which pending cash becomes a warning.
    pub const DEFAULT_WARNING_DAYS: i64 = 3;

    /// Classifies pending cash by the age of its oldest day.
    ///
    /// `days_old = floor((now − oldest) / 1 day)`; older than `warning_days`
    /// is critical, exactly `warning_days` is a warning.
    #[must_use]
    pub fn classify(oldest_pending: NaiveDate, now: DateTime<Utc>, warning_days: i64) -> Self {
        Self::from_days_old(days_old(oldest_pending, now), warning_days)
    }

    /// Classifies an already computed age.
    #[must_use]
    pub fn from_days_old(days_old: i64, warning_days: i64) -> Self {
        match days_old.cmp(&warning_days) {
            std::cmp::Ordering::Greater => Self::Critical,
            std::cmp::Ordering::Equal => Self::Warning,
            std::cmp::Ordering::Less => Self::Normal,
        }
    }

    /// Returns the string representation of the urgency.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

/// Whole days between a business date and `now`.
#[must_use]
pub fn days_old(business_date: NaiveDate, now: DateTime<Utc>) -> i64 {
    (now.date_naive() - business_date).num_days()
}

/// A candidate position as seen by the deposit aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionForDeposit {
    /// Position identifier.
    pub id: Uuid,
    /// Business date of the position.
    pub business_date: NaiveDate,
    /// Closing balance of the day.
    pub closing_balance: Decimal,
    /// Current deposit status.
    pub status: DepositStatus,
}

/// Amount attributed from one day to a deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositAllocation {
    /// Position identifier.
    pub position_id: Uuid,
    /// Business date of the position.
    pub business_date: NaiveDate,
    /// Amount included in the deposit.
    pub amount_included: Decimal,
}

/// A validated multi-day deposit ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositPlan {
    /// Earliest included business date.
    pub from_date: NaiveDate,
    /// Latest included business date.
    pub to_date: NaiveDate,
    /// Number of days included.
    pub days_included: u32,
    /// Sum of the included closing balances.
    pub accumulated_amount: Decimal,
    /// Per-day attribution, ordered by date.
    pub allocations: Vec<DepositAllocation>,
}

/// Result of checking a physical count against a deposit plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositCountCheck {
    /// Counted amount.
    pub counted: Decimal,
    /// `counted - accumulated_amount`.
    pub variance: Decimal,
    /// Tolerance for the number of days included.
    pub tolerance: Decimal,
    /// Reason recorded for an out-of-tolerance variance.
    pub reason: Option<String>,
}

/// Overview of cash waiting to be banked for one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSummary {
    /// Number of pending days.
    pub pending_days: u32,
    /// Sum of pending closing balances.
    pub pending_total: Decimal,
    /// Oldest pending business date.
    pub oldest_pending_date: Option<NaiveDate>,
    /// Age of the oldest pending day in whole days.
    pub days_old: i64,
    /// Alert level.
    pub urgency: Urgency,
    /// Count tolerance if every pending day is deposited together.
    pub tolerance: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_deposit_status_strings() {
        assert_eq!(DepositStatus::CarriedForward.as_str(), "carried_forward");
        assert_eq!(DepositStatus::parse("DEPOSITED"), Some(DepositStatus::Deposited));
        assert_eq!(DepositStatus::parse("void"), None);
        assert!(DepositStatus::Deposited.is_frozen());
        assert!(!DepositStatus::Partial.is_frozen());
    }

    #[test]
    fn test_days_old_floors_partial_days() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
        assert_eq!(days_old(date, at(2025, 1, 20, 23)), 0);
        assert_eq!(days_old(date, at(2025, 1, 23, 1)), 3);
    }

    #[test]
    fn test_urgency_thresholds() {
        let oldest = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
        assert_eq!(Urgency::classify(oldest, at(2025, 1, 22, 9), 3), Urgency::Normal);
        assert_eq!(Urgency::classify(oldest, at(2025, 1, 23, 9), 3), Urgency::Warning);
        assert_eq!(Urgency::classify(oldest, at(2025, 1, 24, 9), 3), Urgency::Critical);
    }

    #[test]
    fn test_future_dates_are_normal() {
        let oldest = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        assert_eq!(Urgency::classify(oldest, at(2025, 1, 24, 9), 3), Urgency::Normal);
    }
}
