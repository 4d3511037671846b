//! Property-based tests for the approval state machine.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::ApprovalError;
use super::service::ApprovalService;
use super::types::{AdjustmentType, ApprovalStatus, Priority};
use crate::ledger::AccountType;

/// Strategy for generating random statuses.
fn arb_status() -> impl Strategy<Value = ApprovalStatus> {
    prop_oneof![
        Just(ApprovalStatus::Pending),
        Just(ApprovalStatus::Approved),
        Just(ApprovalStatus::Rejected),
        Just(ApprovalStatus::Completed),
    ]
}

/// Strategy for generating terminal statuses.
fn arb_terminal() -> impl Strategy<Value = ApprovalStatus> {
    prop_oneof![Just(ApprovalStatus::Rejected), Just(ApprovalStatus::Completed)]
}

fn arb_priority() -> impl Strategy<Value = Priority> {
    prop_oneof![Just(Priority::Low), Just(Priority::Medium), Just(Priority::High)]
}

/// Strategy to generate a positive amount from 0.01 to 100,000.00.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* terminal status, every transition fails with `InvalidTransition`.
    #[test]
    fn prop_no_exit_from_terminal(status in arb_terminal(), amount in positive_amount()) {
        let now = Utc.with_ymd_and_hms(2025, 1, 22, 9, 0, 0).unwrap();

        let approve = ApprovalService::approve(status, amount, None, "manager1", None, now);
        prop_assert!(
            matches!(approve, Err(ApprovalError::InvalidTransition { .. })),
            "expected InvalidTransition from approve"
        );
        let reject = ApprovalService::reject(status, "manager1", "no", now);
        prop_assert!(
            matches!(reject, Err(ApprovalError::InvalidTransition { .. })),
            "expected InvalidTransition from reject"
        );
        let complete = ApprovalService::complete(status, "manager1", now);
        prop_assert!(
            matches!(complete, Err(ApprovalError::InvalidTransition { .. })),
            "expected InvalidTransition from complete"
        );
    }

    /// *For any* status, a successful transition lands on a status the
    /// transition table allows.
    #[test]
    fn prop_transitions_follow_table(status in arb_status(), amount in positive_amount()) {
        let now = Utc.with_ymd_and_hms(2025, 1, 22, 9, 0, 0).unwrap();
        let attempts = [
            ApprovalService::approve(status, amount, None, "m", None, now),
            ApprovalService::reject(status, "m", "notes", now),
            ApprovalService::complete(status, "m", now),
        ];

        for action in attempts.into_iter().flatten() {
            prop_assert!(ApprovalService::is_valid_transition(status, action.new_status()));
        }
    }

    /// *For any* requested priority, initial setup is persisted as high and
    /// other types keep what was asked for.
    #[test]
    fn prop_initial_setup_priority(priority in arb_priority(), amount in positive_amount()) {
        let setup = ApprovalService::validate_adjustment(
            AdjustmentType::InitialSetup, amount, "owner", "float", priority,
        ).unwrap();
        prop_assert_eq!(setup, Priority::High);

        let correction = ApprovalService::validate_adjustment(
            AdjustmentType::Correction, amount, "owner", "typo", priority,
        ).unwrap();
        prop_assert_eq!(correction, priority);
    }

    /// *For any* balance and change, the guard passes exactly when the result
    /// stays at or above zero.
    #[test]
    fn prop_underflow_guard(balance in positive_amount(), change in positive_amount()) {
        let result = ApprovalService::ensure_no_underflow(AccountType::SalesCash, balance, -change);
        prop_assert_eq!(result.is_ok(), balance >= change);
    }
}
