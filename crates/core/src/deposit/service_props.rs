//! Property-based tests for deposit aggregation.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::DepositError;
use super::service::DepositService;
use super::tolerance::default_variance_tolerance;
use super::types::{DepositStatus, PositionForDeposit};
use strongroom_shared::types::MONEY_EPSILON;

/// Strategy to generate a closing balance from 0.01 to 50,000.00.
fn closing_amount() -> impl Strategy<Value = Decimal> {
    (1i64..5_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate consecutive pending positions starting 2025-01-01.
fn arb_positions() -> impl Strategy<Value = Vec<PositionForDeposit>> {
    prop::collection::vec(closing_amount(), 1..15).prop_map(|amounts| {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        amounts
            .into_iter()
            .enumerate()
            .map(|(i, closing_balance)| PositionForDeposit {
                id: Uuid::new_v4(),
                business_date: start + Days::new(u64::try_from(i).unwrap()),
                closing_balance,
                status: DepositStatus::Pending,
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* selection, the allocations sum to the accumulated amount
    /// and span exactly the selected dates.
    #[test]
    fn prop_deposit_conservation(positions in arb_positions()) {
        let ids: Vec<Uuid> = positions.iter().rev().map(|p| p.id).collect();
        let total: Decimal = positions.iter().map(|p| p.closing_balance).sum();

        let plan = DepositService::plan(&ids, &positions, total, MONEY_EPSILON).unwrap();

        let allocated: Decimal = plan.allocations.iter().map(|a| a.amount_included).sum();
        prop_assert_eq!(allocated, plan.accumulated_amount);
        prop_assert_eq!(plan.accumulated_amount, total);
        prop_assert_eq!(plan.days_included as usize, positions.len());
        prop_assert_eq!(plan.from_date, positions[0].business_date);
        prop_assert_eq!(plan.to_date, positions[positions.len() - 1].business_date);
        prop_assert!(plan.allocations.windows(2).all(|w| w[0].business_date < w[1].business_date));
    }

    /// *For any* supplied amount off by more than a cent, planning fails
    /// with a mismatch carrying the exact difference.
    #[test]
    fn prop_mismatch_reports_difference(
        positions in arb_positions(),
        offset_cents in 2i64..100_000i64,
        short in any::<bool>(),
    ) {
        let ids: Vec<Uuid> = positions.iter().map(|p| p.id).collect();
        let total: Decimal = positions.iter().map(|p| p.closing_balance).sum();
        let offset = Decimal::new(offset_cents, 2);
        let supplied = if short { total - offset } else { total + offset };

        match DepositService::plan(&ids, &positions, supplied, MONEY_EPSILON) {
            Err(DepositError::AmountMismatch { expected, difference, .. }) => {
                prop_assert_eq!(expected, total);
                prop_assert_eq!(difference, supplied - total);
            }
            other => prop_assert!(false, "expected mismatch, got {:?}", other),
        }
    }

    /// *For any* day count, tolerance never shrinks as more days accumulate.
    #[test]
    fn prop_tolerance_monotonic(days in 1u32..365) {
        prop_assert!(default_variance_tolerance(days + 1) >= default_variance_tolerance(days));
        prop_assert!(default_variance_tolerance(days) >= default_variance_tolerance(1));
    }
}
