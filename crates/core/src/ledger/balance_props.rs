//! Property-based tests for balance closure and opening chaining.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::balance::{OpeningSeed, closing_balance};
use super::types::{CashFlowCategory, PositionFlows};

/// Strategy to generate a positive amount from 0.01 to 100,000.00.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a postable category.
fn arb_category() -> impl Strategy<Value = CashFlowCategory> {
    proptest::sample::select(
        CashFlowCategory::ALL
            .into_iter()
            .filter(CashFlowCategory::is_postable)
            .collect::<Vec<_>>(),
    )
}

/// Strategy to generate a day's worth of postings.
fn arb_postings() -> impl Strategy<Value = Vec<(CashFlowCategory, Decimal)>> {
    prop::collection::vec((arb_category(), positive_amount()), 0..20)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* set of postings, closing = opening + Σinflows − Σoutflows,
    /// and applying each posting's signed amount reaches the same closing.
    #[test]
    fn prop_balance_closure(
        opening in positive_amount(),
        postings in arb_postings(),
    ) {
        let mut flows = PositionFlows::default();
        let mut running = opening;
        for (category, amount) in &postings {
            flows.add(*category, *amount);
            running += category.signed(*amount);
        }

        let closing = closing_balance(opening, &flows);
        prop_assert_eq!(closing, opening + flows.total_inflows() - flows.total_outflows());
        prop_assert_eq!(closing, running);
    }

    /// *For any* chain of days, each opening equals the previous closing.
    #[test]
    fn prop_opening_chains_previous_closing(
        days in prop::collection::vec(arb_postings(), 1..8),
    ) {
        let mut previous: Option<Decimal> = None;
        for (index, postings) in days.iter().enumerate() {
            let seed = OpeningSeed::from_previous(previous, index > 0);
            if let Some(prev) = previous {
                prop_assert_eq!(seed.opening_balance, prev);
                prop_assert!(!seed.gap);
            } else {
                prop_assert_eq!(seed.opening_balance, Decimal::ZERO);
            }

            let mut flows = PositionFlows::default();
            for (category, amount) in postings {
                flows.add(*category, *amount);
            }
            previous = Some(closing_balance(seed.opening_balance, &flows));
        }
    }
}
