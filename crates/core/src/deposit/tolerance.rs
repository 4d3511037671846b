//! Statistically scaled variance tolerance.
//!
//! Independent daily counting errors accumulate like a random walk, so the
//! acceptable gap grows with the square root of the number of days.

use rust_decimal::{Decimal, MathematicalOps};

/// Default tolerance for a single day's count.
pub const DEFAULT_BASE_TOLERANCE: Decimal = Decimal::ONE_HUNDRED;

/// Returns `base × √days`. Zero days is treated as one.
#[must_use]
pub fn variance_tolerance(base: Decimal, days_accumulated: u32) -> Decimal {
    let days = days_accumulated.max(1);
    let root = days.isqrt();
    let scale = if root * root == days {
        Decimal::from(root)
    } else {
        Decimal::from(days).sqrt().unwrap_or_else(|| Decimal::from(root))
    };
    base * scale
}

/// `variance_tolerance` with the default base of 100.
#[must_use]
pub fn default_variance_tolerance(days_accumulated: u32) -> Decimal {
    variance_tolerance(DEFAULT_BASE_TOLERANCE, days_accumulated)
}
