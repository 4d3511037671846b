//! Money helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount in the system is a `rust_decimal::Decimal`.

use rust_decimal::Decimal;

/// Smallest currency unit used when comparing two computed amounts (0.01).
pub const MONEY_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Returns true if two amounts differ by no more than `tolerance`.
#[must_use]
pub fn amounts_match(left: Decimal, right: Decimal, tolerance: Decimal) -> bool {
    (left - right).abs() <= tolerance
}
