//! Opening/closing balance rules for daily cash positions.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::PositionFlows;

/// How a new position's opening balance was seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningSeed {
    /// Opening balance for the new day.
    pub opening_balance: Decimal,
    /// True if the previous day is missing while an earlier day exists.
    pub gap: bool,
}

impl OpeningSeed {
    /// Seeds an opening balance from the previous calendar day.
    ///
    /// A missing previous day seeds zero. The gap is flagged, never back-filled,
    /// when the store already has an older position.
    #[must_use]
    pub fn from_previous(previous_closing: Option<Decimal>, has_earlier_position: bool) -> Self {
        match previous_closing {
            Some(closing) => Self {
                opening_balance: closing,
                gap: false,
            },
            None => Self {
                opening_balance: Decimal::ZERO,
                gap: has_earlier_position,
            },
        }
    }
}

/// Returns the calendar day before `date`, if representable.
#[must_use]
pub fn previous_business_date(date: NaiveDate) -> Option<NaiveDate> {
    date.pred_opt()
}

/// Computes `opening + Σinflows − Σoutflows`.
#[must_use]
pub fn closing_balance(opening_balance: Decimal, flows: &PositionFlows) -> Decimal {
    opening_balance + flows.total_inflows() - flows.total_outflows()
}
