//! Deposit aggregation rules.
//!
//! The aggregator is selection-agnostic: callers choose which days to bank
//! (usually every pending day, or the most recent N) and this service only
//! validates the chosen set and derives the deposit's shape.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashSet;
use uuid::Uuid;

use strongroom_shared::types::amounts_match;

use super::error::DepositError;
use super::tolerance::variance_tolerance;
use super::types::{
    DepositAllocation, DepositCountCheck, DepositPlan, PendingSummary, PositionForDeposit,
    Urgency, days_old,
};

/// Caller-supplied deposit details that need validating before any lookup.
#[derive(Debug, Clone)]
pub struct DepositRequest<'a> {
    /// Positions selected for the deposit.
    pub position_ids: &'a [Uuid],
    /// Amount the caller claims to be depositing.
    pub amount: Decimal,
    /// Bank slip number.
    pub deposit_slip_number: &'a str,
    /// Receiving bank.
    pub bank_name: &'a str,
    /// Who took the cash to the bank.
    pub deposited_by: &'a str,
}

/// Stateless service for validating and shaping multi-day deposits.
pub struct DepositService;

impl DepositService {
    /// Validates the caller's input.
    ///
    /// # Returns
    /// * `Err(DepositError::Validation)` naming the first offending field
    pub fn validate_request(request: &DepositRequest<'_>) -> Result<(), DepositError> {
        if request.position_ids.is_empty() {
            return Err(DepositError::Validation(
                "At least one cash position must be selected".to_string(),
            ));
        }

        let unique: HashSet<&Uuid> = request.position_ids.iter().collect();
        if unique.len() != request.position_ids.len() {
            return Err(DepositError::Validation(
                "A cash position was selected more than once".to_string(),
            ));
        }

        if request.amount <= Decimal::ZERO {
            return Err(DepositError::Validation(format!(
                "Deposit amount must be positive, got {}",
                request.amount
            )));
        }

        for (field, value) in [
            ("deposit_slip_number", request.deposit_slip_number),
            ("bank_name", request.bank_name),
            ("deposited_by", request.deposited_by),
        ] {
            if value.trim().is_empty() {
                return Err(DepositError::Validation(format!("{field} is required")));
            }
        }

        Ok(())
    }

    /// Builds a deposit plan from the fetched positions.
    ///
    /// # Arguments
    /// * `requested_ids` - The ids the caller selected
    /// * `positions` - The rows that resolved for the store, in any order
    /// * `amount` - The amount the caller is depositing
    /// * `match_tolerance` - Allowed gap between `amount` and the total
    ///
    /// # Returns
    /// * `Err(DepositError::PositionNotFound)` if a requested id did not resolve
    /// * `Err(DepositError::AlreadyDeposited)` if a selected day is frozen
    /// * `Err(DepositError::AmountMismatch)` if the total differs from `amount`
    pub fn plan(
        requested_ids: &[Uuid],
        positions: &[PositionForDeposit],
        amount: Decimal,
        match_tolerance: Decimal,
    ) -> Result<DepositPlan, DepositError> {
        let mut selected = Vec::with_capacity(requested_ids.len());
        for id in requested_ids {
            let position = positions
                .iter()
                .find(|p| p.id == *id)
                .ok_or(DepositError::PositionNotFound(*id))?;
            selected.push(position);
        }

        selected.sort_by_key(|p| p.business_date);

        if let Some(frozen) = selected.iter().find(|p| p.status.is_frozen()) {
            return Err(DepositError::AlreadyDeposited {
                position_id: frozen.id,
                business_date: frozen.business_date,
            });
        }

        let accumulated_amount: Decimal = selected.iter().map(|p| p.closing_balance).sum();
        if !amounts_match(accumulated_amount, amount, match_tolerance) {
            return Err(DepositError::AmountMismatch {
                expected: accumulated_amount,
                supplied: amount,
                difference: amount - accumulated_amount,
            });
        }

        let (Some(first), Some(last)) = (selected.first(), selected.last()) else {
            return Err(DepositError::Validation(
                "At least one cash position must be selected".to_string(),
            ));
        };

        let days_included = u32::try_from(selected.len())
            .map_err(|_| DepositError::Validation("Too many positions selected".to_string()))?;

        Ok(DepositPlan {
            from_date: first.business_date,
            to_date: last.business_date,
            days_included,
            accumulated_amount,
            allocations: selected
                .iter()
                .map(|p| DepositAllocation {
                    position_id: p.id,
                    business_date: p.business_date,
                    amount_included: p.closing_balance,
                })
                .collect(),
        })
    }

    /// Checks an optional physical count against the plan.
    ///
    /// A variance beyond `base_tolerance × √days` must carry a non-blank reason.
    pub fn check_count(
        plan: &DepositPlan,
        counted: Option<Decimal>,
        reason: Option<String>,
        base_tolerance: Decimal,
    ) -> Result<Option<DepositCountCheck>, DepositError> {
        let Some(counted) = counted else {
            return Ok(None);
        };

        let tolerance = variance_tolerance(base_tolerance, plan.days_included);
        let variance = counted - plan.accumulated_amount;
        let reason = reason.filter(|r| !r.trim().is_empty());

        if variance.abs() > tolerance && reason.is_none() {
            return Err(DepositError::VarianceExceedsTolerance {
                expected: plan.accumulated_amount,
                counted,
                variance,
                tolerance,
            });
        }

        Ok(Some(DepositCountCheck {
            counted,
            variance,
            tolerance,
            reason,
        }))
    }

    /// Summarises a store's pending positions for alerting.
    #[must_use]
    pub fn summarize_pending(
        pending: &[PositionForDeposit],
        now: DateTime<Utc>,
        base_tolerance: Decimal,
        warning_days: i64,
    ) -> PendingSummary {
        let oldest_pending_date = pending.iter().map(|p| p.business_date).min();
        let age = oldest_pending_date.map_or(0, |d| days_old(d, now));
        let pending_days = u32::try_from(pending.len()).unwrap_or(u32::MAX);

        PendingSummary {
            pending_days,
            pending_total: pending.iter().map(|p| p.closing_balance).sum(),
            oldest_pending_date,
            days_old: age,
            urgency: oldest_pending_date.map_or(Urgency::Normal, |_| {
                Urgency::from_days_old(age, warning_days)
            }),
            tolerance: variance_tolerance(base_tolerance, pending_days),
        }
    }
}
