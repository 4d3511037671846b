//! Approval workflow service for transfers and adjustments.
//!
//! Validates submissions, drives the pending → approved → completed state
//! machine and derives the cash movements a completed request produces.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::error::ApprovalError;
use super::types::{AdjustmentType, ApprovalAction, ApprovalStatus, CashEffect, Priority};
use crate::ledger::{AccountType, CashFlowCategory, MovementType};

/// Stateless service for approval transitions.
///
/// "Now" is always passed in so transitions are deterministic.
pub struct ApprovalService;

impl ApprovalService {
    /// Validates a transfer request from sales cash to petty cash.
    ///
    /// # Arguments
    /// * `requested_amount` - Amount to move
    /// * `requested_by` - Who is asking
    /// * `available_sales_cash` - Current sales-cash balance
    ///
    /// # Returns
    /// * `Err(ApprovalError::Validation)` for a non-positive amount or blank requester
    /// * `Err(ApprovalError::InsufficientFunds)` if the amount exceeds sales cash
    pub fn validate_transfer(
        requested_amount: Decimal,
        requested_by: &str,
        available_sales_cash: Decimal,
    ) -> Result<(), ApprovalError> {
        Self::require_positive(requested_amount, "Requested amount")?;
        Self::require_text(requested_by, "requested_by")?;

        if requested_amount > available_sales_cash {
            return Err(ApprovalError::InsufficientFunds {
                requested: requested_amount,
                available: available_sales_cash,
            });
        }
        Ok(())
    }

    /// Validates an adjustment request and returns the priority to persist.
    ///
    /// # Returns
    /// * `Ok(priority)` with initial setup raised to high
    /// * `Err(ApprovalError::Validation)` for a non-positive amount or blank text
    pub fn validate_adjustment(
        adjustment_type: AdjustmentType,
        requested_amount: Decimal,
        requested_by: &str,
        reason: &str,
        requested_priority: Priority,
    ) -> Result<Priority, ApprovalError> {
        Self::require_positive(requested_amount, "Requested amount")?;
        Self::require_text(requested_by, "requested_by")?;
        Self::require_text(reason, "reason")?;
        Ok(adjustment_type.effective_priority(requested_priority))
    }

    /// Approve a pending request.
    ///
    /// The approved amount defaults to the requested amount and may be lower
    /// or higher (partial approval), but must be positive.
    ///
    /// # Returns
    /// * `Ok(ApprovalAction::Approve)` if the transition is valid
    /// * `Err(ApprovalError::InvalidTransition)` if not in Pending status
    pub fn approve(
        current_status: ApprovalStatus,
        requested_amount: Decimal,
        approved_amount: Option<Decimal>,
        approved_by: &str,
        approval_notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<ApprovalAction, ApprovalError> {
        if current_status != ApprovalStatus::Pending {
            return Err(ApprovalError::InvalidTransition {
                from: current_status,
                to: ApprovalStatus::Approved,
            });
        }

        let approved_amount = approved_amount.unwrap_or(requested_amount);
        Self::require_positive(approved_amount, "Approved amount")?;
        Self::require_text(approved_by, "approved_by")?;

        Ok(ApprovalAction::Approve {
            new_status: ApprovalStatus::Approved,
            approved_amount,
            approved_by: approved_by.trim().to_string(),
            approval_date: now,
            approval_notes: approval_notes.filter(|n| !n.trim().is_empty()),
        })
    }

    /// Reject a pending request. Notes are required.
    ///
    /// # Returns
    /// * `Ok(ApprovalAction::Reject)` if the transition is valid
    /// * `Err(ApprovalError::InvalidTransition)` if not in Pending status
    /// * `Err(ApprovalError::Validation)` if the notes are blank
    pub fn reject(
        current_status: ApprovalStatus,
        approved_by: &str,
        approval_notes: &str,
        now: DateTime<Utc>,
    ) -> Result<ApprovalAction, ApprovalError> {
        if current_status != ApprovalStatus::Pending {
            return Err(ApprovalError::InvalidTransition {
                from: current_status,
                to: ApprovalStatus::Rejected,
            });
        }

        Self::require_text(approved_by, "approved_by")?;
        if approval_notes.trim().is_empty() {
            return Err(ApprovalError::Validation(
                "Rejection notes are required".to_string(),
            ));
        }

        Ok(ApprovalAction::Reject {
            new_status: ApprovalStatus::Rejected,
            approved_by: approved_by.trim().to_string(),
            approval_date: now,
            approval_notes: approval_notes.to_string(),
        })
    }

    /// Complete an approved request.
    ///
    /// # Returns
    /// * `Ok(ApprovalAction::Complete)` if the transition is valid
    /// * `Err(ApprovalError::InvalidTransition)` if not in Approved status
    pub fn complete(
        current_status: ApprovalStatus,
        completed_by: &str,
        now: DateTime<Utc>,
    ) -> Result<ApprovalAction, ApprovalError> {
        if current_status != ApprovalStatus::Approved {
            return Err(ApprovalError::InvalidTransition {
                from: current_status,
                to: ApprovalStatus::Completed,
            });
        }

        Self::require_text(completed_by, "completed_by")?;

        Ok(ApprovalAction::Complete {
            new_status: ApprovalStatus::Completed,
            completed_by: completed_by.trim().to_string(),
            completed_at: now,
        })
    }

    /// Fails if applying `change` would take `balance` below zero.
    pub fn ensure_no_underflow(
        account: AccountType,
        balance: Decimal,
        change: Decimal,
    ) -> Result<(), ApprovalError> {
        if balance + change < Decimal::ZERO {
            return Err(ApprovalError::WouldUnderflow {
                account,
                balance,
                change,
            });
        }
        Ok(())
    }

    /// Movements produced by completing a transfer of `amount`.
    #[must_use]
    pub fn transfer_effects(amount: Decimal) -> [CashEffect; 2] {
        let amount = amount.abs();
        [
            CashEffect {
                account: AccountType::SalesCash,
                movement_type: MovementType::TransferOut,
                amount: -amount,
                rollup: Some(CashFlowCategory::PettyTransfersOut),
            },
            CashEffect {
                account: AccountType::PettyCash,
                movement_type: MovementType::TransferIn,
                amount,
                rollup: None,
            },
        ]
    }

    /// Movement produced by completing an adjustment.
    ///
    /// Only sales-cash adjustments are mirrored on the daily position.
    #[must_use]
    pub fn adjustment_effect(
        adjustment_type: AdjustmentType,
        account: AccountType,
        magnitude: Decimal,
    ) -> CashEffect {
        CashEffect {
            account,
            movement_type: MovementType::Adjustment,
            amount: adjustment_type.signed_amount(magnitude),
            rollup: match account {
                AccountType::SalesCash => Some(CashFlowCategory::CashAdjustments),
                AccountType::PettyCash => None,
            },
        }
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Pending → Approved (approve)
    /// - Pending → Rejected (reject)
    /// - Approved → Completed (complete)
    #[must_use]
    pub fn is_valid_transition(from: ApprovalStatus, to: ApprovalStatus) -> bool {
        matches!(
            (from, to),
            (
                ApprovalStatus::Pending,
                ApprovalStatus::Approved | ApprovalStatus::Rejected
            ) | (ApprovalStatus::Approved, ApprovalStatus::Completed)
        )
    }

    fn require_positive(amount: Decimal, label: &str) -> Result<(), ApprovalError> {
        if amount <= Decimal::ZERO {
            return Err(ApprovalError::Validation(format!(
                "{label} must be positive, got {amount}"
            )));
        }
        Ok(())
    }

    fn require_text(value: &str, field: &str) -> Result<(), ApprovalError> {
        if value.trim().is_empty() {
            return Err(ApprovalError::Validation(format!("{field} is required")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 22, 14, 30, 0).unwrap()
    }

    #[test]
    fn test_transfer_within_funds() {
        assert!(ApprovalService::validate_transfer(dec!(200), "cashier1", dec!(650)).is_ok());
        assert!(ApprovalService::validate_transfer(dec!(650), "cashier1", dec!(650)).is_ok());
    }

    #[test]
    fn test_transfer_insufficient_funds() {
        let err =
            ApprovalService::validate_transfer(dec!(700), "cashier1", dec!(650)).unwrap_err();
        assert!(matches!(
            err,
            ApprovalError::InsufficientFunds { requested, available }
                if requested == dec!(700) && available == dec!(650)
        ));
    }

    #[test]
    fn test_transfer_rejects_non_positive() {
        assert!(matches!(
            ApprovalService::validate_transfer(dec!(0), "cashier1", dec!(650)),
            Err(ApprovalError::Validation(_))
        ));
        assert!(matches!(
            ApprovalService::validate_transfer(dec!(10), " ", dec!(650)),
            Err(ApprovalError::Validation(_))
        ));
    }

    #[test]
    fn test_initial_setup_submitted_low_is_high() {
        let priority = ApprovalService::validate_adjustment(
            AdjustmentType::InitialSetup,
            dec!(5000),
            "owner",
            "Opening float",
            Priority::Low,
        )
        .unwrap();
        assert_eq!(priority, Priority::High);
    }

    #[test]
    fn test_adjustment_requires_reason() {
        assert!(matches!(
            ApprovalService::validate_adjustment(
                AdjustmentType::Correction,
                dec!(10),
                "owner",
                "",
                Priority::Medium,
            ),
            Err(ApprovalError::Validation(msg)) if msg.contains("reason")
        ));
    }

    #[test]
    fn test_approve_defaults_to_requested() {
        let action = ApprovalService::approve(
            ApprovalStatus::Pending,
            dec!(300),
            None,
            "manager1",
            Some("ok".into()),
            now(),
        )
        .unwrap();
        match action {
            ApprovalAction::Approve {
                new_status,
                approved_amount,
                approved_by,
                approval_date,
                approval_notes,
            } => {
                assert_eq!(new_status, ApprovalStatus::Approved);
                assert_eq!(approved_amount, dec!(300));
                assert_eq!(approved_by, "manager1");
                assert_eq!(approval_date, now());
                assert_eq!(approval_notes.as_deref(), Some("ok"));
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn test_partial_approval() {
        let action = ApprovalService::approve(
            ApprovalStatus::Pending,
            dec!(300),
            Some(dec!(120)),
            "manager1",
            None,
            now(),
        )
        .unwrap();
        assert!(matches!(
            action,
            ApprovalAction::Approve { approved_amount, .. } if approved_amount == dec!(120)
        ));
    }

    #[test]
    fn test_second_approve_is_invalid() {
        let err = ApprovalService::approve(
            ApprovalStatus::Approved,
            dec!(300),
            None,
            "manager2",
            None,
            now(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ApprovalError::InvalidTransition {
                from: ApprovalStatus::Approved,
                to: ApprovalStatus::Approved
            }
        ));
    }

    #[test]
    fn test_approve_zero_amount_rejected() {
        assert!(matches!(
            ApprovalService::approve(
                ApprovalStatus::Pending,
                dec!(300),
                Some(dec!(0)),
                "manager1",
                None,
                now()
            ),
            Err(ApprovalError::Validation(_))
        ));
    }

    #[test]
    fn test_reject_requires_notes() {
        assert!(matches!(
            ApprovalService::reject(ApprovalStatus::Pending, "manager1", "  ", now()),
            Err(ApprovalError::Validation(_))
        ));
        let action =
            ApprovalService::reject(ApprovalStatus::Pending, "manager1", "Not needed", now())
                .unwrap();
        assert_eq!(action.new_status(), ApprovalStatus::Rejected);
    }

    #[test]
    fn test_complete_requires_approved() {
        assert!(matches!(
            ApprovalService::complete(ApprovalStatus::Pending, "manager1", now()),
            Err(ApprovalError::InvalidTransition { .. })
        ));
        let action =
            ApprovalService::complete(ApprovalStatus::Approved, "manager1", now()).unwrap();
        assert_eq!(action.new_status(), ApprovalStatus::Completed);
    }

    #[test]
    fn test_actions_carry_trimmed_identities() {
        let ApprovalAction::Reject {
            approved_by,
            approval_date,
            approval_notes,
            ..
        } = ApprovalService::reject(ApprovalStatus::Pending, " manager1 ", "Not needed", now())
            .unwrap()
        else {
            panic!("expected a rejection");
        };
        assert_eq!(approved_by, "manager1");
        assert_eq!(approval_date, now());
        assert_eq!(approval_notes, "Not needed");

        let ApprovalAction::Complete {
            completed_by,
            completed_at,
            ..
        } = ApprovalService::complete(ApprovalStatus::Approved, "clerk2 ", now()).unwrap()
        else {
            panic!("expected a completion");
        };
        assert_eq!(completed_by, "clerk2");
        assert_eq!(completed_at, now());
    }

    #[test]
    fn test_underflow_guard() {
        assert!(
            ApprovalService::ensure_no_underflow(AccountType::SalesCash, dec!(100), dec!(-100))
                .is_ok()
        );
        assert!(matches!(
            ApprovalService::ensure_no_underflow(
                AccountType::SalesCash,
                dec!(100),
                dec!(-100.01)
            ),
            Err(ApprovalError::WouldUnderflow { .. })
        ));
    }

    #[test]
    fn test_transfer_effects_balance_out() {
        let effects = ApprovalService::transfer_effects(dec!(250));
        let net: Decimal = effects.iter().map(|e| e.amount).sum();
        assert_eq!(net, Decimal::ZERO);
        assert_eq!(effects[0].account, AccountType::SalesCash);
        assert_eq!(effects[0].amount, dec!(-250));
        assert_eq!(effects[1].movement_type, MovementType::TransferIn);
    }

    #[test]
    fn test_adjustment_effect_rollup() {
        let loss = ApprovalService::adjustment_effect(
            AdjustmentType::Loss,
            AccountType::SalesCash,
            dec!(40),
        );
        assert_eq!(loss.amount, dec!(-40));
        assert_eq!(loss.rollup, Some(CashFlowCategory::CashAdjustments));

        let petty = ApprovalService::adjustment_effect(
            AdjustmentType::Injection,
            AccountType::PettyCash,
            dec!(40),
        );
        assert_eq!(petty.rollup, None);
    }

    #[test]
    fn test_valid_transitions() {
        use ApprovalStatus::*;
        assert!(ApprovalService::is_valid_transition(Pending, Approved));
        assert!(ApprovalService::is_valid_transition(Pending, Rejected));
        assert!(ApprovalService::is_valid_transition(Approved, Completed));
        assert!(!ApprovalService::is_valid_transition(Approved, Rejected));
        assert!(!ApprovalService::is_valid_transition(Rejected, Pending));
        assert!(!ApprovalService::is_valid_transition(Completed, Approved));
    }
}
