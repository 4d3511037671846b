//! Integration tests for the transfer and adjustment approval workflow.

mod common;

use rust_decimal_macros::dec;

use common::{at, date, new_store, seed_three_days, test_db};
use strongroom_core::approval::{AdjustmentType, ApprovalError, ApprovalStatus, Priority};
use strongroom_core::ledger::AccountType;
use strongroom_db::entities::sea_orm_active_enums as db_enums;
use strongroom_db::repositories::{ApproveInput, SubmitAdjustmentInput, SubmitTransferInput};
use strongroom_db::{ApprovalRepository, LedgerRepository, MovementRepository};

fn approve_by(who: &str) -> ApproveInput {
    ApproveInput {
        approved_amount: None,
        approved_by: who.to_string(),
        notes: None,
    }
}

fn transfer(store_id: uuid::Uuid, amount: rust_decimal::Decimal) -> SubmitTransferInput {
    SubmitTransferInput {
        store_id,
        requested_amount: amount,
        priority: Priority::Medium,
        reason: Some("Float for courier fees".to_string()),
        requested_by: "cashier1".to_string(),
    }
}

#[tokio::test]
async fn test_initial_setup_is_raised_to_high_priority() {
    let Some(db) = test_db().await else { return };
    let approvals = ApprovalRepository::new(db.clone());
    let store_id = new_store();

    let adjustment = approvals
        .submit_adjustment(
            SubmitAdjustmentInput {
                store_id,
                adjustment_type: AdjustmentType::InitialSetup,
                account: AccountType::PettyCash,
                requested_amount: dec!(5000),
                reason: "Opening float".to_string(),
                priority: Priority::Low,
                requested_by: "manager1".to_string(),
            },
            at(20, 9),
        )
        .await
        .unwrap();

    assert_eq!(adjustment.priority, db_enums::Priority::High);
    assert_eq!(adjustment.status, db_enums::ApprovalStatus::Pending);
    assert_eq!(adjustment.balance_snapshot, dec!(0));
}

#[tokio::test]
async fn test_transfer_lifecycle_moves_cash() {
    let Some(db) = test_db().await else { return };
    let ledger = LedgerRepository::new(db.clone());
    let approvals = ApprovalRepository::new(db.clone());
    let store_id = new_store();

    ledger
        .add_cash_sale(store_id, date(20), dec!(1000), "cashier1")
        .await
        .unwrap();

    let requested = approvals
        .submit_transfer(transfer(store_id, dec!(300)), at(20, 10))
        .await
        .unwrap();
    assert_eq!(requested.sales_cash_balance, dec!(1000));
    assert_eq!(requested.petty_cash_balance, dec!(0));

    let approved = approvals
        .approve_transfer(requested.id, approve_by("manager1"), at(20, 11))
        .await
        .unwrap();
    assert_eq!(approved.status, db_enums::ApprovalStatus::Approved);
    assert_eq!(approved.approved_amount, Some(dec!(300)));

    let completed = approvals
        .complete_transfer(requested.id, "manager1", date(20), at(20, 12))
        .await
        .unwrap();
    assert_eq!(completed.status, db_enums::ApprovalStatus::Completed);

    let sales = ledger
        .current_account_balance(store_id, AccountType::SalesCash)
        .await
        .unwrap();
    let petty = ledger
        .current_account_balance(store_id, AccountType::PettyCash)
        .await
        .unwrap();
    assert_eq!(sales, dec!(700));
    assert_eq!(petty, dec!(300));

    let position = ledger.get_position(store_id, date(20)).await.unwrap().unwrap();
    assert_eq!(position.petty_transfers_out, dec!(300));
    assert_eq!(position.closing_balance, dec!(700));

    let movements = MovementRepository::new(db.clone())
        .for_reference("cash_transfer", requested.id)
        .await
        .unwrap();
    assert_eq!(movements.len(), 2);
}

#[tokio::test]
async fn test_second_approval_is_invalid_transition() {
    let Some(db) = test_db().await else { return };
    let ledger = LedgerRepository::new(db.clone());
    let approvals = ApprovalRepository::new(db.clone());
    let store_id = new_store();

    ledger
        .add_cash_sale(store_id, date(20), dec!(500), "cashier1")
        .await
        .unwrap();
    let requested = approvals
        .submit_transfer(transfer(store_id, dec!(100)), at(20, 10))
        .await
        .unwrap();

    approvals
        .approve_transfer(requested.id, approve_by("manager1"), at(20, 11))
        .await
        .unwrap();
    let again = approvals
        .approve_transfer(requested.id, approve_by("manager2"), at(20, 11))
        .await;

    assert!(matches!(
        again,
        Err(ApprovalError::InvalidTransition {
            from: ApprovalStatus::Approved,
            to: ApprovalStatus::Approved
        })
    ));
}

#[tokio::test]
async fn test_rejected_request_cannot_complete() {
    let Some(db) = test_db().await else { return };
    let ledger = LedgerRepository::new(db.clone());
    let approvals = ApprovalRepository::new(db.clone());
    let store_id = new_store();

    ledger
        .add_cash_sale(store_id, date(20), dec!(500), "cashier1")
        .await
        .unwrap();
    let requested = approvals
        .submit_transfer(transfer(store_id, dec!(100)), at(20, 10))
        .await
        .unwrap();

    let rejected = approvals
        .reject_transfer(requested.id, "manager1", "Not needed this week", at(20, 11))
        .await
        .unwrap();
    assert_eq!(rejected.status, db_enums::ApprovalStatus::Rejected);

    let complete = approvals
        .complete_transfer(requested.id, "manager1", date(20), at(20, 12))
        .await;
    assert!(matches!(complete, Err(ApprovalError::InvalidTransition { .. })));
}

#[tokio::test]
async fn test_transfer_beyond_sales_cash_is_refused() {
    let Some(db) = test_db().await else { return };
    let ledger = LedgerRepository::new(db.clone());
    let approvals = ApprovalRepository::new(db.clone());
    let store_id = new_store();

    ledger
        .add_cash_sale(store_id, date(20), dec!(200), "cashier1")
        .await
        .unwrap();

    let result = approvals
        .submit_transfer(transfer(store_id, dec!(500)), at(20, 10))
        .await;
    assert!(matches!(result, Err(ApprovalError::InsufficientFunds { .. })));
}

#[tokio::test]
async fn test_loss_that_would_underflow_is_refused() {
    let Some(db) = test_db().await else { return };
    let approvals = ApprovalRepository::new(db.clone());
    let store_id = new_store();

    let adjustment = approvals
        .submit_adjustment(
            SubmitAdjustmentInput {
                store_id,
                adjustment_type: AdjustmentType::Loss,
                account: AccountType::PettyCash,
                requested_amount: dec!(50),
                reason: "Missing from tin".to_string(),
                priority: Priority::Medium,
                requested_by: "cashier1".to_string(),
            },
            at(20, 9),
        )
        .await
        .unwrap();

    let result = approvals
        .approve_adjustment(adjustment.id, approve_by("manager1"), at(20, 10))
        .await;
    assert!(matches!(result, Err(ApprovalError::WouldUnderflow { .. })));

    let unchanged = approvals.get_adjustment(adjustment.id).await.unwrap();
    assert_eq!(unchanged.status, db_enums::ApprovalStatus::Pending);
}

#[tokio::test]
async fn test_sales_cash_correction_rolls_into_position() {
    let Some(db) = test_db().await else { return };
    let ledger = LedgerRepository::new(db.clone());
    let approvals = ApprovalRepository::new(db.clone());
    let store_id = new_store();

    ledger
        .add_cash_sale(store_id, date(20), dec!(400), "cashier1")
        .await
        .unwrap();

    let adjustment = approvals
        .submit_adjustment(
            SubmitAdjustmentInput {
                store_id,
                adjustment_type: AdjustmentType::Loss,
                account: AccountType::SalesCash,
                requested_amount: dec!(25),
                reason: "Damaged note".to_string(),
                priority: Priority::Medium,
                requested_by: "cashier1".to_string(),
            },
            at(20, 9),
        )
        .await
        .unwrap();
    approvals
        .approve_adjustment(adjustment.id, approve_by("manager1"), at(20, 10))
        .await
        .unwrap();
    approvals
        .complete_adjustment(adjustment.id, "manager1", date(20), at(20, 11))
        .await
        .unwrap();

    let position = ledger.get_position(store_id, date(20)).await.unwrap().unwrap();
    assert_eq!(position.cash_adjustments, dec!(-25));
    assert_eq!(position.closing_balance, dec!(375));

    let sales = ledger
        .current_account_balance(store_id, AccountType::SalesCash)
        .await
        .unwrap();
    assert_eq!(sales, dec!(375));
}

#[tokio::test]
async fn test_concurrent_completions_cannot_overdraw_sales_cash() {
    let Some(db) = test_db().await else { return };
    let ledger = LedgerRepository::new(db.clone());
    let approvals = ApprovalRepository::new(db.clone());
    let store_id = new_store();
    seed_three_days(&ledger, store_id).await;

    let mut ids = Vec::new();
    for _ in 0..2 {
        let requested = approvals
            .submit_transfer(transfer(store_id, dec!(600)), at(22, 10))
            .await
            .unwrap();
        approvals
            .approve_transfer(requested.id, approve_by("manager1"), at(22, 11))
            .await
            .unwrap();
        ids.push(requested.id);
    }

    let (first, second) = tokio::join!(
        approvals.complete_transfer(ids[0], "manager1", date(22), at(22, 12)),
        approvals.complete_transfer(ids[1], "manager1", date(22), at(22, 12)),
    );
    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .any(|r| matches!(r, Err(ApprovalError::WouldUnderflow { .. })))
    );

    let sales = ledger
        .current_account_balance(store_id, AccountType::SalesCash)
        .await
        .unwrap();
    assert_eq!(sales, dec!(50));
}

#[tokio::test]
async fn test_concurrent_approvals_keep_first_writer() {
    let Some(db) = test_db().await else { return };
    let ledger = LedgerRepository::new(db.clone());
    let approvals = ApprovalRepository::new(db.clone());
    let store_id = new_store();

    ledger
        .add_cash_sale(store_id, date(20), dec!(500), "cashier1")
        .await
        .unwrap();
    let requested = approvals
        .submit_transfer(transfer(store_id, dec!(100)), at(20, 10))
        .await
        .unwrap();

    let with_notes = |who: &str| ApproveInput {
        notes: Some(format!("Checked by {who}")),
        ..approve_by(who)
    };
    let (first, second) = tokio::join!(
        approvals.approve_transfer(requested.id, with_notes("manager1"), at(20, 11)),
        approvals.approve_transfer(requested.id, with_notes("manager2"), at(20, 11)),
    );

    let winner = match (&first, &second) {
        (Ok(_), Err(ApprovalError::InvalidTransition { .. })) => "manager1",
        (Err(ApprovalError::InvalidTransition { .. }), Ok(_)) => "manager2",
        other => panic!("expected exactly one approval, got {other:?}"),
    };

    let stored = approvals.get_transfer(requested.id).await.unwrap();
    assert_eq!(stored.approved_by.as_deref(), Some(winner));
    assert_eq!(stored.approval_notes, Some(format!("Checked by {winner}")));
}
