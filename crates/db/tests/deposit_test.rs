//! Integration tests for multi-day deposits.

mod common;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use common::{at, date, new_store, seed_three_days, test_db};
use strongroom_core::deposit::{DepositError, Urgency};
use strongroom_core::ledger::AccountType;
use strongroom_db::entities::sea_orm_active_enums::DepositStatus;
use strongroom_db::repositories::CreateDepositInput;
use strongroom_db::{DepositRepository, LedgerRepository, MovementRepository};
use strongroom_shared::CashConfig;

fn deposit_input(store_id: Uuid, position_ids: Vec<Uuid>, amount: Decimal) -> CreateDepositInput {
    CreateDepositInput {
        store_id,
        position_ids,
        amount,
        deposit_slip_number: "DEP001".to_string(),
        bank_name: "HDFC Bank".to_string(),
        deposited_by: "manager1".to_string(),
        notes: None,
        counted_amount: None,
        variance_reason: None,
    }
}

#[tokio::test]
async fn test_three_day_deposit_succeeds() {
    let Some(db) = test_db().await else { return };
    let ledger = LedgerRepository::new(db.clone());
    let deposits = DepositRepository::new(db.clone(), CashConfig::default());
    let store_id = new_store();

    let ids = seed_three_days(&ledger, store_id).await;
    let before = ledger
        .current_account_balance(store_id, AccountType::SalesCash)
        .await
        .unwrap();

    let created = deposits
        .create_multi_day_deposit(deposit_input(store_id, ids.to_vec(), dec!(2750)), at(23, 10))
        .await
        .unwrap();

    assert_eq!(created.deposit.days_included, 3);
    assert_eq!(created.deposit.from_date, date(20));
    assert_eq!(created.deposit.to_date, date(22));
    assert_eq!(created.deposit.accumulated_amount, dec!(2750));
    let mapped: Decimal = created.mappings.iter().map(|m| m.amount_included).sum();
    assert_eq!(mapped, dec!(2750));

    for day in [20, 21, 22] {
        let position = ledger.get_position(store_id, date(day)).await.unwrap().unwrap();
        assert_eq!(position.deposit_status, DepositStatus::Deposited);
        assert_eq!(position.deposit_id, Some(created.deposit.id));
    }

    let after = ledger
        .current_account_balance(store_id, AccountType::SalesCash)
        .await
        .unwrap();
    assert_eq!(before - after, dec!(2750));

    let movements = MovementRepository::new(db.clone())
        .for_reference("cash_deposit", created.deposit.id)
        .await
        .unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].amount, dec!(-2750));
}

#[tokio::test]
async fn test_amount_mismatch_mutates_nothing() {
    let Some(db) = test_db().await else { return };
    let ledger = LedgerRepository::new(db.clone());
    let deposits = DepositRepository::new(db.clone(), CashConfig::default());
    let store_id = new_store();

    let ids = seed_three_days(&ledger, store_id).await;

    let result = deposits
        .create_multi_day_deposit(deposit_input(store_id, ids.to_vec(), dec!(2700)), at(23, 10))
        .await;
    match result {
        Err(DepositError::AmountMismatch {
            expected,
            supplied,
            difference,
        }) => {
            assert_eq!(expected, dec!(2750));
            assert_eq!(supplied, dec!(2700));
            assert_eq!(difference, dec!(-50));
        }
        other => panic!("expected AmountMismatch, got {other:?}"),
    }

    for day in [20, 21, 22] {
        let position = ledger.get_position(store_id, date(day)).await.unwrap().unwrap();
        assert_eq!(position.deposit_status, DepositStatus::Pending);
    }
    assert!(deposits.list_deposits(store_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_positions_cannot_be_deposited_twice() {
    let Some(db) = test_db().await else { return };
    let ledger = LedgerRepository::new(db.clone());
    let deposits = DepositRepository::new(db.clone(), CashConfig::default());
    let store_id = new_store();

    let ids = seed_three_days(&ledger, store_id).await;
    deposits
        .create_multi_day_deposit(deposit_input(store_id, vec![ids[0]], dec!(850)), at(21, 10))
        .await
        .unwrap();

    let again = deposits
        .create_multi_day_deposit(deposit_input(store_id, vec![ids[0], ids[1]], dec!(2100)), at(22, 10))
        .await;
    assert!(matches!(again, Err(DepositError::AlreadyDeposited { .. })));

    let day2 = ledger.get_position(store_id, date(21)).await.unwrap().unwrap();
    assert_eq!(day2.deposit_status, DepositStatus::Pending);
}

#[tokio::test]
async fn test_foreign_position_is_not_found() {
    let Some(db) = test_db().await else { return };
    let ledger = LedgerRepository::new(db.clone());
    let deposits = DepositRepository::new(db.clone(), CashConfig::default());
    let store_id = new_store();

    let ids = seed_three_days(&ledger, store_id).await;
    let other_store = new_store();

    let result = deposits
        .create_multi_day_deposit(deposit_input(other_store, vec![ids[0]], dec!(850)), at(21, 10))
        .await;
    assert!(matches!(result, Err(DepositError::PositionNotFound(id)) if id == ids[0]));
}

#[tokio::test]
async fn test_count_beyond_tolerance_needs_reason() {
    let Some(db) = test_db().await else { return };
    let ledger = LedgerRepository::new(db.clone());
    let deposits = DepositRepository::new(db.clone(), CashConfig::default());
    let store_id = new_store();

    let ids = seed_three_days(&ledger, store_id).await;

    let mut input = deposit_input(store_id, ids.to_vec(), dec!(2750));
    input.counted_amount = Some(dec!(2500));
    let result = deposits.create_multi_day_deposit(input.clone(), at(23, 10)).await;
    assert!(matches!(result, Err(DepositError::VarianceExceedsTolerance { .. })));

    input.variance_reason = Some("Counterfeit note removed".to_string());
    let created = deposits.create_multi_day_deposit(input, at(23, 10)).await.unwrap();
    assert_eq!(created.deposit.count_variance, Some(dec!(-250)));
}

#[tokio::test]
async fn test_pending_summary_reports_urgency() {
    let Some(db) = test_db().await else { return };
    let ledger = LedgerRepository::new(db.clone());
    let deposits = DepositRepository::new(db.clone(), CashConfig::default());
    let store_id = new_store();

    seed_three_days(&ledger, store_id).await;

    let pending = deposits.pending_summary(store_id, at(24, 9)).await.unwrap();
    assert_eq!(pending.summary.pending_days, 3);
    assert_eq!(pending.summary.pending_total, dec!(2750));
    assert_eq!(pending.summary.oldest_pending_date, Some(date(20)));
    assert_eq!(pending.summary.urgency, Urgency::Critical);
    assert_eq!(pending.positions.len(), 3);
}
