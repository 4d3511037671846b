//! Integration tests for the ledger store and movement log.

mod common;

use futures::future::join_all;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use common::{date, new_store, seed_three_days, test_db};
use strongroom_core::ledger::{AccountType, CashFlowCategory, LedgerError, closing_balance};
use strongroom_db::entities::{cash_movements, daily_cash_positions};
use strongroom_db::repositories::{MovementFilter, position_flows};
use strongroom_db::{LedgerRepository, MovementRepository};

#[tokio::test]
async fn test_ensure_position_is_idempotent() {
    let Some(db) = test_db().await else { return };
    let ledger = LedgerRepository::new(db.clone());
    let store_id = new_store();

    let first = ledger.ensure_position(store_id, date(20)).await.unwrap();
    let second = ledger.ensure_position(store_id, date(20)).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.opening_balance, Decimal::ZERO);
    assert!(!first.opening_gap);
}

#[tokio::test]
async fn test_concurrent_ensure_creates_one_row() {
    let Some(db) = test_db().await else { return };
    let ledger = LedgerRepository::new(db.clone());
    let store_id = new_store();

    let results = join_all((0..10).map(|_| ledger.ensure_position(store_id, date(20)))).await;
    let ids: Vec<_> = results.into_iter().map(|r| r.unwrap().id).collect();
    assert!(ids.iter().all(|id| *id == ids[0]));

    let rows = daily_cash_positions::Entity::find()
        .filter(daily_cash_positions::Column::StoreId.eq(store_id))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_opening_chains_from_previous_closing() {
    let Some(db) = test_db().await else { return };
    let ledger = LedgerRepository::new(db.clone());
    let store_id = new_store();

    seed_three_days(&ledger, store_id).await;

    let day3 = ledger.get_position(store_id, date(22)).await.unwrap().unwrap();
    assert_eq!(day3.opening_balance, dec!(1250));
    assert_eq!(day3.cash_refunds, dec!(600));

    let flows = position_flows(&day3);
    assert_eq!(closing_balance(day3.opening_balance, &flows), day3.closing_balance);
}

#[tokio::test]
async fn test_missing_previous_day_flags_gap() {
    let Some(db) = test_db().await else { return };
    let ledger = LedgerRepository::new(db.clone());
    let store_id = new_store();

    ledger
        .add_cash_sale(store_id, date(20), dec!(500), "cashier1")
        .await
        .unwrap();
    let later = ledger.ensure_position(store_id, date(23)).await.unwrap();

    assert_eq!(later.opening_balance, Decimal::ZERO);
    assert!(later.opening_gap);
}

#[tokio::test]
async fn test_posting_appends_movement() {
    let Some(db) = test_db().await else { return };
    let ledger = LedgerRepository::new(db.clone());
    let movements = MovementRepository::new(db.clone());
    let store_id = new_store();

    ledger
        .add_cash_sale(store_id, date(20), dec!(300), "cashier1")
        .await
        .unwrap();
    ledger
        .add_cash_return(store_id, date(20), dec!(50), "cashier1")
        .await
        .unwrap();

    let balance = ledger
        .current_account_balance(store_id, AccountType::SalesCash)
        .await
        .unwrap();
    assert_eq!(balance, dec!(250));

    let logged = movements
        .list(
            store_id,
            MovementFilter {
                account: Some(AccountType::SalesCash),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(logged.len(), 2);
}

#[tokio::test]
async fn test_posting_rejects_non_positive_and_adjustment_category() {
    let Some(db) = test_db().await else { return };
    let ledger = LedgerRepository::new(db.clone());
    let store_id = new_store();

    let zero = ledger
        .post(store_id, date(20), CashFlowCategory::CashSales, Decimal::ZERO, "cashier1")
        .await;
    assert!(matches!(zero, Err(LedgerError::Validation(_))));

    let adjustment = ledger
        .post(store_id, date(20), CashFlowCategory::CashAdjustments, dec!(10), "cashier1")
        .await;
    assert!(matches!(adjustment, Err(LedgerError::Validation(_))));
}

#[tokio::test]
async fn test_deposited_position_is_frozen() {
    let Some(db) = test_db().await else { return };
    let ledger = LedgerRepository::new(db.clone());
    let store_id = new_store();

    let position = ledger
        .add_cash_sale(store_id, date(20), dec!(100), "cashier1")
        .await
        .unwrap();
    daily_cash_positions::Entity::update_many()
        .col_expr(
            daily_cash_positions::Column::DepositStatus,
            Expr::value(strongroom_db::entities::sea_orm_active_enums::DepositStatus::Deposited),
        )
        .filter(daily_cash_positions::Column::Id.eq(position.id))
        .exec(&db)
        .await
        .unwrap();

    let result = ledger
        .add_cash_sale(store_id, date(20), dec!(100), "cashier1")
        .await;
    assert!(matches!(result, Err(LedgerError::PositionDeposited { .. })));

    let unchanged = ledger.get_position(store_id, date(20)).await.unwrap().unwrap();
    assert_eq!(unchanged.closing_balance, dec!(100));
}

#[tokio::test]
async fn test_cash_count_within_and_beyond_tolerance() {
    let Some(db) = test_db().await else { return };
    let ledger = LedgerRepository::new(db.clone());
    let store_id = new_store();

    ledger
        .add_cash_sale(store_id, date(20), dec!(1000), "cashier1")
        .await
        .unwrap();

    let (position, evaluation) = ledger
        .record_cash_count(store_id, date(20), dec!(960), None, dec!(100))
        .await
        .unwrap();
    assert_eq!(position.count_variance, Some(dec!(-40)));
    assert!(position.variance_resolved);
    assert_eq!(evaluation.tolerance, dec!(100));

    let beyond = ledger
        .record_cash_count(store_id, date(20), dec!(800), None, dec!(100))
        .await;
    assert!(matches!(beyond, Err(LedgerError::VarianceExceedsTolerance { .. })));

    let (explained, _) = ledger
        .record_cash_count(store_id, date(20), dec!(800), Some("till short".into()), dec!(100))
        .await
        .unwrap();
    assert_eq!(explained.variance_reason.as_deref(), Some("till short"));
    assert_eq!(explained.closing_balance, dec!(1000));
}

#[tokio::test]
async fn test_bank_holiday_marks_position() {
    let Some(db) = test_db().await else { return };
    let ledger = LedgerRepository::new(db.clone());
    let store_id = new_store();

    let position = ledger
        .mark_bank_holiday(store_id, date(26), "Republic Day")
        .await
        .unwrap();
    assert!(position.is_bank_holiday);
    assert_eq!(position.holiday_name.as_deref(), Some("Republic Day"));
}

#[tokio::test]
async fn test_movements_are_append_only() {
    let Some(db) = test_db().await else { return };
    let ledger = LedgerRepository::new(db.clone());
    let store_id = new_store();

    ledger
        .add_cash_sale(store_id, date(20), dec!(100), "cashier1")
        .await
        .unwrap();

    let result = cash_movements::Entity::update_many()
        .col_expr(cash_movements::Column::Amount, Expr::value(dec!(1)))
        .filter(cash_movements::Column::StoreId.eq(store_id))
        .exec(&db)
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_back_dated_posting_carries_into_later_days() {
    let Some(db) = test_db().await else { return };
    let ledger = LedgerRepository::new(db.clone());
    let store_id = new_store();
    seed_three_days(&ledger, store_id).await;

    ledger
        .add_cash_sale(store_id, date(20), dec!(100), "cashier1")
        .await
        .unwrap();

    let d20 = ledger.get_position(store_id, date(20)).await.unwrap().unwrap();
    let d21 = ledger.get_position(store_id, date(21)).await.unwrap().unwrap();
    let d22 = ledger.get_position(store_id, date(22)).await.unwrap().unwrap();
    assert_eq!(d20.closing_balance, dec!(950));
    assert_eq!(d21.opening_balance, dec!(950));
    assert_eq!(d21.closing_balance, dec!(1350));
    assert_eq!(d22.opening_balance, dec!(1350));
    assert_eq!(d22.closing_balance, dec!(750));

    let balance = ledger
        .current_account_balance(store_id, AccountType::SalesCash)
        .await
        .unwrap();
    assert_eq!(balance, d22.closing_balance);
}

#[tokio::test]
async fn test_back_dated_posting_cannot_reach_deposited_day() {
    let Some(db) = test_db().await else { return };
    let ledger = LedgerRepository::new(db.clone());
    let movements = MovementRepository::new(db.clone());
    let store_id = new_store();
    let [_, day2, _] = seed_three_days(&ledger, store_id).await;

    daily_cash_positions::Entity::update_many()
        .col_expr(
            daily_cash_positions::Column::DepositStatus,
            Expr::value(strongroom_db::entities::sea_orm_active_enums::DepositStatus::Deposited),
        )
        .filter(daily_cash_positions::Column::Id.eq(day2))
        .exec(&db)
        .await
        .unwrap();

    let result = ledger
        .add_cash_sale(store_id, date(20), dec!(100), "cashier1")
        .await;
    match result {
        Err(LedgerError::PositionDeposited { business_date, .. }) => {
            assert_eq!(business_date, date(21));
        }
        other => panic!("expected PositionDeposited, got {other:?}"),
    }

    let d20 = ledger.get_position(store_id, date(20)).await.unwrap().unwrap();
    assert_eq!(d20.cash_sales, dec!(850));
    assert_eq!(d20.closing_balance, dec!(850));

    let logged = movements
        .list(store_id, MovementFilter::default())
        .await
        .unwrap();
    assert_eq!(logged.len(), 3);
}

#[tokio::test]
async fn test_earlier_day_created_later_reseeds_next_day() {
    let Some(db) = test_db().await else { return };
    let ledger = LedgerRepository::new(db.clone());
    let store_id = new_store();

    let first = ledger
        .add_cash_sale(store_id, date(21), dec!(400), "cashier1")
        .await
        .unwrap();
    assert_eq!(first.opening_balance, Decimal::ZERO);

    ledger
        .add_cash_sale(store_id, date(20), dec!(850), "cashier1")
        .await
        .unwrap();

    let d21 = ledger.get_position(store_id, date(21)).await.unwrap().unwrap();
    assert_eq!(d21.opening_balance, dec!(850));
    assert_eq!(d21.closing_balance, dec!(1250));
    assert!(!d21.opening_gap);
}

#[tokio::test]
async fn test_expected_cash_ignores_later_days_and_counts() {
    let Some(db) = test_db().await else { return };
    let ledger = LedgerRepository::new(db.clone());
    let store_id = new_store();
    seed_three_days(&ledger, store_id).await;

    let expected = |day| ledger.expected_cash_amount(store_id, AccountType::SalesCash, date(day));
    assert_eq!(expected(21).await.unwrap(), dec!(1250));
    assert_eq!(expected(22).await.unwrap(), dec!(650));

    ledger
        .record_cash_count(store_id, date(21), dec!(1200), None, dec!(100))
        .await
        .unwrap();
    assert_eq!(expected(21).await.unwrap(), dec!(1250));
}

#[tokio::test]
async fn test_expected_cash_falls_back_to_latest_closing() {
    let Some(db) = test_db().await else { return };
    let ledger = LedgerRepository::new(db.clone());
    let store_id = new_store();

    for (day, closing) in [(20, dec!(500)), (22, dec!(900))] {
        let position = ledger.ensure_position(store_id, date(day)).await.unwrap();
        daily_cash_positions::Entity::update_many()
            .col_expr(daily_cash_positions::Column::ClosingBalance, Expr::value(closing))
            .filter(daily_cash_positions::Column::Id.eq(position.id))
            .exec(&db)
            .await
            .unwrap();
    }

    let sales = ledger
        .expected_cash_amount(store_id, AccountType::SalesCash, date(21))
        .await
        .unwrap();
    assert_eq!(sales, dec!(500));

    let petty = ledger
        .expected_cash_amount(store_id, AccountType::PettyCash, date(21))
        .await
        .unwrap();
    assert_eq!(petty, Decimal::ZERO);
}
