//! Shared setup for database integration tests.

#![allow(dead_code)]

use std::env;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::{Database, DatabaseConnection};
use tokio::sync::OnceCell;
use uuid::Uuid;

use strongroom_db::LedgerRepository;
use strongroom_db::migration::{Migrator, MigratorTrait};

static MIGRATED: OnceCell<()> = OnceCell::const_new();

fn get_database_url() -> Option<String> {
    env::var("DATABASE_URL")
        .or_else(|_| env::var("STRONGROOM__DATABASE__URL"))
        .ok()
}

/// Connects and migrates, or returns `None` when no database is configured.
pub async fn test_db() -> Option<DatabaseConnection> {
    let Some(url) = get_database_url() else {
        eprintln!("DATABASE_URL not set, skipping database test");
        return None;
    };
    let db = Database::connect(&url)
        .await
        .expect("Failed to connect to database");
    MIGRATED
        .get_or_init(|| async {
            Migrator::up(&db, None).await.expect("Failed to run migrations");
        })
        .await;
    Some(db)
}

pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
}

pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, day, hour, 0, 0).unwrap()
}

/// A fresh store id so tests never see each other's rows.
pub fn new_store() -> Uuid {
    Uuid::new_v4()
}

/// Builds the three-day scenario: closings of 850, 1250 and 650 on
/// January 20, 21 and 22.
pub async fn seed_three_days(ledger: &LedgerRepository, store_id: Uuid) -> [Uuid; 3] {
    let day1 = ledger
        .add_cash_sale(store_id, date(20), Decimal::from(850), "cashier1")
        .await
        .unwrap();
    let day2 = ledger
        .add_cash_sale(store_id, date(21), Decimal::from(400), "cashier1")
        .await
        .unwrap();
    let day3 = ledger
        .add_cash_refund(store_id, date(22), Decimal::from(600), "cashier1")
        .await
        .unwrap();
    assert_eq!(day1.closing_balance, Decimal::from(850));
    assert_eq!(day2.closing_balance, Decimal::from(1250));
    assert_eq!(day3.closing_balance, Decimal::from(650));
    [day1.id, day2.id, day3.id]
}
