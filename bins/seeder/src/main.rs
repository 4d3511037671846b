//! Database seeder for Strongroom development and testing.
//!
//! Seeds a demo store with three pending business days, an opening petty
//! cash float awaiting approval, and a handful of unreconciled transactions.
//!
//! Usage: cargo run --bin seeder

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use uuid::Uuid;

use strongroom_core::approval::{AdjustmentType, Priority};
use strongroom_core::ledger::{AccountType, CashFlowCategory};
use strongroom_db::entities::sea_orm_active_enums::{ReconciliationSource, ReconciliationStatus};
use strongroom_db::entities::{expenses, gift_vouchers, sales};
use strongroom_db::repositories::SubmitAdjustmentInput;
use strongroom_db::{ApprovalRepository, LedgerRepository};

/// Demo store ID (consistent for all seeds)
const DEMO_STORE_ID: &str = "00000000-0000-0000-0000-0000000000a1";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = strongroom_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding cash positions...");
    seed_positions(&db).await;

    println!("Seeding opening petty cash float...");
    seed_petty_float(&db).await;

    println!("Seeding unreconciled transactions...");
    seed_transactions(&db).await;

    println!("Seeding complete!");
}

fn demo_store_id() -> Uuid {
    Uuid::parse_str(DEMO_STORE_ID).unwrap()
}

fn jan(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
}

/// Seeds January 20-22 with closing balances of 850, 1250 and 650.
async fn seed_positions(db: &DatabaseConnection) {
    let ledger = LedgerRepository::new(db.clone());
    let store_id = demo_store_id();

    if ledger
        .get_position(store_id, jan(20))
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo positions already exist, skipping...");
        return;
    }

    let postings = [
        (20, CashFlowCategory::CashSales, 700),
        (20, CashFlowCategory::GiftVoucherSales, 150),
        (21, CashFlowCategory::CashSales, 450),
        (21, CashFlowCategory::CashReturns, 50),
        (22, CashFlowCategory::SoAdvances, 100),
        (22, CashFlowCategory::CashRefunds, 700),
    ];

    for (day, category, amount) in postings {
        match ledger
            .post(store_id, jan(day), category, Decimal::from(amount), "seeder")
            .await
        {
            Ok(position) => println!(
                "  {} {category} {amount} -> closing {}",
                position.business_date, position.closing_balance
            ),
            Err(e) => eprintln!("Failed to post {category} on {}: {e}", jan(day)),
        }
    }
}

/// Seeds a pending initial-setup adjustment for the petty cash float.
async fn seed_petty_float(db: &DatabaseConnection) {
    let approvals = ApprovalRepository::new(db.clone());
    let store_id = demo_store_id();

    if approvals
        .list_adjustments(store_id, None)
        .await
        .map(|existing| !existing.is_empty())
        .unwrap_or(false)
    {
        println!("  Petty cash float already requested, skipping...");
        return;
    }

    let input = SubmitAdjustmentInput {
        store_id,
        adjustment_type: AdjustmentType::InitialSetup,
        account: AccountType::PettyCash,
        requested_amount: Decimal::from(5000),
        reason: "Opening petty cash float".to_string(),
        priority: Priority::Low,
        requested_by: "seeder".to_string(),
    };

    match approvals.submit_adjustment(input, Utc::now()).await {
        Ok(adjustment) => println!(
            "  Requested petty cash float {} (priority {:?})",
            adjustment.id, adjustment.priority
        ),
        Err(e) => eprintln!("Failed to request petty cash float: {e}"),
    }
}

/// Seeds unreconciled sales, expenses and gift vouchers for January 20.
async fn seed_transactions(db: &DatabaseConnection) {
    let store_id = demo_store_id();
    let created_at = Utc
        .with_ymd_and_hms(2025, 1, 20, 18, 0, 0)
        .unwrap()
        .fixed_offset();

    let sales_rows = [("INV-1001", 450), ("INV-1002", 250)];
    for (reference, amount) in sales_rows {
        let row = sales::ActiveModel {
            id: Set(Uuid::new_v4()),
            store_id: Set(store_id),
            business_date: Set(jan(20)),
            amount: Set(Decimal::from(amount)),
            reference_number: Set(Some(reference.to_string())),
            description: Set(None),
            reconciliation_status: Set(ReconciliationStatus::Pending),
            reconciled_by: Set(None),
            reconciled_at: Set(None),
            reconciliation_source: Set(ReconciliationSource::None),
            reconciliation_notes: Set(None),
            external_reference: Set(None),
            created_at: Set(created_at),
        };
        if let Err(e) = row.insert(db).await {
            eprintln!("Failed to insert sale {reference}: {e}");
        }
    }

    let expense = expenses::ActiveModel {
        id: Set(Uuid::new_v4()),
        store_id: Set(store_id),
        business_date: Set(jan(20)),
        amount: Set(Decimal::from(120)),
        reference_number: Set(Some("EXP-0042".to_string())),
        description: Set(Some("Courier charges".to_string())),
        reconciliation_status: Set(ReconciliationStatus::Pending),
        reconciled_by: Set(None),
        reconciled_at: Set(None),
        reconciliation_source: Set(ReconciliationSource::None),
        reconciliation_notes: Set(None),
        external_reference: Set(None),
        created_at: Set(created_at),
    };
    if let Err(e) = expense.insert(db).await {
        eprintln!("Failed to insert expense: {e}");
    }

    let voucher = gift_vouchers::ActiveModel {
        id: Set(Uuid::new_v4()),
        store_id: Set(store_id),
        business_date: Set(jan(20)),
        amount: Set(Decimal::from(150)),
        reference_number: Set(Some("GV-7781".to_string())),
        description: Set(Some("Gift voucher sale".to_string())),
        reconciliation_status: Set(ReconciliationStatus::Pending),
        reconciled_by: Set(None),
        reconciled_at: Set(None),
        reconciliation_source: Set(ReconciliationSource::None),
        reconciliation_notes: Set(None),
        external_reference: Set(None),
        created_at: Set(created_at),
    };
    if let Err(e) = voucher.insert(db).await {
        eprintln!("Failed to insert gift voucher: {e}");
    }

    println!("  Created 4 unreconciled transactions for {}", jan(20));
}
