//! Initial database migration.
//!
//! Creates the cash ledger tables, the deposit and approval tables, and the
//! six transaction tables that carry reconciliation columns.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: LEDGER STORE
        // ============================================================
        db.execute_unprepared(CASH_DEPOSITS_SQL).await?;
        db.execute_unprepared(DAILY_CASH_POSITIONS_SQL).await?;
        db.execute_unprepared(DEPOSIT_DAY_MAPPINGS_SQL).await?;

        // ============================================================
        // PART 2: MOVEMENT LOG
        // ============================================================
        db.execute_unprepared(CASH_MOVEMENTS_SQL).await?;

        // ============================================================
        // PART 3: APPROVAL WORKFLOW
        // ============================================================
        db.execute_unprepared(CASH_TRANSFERS_SQL).await?;
        db.execute_unprepared(CASH_ADJUSTMENTS_SQL).await?;

        // ============================================================
        // PART 4: RECONCILABLE TRANSACTIONS
        // ============================================================
        for table in RECONCILABLE_TABLES {
            db.execute_unprepared(&reconcilable_table_sql(table)).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const CASH_DEPOSITS_SQL: &str = r"
CREATE TABLE cash_deposits (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    store_id UUID NOT NULL,
    amount NUMERIC(19, 4) NOT NULL CHECK (amount > 0),
    deposit_slip_number VARCHAR(100) NOT NULL,
    bank_name VARCHAR(200) NOT NULL,
    deposited_by VARCHAR(200) NOT NULL,
    from_date DATE NOT NULL,
    to_date DATE NOT NULL,
    days_included INTEGER NOT NULL CHECK (days_included > 0),
    accumulated_amount NUMERIC(19, 4) NOT NULL,
    counted_amount NUMERIC(19, 4),
    count_variance NUMERIC(19, 4),
    variance_reason TEXT,
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CHECK (from_date <= to_date)
);

CREATE INDEX idx_cash_deposits_store_created ON cash_deposits(store_id, created_at DESC);
";

const DAILY_CASH_POSITIONS_SQL: &str = r"
CREATE TABLE daily_cash_positions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    store_id UUID NOT NULL,
    business_date DATE NOT NULL,
    opening_balance NUMERIC(19, 4) NOT NULL DEFAULT 0,
    cash_sales NUMERIC(19, 4) NOT NULL DEFAULT 0,
    so_advances NUMERIC(19, 4) NOT NULL DEFAULT 0,
    gift_voucher_sales NUMERIC(19, 4) NOT NULL DEFAULT 0,
    hand_bill_collections NUMERIC(19, 4) NOT NULL DEFAULT 0,
    petty_transfers_in NUMERIC(19, 4) NOT NULL DEFAULT 0,
    other_receipts NUMERIC(19, 4) NOT NULL DEFAULT 0,
    cash_adjustments NUMERIC(19, 4) NOT NULL DEFAULT 0,
    cash_returns NUMERIC(19, 4) NOT NULL DEFAULT 0,
    cash_refunds NUMERIC(19, 4) NOT NULL DEFAULT 0,
    petty_transfers_out NUMERIC(19, 4) NOT NULL DEFAULT 0,
    cash_deposits NUMERIC(19, 4) NOT NULL DEFAULT 0,
    closing_balance NUMERIC(19, 4) NOT NULL DEFAULT 0,
    deposit_status VARCHAR(32) NOT NULL DEFAULT 'pending'
        CHECK (deposit_status IN ('pending', 'deposited', 'partial', 'carried_forward')),
    deposit_id UUID REFERENCES cash_deposits(id),
    deposited_amount NUMERIC(19, 4),
    deposited_at TIMESTAMPTZ,
    counted_amount NUMERIC(19, 4),
    count_variance NUMERIC(19, 4),
    variance_reason TEXT,
    variance_resolved BOOLEAN NOT NULL DEFAULT false,
    is_bank_holiday BOOLEAN NOT NULL DEFAULT false,
    holiday_name VARCHAR(200),
    opening_gap BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (store_id, business_date)
);

CREATE INDEX idx_positions_store_pending ON daily_cash_positions(store_id, business_date)
    WHERE deposit_status = 'pending';
";

const DEPOSIT_DAY_MAPPINGS_SQL: &str = r"
CREATE TABLE deposit_day_mappings (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    deposit_id UUID NOT NULL REFERENCES cash_deposits(id) ON DELETE CASCADE,
    position_id UUID NOT NULL REFERENCES daily_cash_positions(id),
    business_date DATE NOT NULL,
    amount_included NUMERIC(19, 4) NOT NULL,
    UNIQUE (position_id)
);

CREATE INDEX idx_deposit_mappings_deposit ON deposit_day_mappings(deposit_id);
";

const CASH_MOVEMENTS_SQL: &str = r"
CREATE TABLE cash_movements (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    store_id UUID NOT NULL,
    movement_date DATE NOT NULL,
    movement_type VARCHAR(32) NOT NULL
        CHECK (movement_type IN ('posting', 'deposit', 'transfer_out', 'transfer_in', 'adjustment')),
    account_type VARCHAR(32) NOT NULL CHECK (account_type IN ('sales_cash', 'petty_cash')),
    amount NUMERIC(19, 4) NOT NULL,
    reference_type VARCHAR(50),
    reference_id UUID,
    description TEXT,
    created_by VARCHAR(200) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_movements_store_account_date ON cash_movements(store_id, account_type, movement_date);
CREATE INDEX idx_movements_reference ON cash_movements(reference_type, reference_id);

-- Movements are append-only
CREATE OR REPLACE FUNCTION prevent_movement_mutation()
RETURNS TRIGGER AS $$
BEGIN
    RAISE EXCEPTION 'cash_movements is append-only';
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_cash_movements_append_only
    BEFORE UPDATE OR DELETE ON cash_movements
    FOR EACH ROW EXECUTE FUNCTION prevent_movement_mutation();
";

const CASH_TRANSFERS_SQL: &str = r"
CREATE TABLE cash_transfers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    store_id UUID NOT NULL,
    requested_amount NUMERIC(19, 4) NOT NULL CHECK (requested_amount > 0),
    approved_amount NUMERIC(19, 4) CHECK (approved_amount > 0),
    status VARCHAR(32) NOT NULL DEFAULT 'pending'
        CHECK (status IN ('pending', 'approved', 'rejected', 'completed')),
    priority VARCHAR(32) NOT NULL DEFAULT 'medium' CHECK (priority IN ('low', 'medium', 'high')),
    reason TEXT,
    requested_by VARCHAR(200) NOT NULL,
    approved_by VARCHAR(200),
    approval_date TIMESTAMPTZ,
    approval_notes TEXT,
    completed_by VARCHAR(200),
    completed_at TIMESTAMPTZ,
    sales_cash_balance NUMERIC(19, 4) NOT NULL,
    petty_cash_balance NUMERIC(19, 4) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_transfers_store_status ON cash_transfers(store_id, status);
";

const CASH_ADJUSTMENTS_SQL: &str = r"
CREATE TABLE cash_adjustments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    store_id UUID NOT NULL,
    adjustment_type VARCHAR(32) NOT NULL
        CHECK (adjustment_type IN ('initial_setup', 'correction', 'injection', 'loss')),
    account_type VARCHAR(32) NOT NULL CHECK (account_type IN ('sales_cash', 'petty_cash')),
    requested_amount NUMERIC(19, 4) NOT NULL CHECK (requested_amount > 0),
    approved_amount NUMERIC(19, 4) CHECK (approved_amount > 0),
    reason TEXT NOT NULL,
    status VARCHAR(32) NOT NULL DEFAULT 'pending'
        CHECK (status IN ('pending', 'approved', 'rejected', 'completed')),
    priority VARCHAR(32) NOT NULL DEFAULT 'medium' CHECK (priority IN ('low', 'medium', 'high')),
    requested_by VARCHAR(200) NOT NULL,
    approved_by VARCHAR(200),
    approval_date TIMESTAMPTZ,
    approval_notes TEXT,
    completed_by VARCHAR(200),
    completed_at TIMESTAMPTZ,
    balance_snapshot NUMERIC(19, 4) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_adjustments_store_status ON cash_adjustments(store_id, status);
";

const RECONCILABLE_TABLES: [&str; 6] = [
    "sales",
    "expenses",
    "returns",
    "hand_bills",
    "gift_vouchers",
    "sales_orders",
];

fn reconcilable_table_sql(table: &str) -> String {
    format!(
        r"
CREATE TABLE {table} (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    store_id UUID NOT NULL,
    business_date DATE NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    reference_number VARCHAR(100),
    description TEXT,
    reconciliation_status VARCHAR(32) NOT NULL DEFAULT 'pending'
        CHECK (reconciliation_status IN ('pending', 'reconciled')),
    reconciled_by VARCHAR(200),
    reconciled_at TIMESTAMPTZ,
    reconciliation_source VARCHAR(32) NOT NULL DEFAULT 'none'
        CHECK (reconciliation_source IN ('bank', 'erp', 'cash', 'voucher', 'manual', 'batch', 'none')),
    reconciliation_notes TEXT,
    external_reference VARCHAR(200),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_{table}_store_date ON {table}(store_id, business_date);
CREATE INDEX idx_{table}_unreconciled ON {table}(business_date)
    WHERE reconciliation_status = 'pending';
"
    )
}

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS sales_orders CASCADE;
DROP TABLE IF EXISTS gift_vouchers CASCADE;
DROP TABLE IF EXISTS hand_bills CASCADE;
DROP TABLE IF EXISTS returns CASCADE;
DROP TABLE IF EXISTS expenses CASCADE;
DROP TABLE IF EXISTS sales CASCADE;
DROP TABLE IF EXISTS cash_adjustments CASCADE;
DROP TABLE IF EXISTS cash_transfers CASCADE;
DROP TABLE IF EXISTS cash_movements CASCADE;
DROP FUNCTION IF EXISTS prevent_movement_mutation();
DROP TABLE IF EXISTS deposit_day_mappings CASCADE;
DROP TABLE IF EXISTS daily_cash_positions CASCADE;
DROP TABLE IF EXISTS cash_deposits CASCADE;
";
