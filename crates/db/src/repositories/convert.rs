//! Conversions between database enums and core domain enums.

use strongroom_core::approval::{AdjustmentType, ApprovalStatus, Priority};
use strongroom_core::deposit::DepositStatus;
use strongroom_core::ledger::{AccountType, CashFlowCategory, MovementType};
use strongroom_core::reconciliation::{ReconciliationSource, ReconciliationStatus};

use crate::entities::{daily_cash_positions, sea_orm_active_enums as db};

pub(crate) fn account_to_db(account: AccountType) -> db::AccountType {
    match account {
        AccountType::SalesCash => db::AccountType::SalesCash,
        AccountType::PettyCash => db::AccountType::PettyCash,
    }
}

pub(crate) fn account_to_core(account: &db::AccountType) -> AccountType {
    match account {
        db::AccountType::SalesCash => AccountType::SalesCash,
        db::AccountType::PettyCash => AccountType::PettyCash,
    }
}

pub(crate) fn movement_type_to_db(movement_type: MovementType) -> db::MovementType {
    match movement_type {
        MovementType::Posting => db::MovementType::Posting,
        MovementType::Deposit => db::MovementType::Deposit,
        MovementType::TransferOut => db::MovementType::TransferOut,
        MovementType::TransferIn => db::MovementType::TransferIn,
        MovementType::Adjustment => db::MovementType::Adjustment,
    }
}

pub(crate) fn deposit_status_to_core(status: &db::DepositStatus) -> DepositStatus {
    match status {
        db::DepositStatus::Pending => DepositStatus::Pending,
        db::DepositStatus::Deposited => DepositStatus::Deposited,
        db::DepositStatus::Partial => DepositStatus::Partial,
        db::DepositStatus::CarriedForward => DepositStatus::CarriedForward,
    }
}

pub(crate) fn approval_status_to_core(status: &db::ApprovalStatus) -> ApprovalStatus {
    match status {
        db::ApprovalStatus::Pending => ApprovalStatus::Pending,
        db::ApprovalStatus::Approved => ApprovalStatus::Approved,
        db::ApprovalStatus::Rejected => ApprovalStatus::Rejected,
        db::ApprovalStatus::Completed => ApprovalStatus::Completed,
    }
}

pub(crate) fn approval_status_to_db(status: ApprovalStatus) -> db::ApprovalStatus {
    match status {
        ApprovalStatus::Pending => db::ApprovalStatus::Pending,
        ApprovalStatus::Approved => db::ApprovalStatus::Approved,
        ApprovalStatus::Rejected => db::ApprovalStatus::Rejected,
        ApprovalStatus::Completed => db::ApprovalStatus::Completed,
    }
}

pub(crate) fn priority_to_db(priority: Priority) -> db::Priority {
    match priority {
        Priority::Low => db::Priority::Low,
        Priority::Medium => db::Priority::Medium,
        Priority::High => db::Priority::High,
    }
}

pub(crate) fn adjustment_type_to_db(adjustment_type: AdjustmentType) -> db::AdjustmentType {
    match adjustment_type {
        AdjustmentType::InitialSetup => db::AdjustmentType::InitialSetup,
        AdjustmentType::Correction => db::AdjustmentType::Correction,
        AdjustmentType::Injection => db::AdjustmentType::Injection,
        AdjustmentType::Loss => db::AdjustmentType::Loss,
    }
}

pub(crate) fn adjustment_type_to_core(adjustment_type: &db::AdjustmentType) -> AdjustmentType {
    match adjustment_type {
        db::AdjustmentType::InitialSetup => AdjustmentType::InitialSetup,
        db::AdjustmentType::Correction => AdjustmentType::Correction,
        db::AdjustmentType::Injection => AdjustmentType::Injection,
        db::AdjustmentType::Loss => AdjustmentType::Loss,
    }
}

pub(crate) fn source_to_db(source: ReconciliationSource) -> db::ReconciliationSource {
    match source {
        ReconciliationSource::Bank => db::ReconciliationSource::Bank,
        ReconciliationSource::Erp => db::ReconciliationSource::Erp,
        ReconciliationSource::Cash => db::ReconciliationSource::Cash,
        ReconciliationSource::Voucher => db::ReconciliationSource::Voucher,
        ReconciliationSource::Manual => db::ReconciliationSource::Manual,
        ReconciliationSource::Batch => db::ReconciliationSource::Batch,
        ReconciliationSource::None => db::ReconciliationSource::None,
    }
}

pub(crate) fn reconciliation_status_to_db(
    status: ReconciliationStatus,
) -> db::ReconciliationStatus {
    match status {
        ReconciliationStatus::Pending => db::ReconciliationStatus::Pending,
        ReconciliationStatus::Reconciled => db::ReconciliationStatus::Reconciled,
    }
}

/// Column holding a flow category on `daily_cash_positions`.
pub(crate) fn category_column(category: CashFlowCategory) -> daily_cash_positions::Column {
    use daily_cash_positions::Column;
    match category {
        CashFlowCategory::CashSales => Column::CashSales,
        CashFlowCategory::SoAdvances => Column::SoAdvances,
        CashFlowCategory::GiftVoucherSales => Column::GiftVoucherSales,
        CashFlowCategory::HandBillCollections => Column::HandBillCollections,
        CashFlowCategory::PettyTransfersIn => Column::PettyTransfersIn,
        CashFlowCategory::OtherReceipts => Column::OtherReceipts,
        CashFlowCategory::CashAdjustments => Column::CashAdjustments,
        CashFlowCategory::CashReturns => Column::CashReturns,
        CashFlowCategory::CashRefunds => Column::CashRefunds,
        CashFlowCategory::PettyTransfersOut => Column::PettyTransfersOut,
        CashFlowCategory::CashDeposits => Column::CashDeposits,
    }
}
