//! Reconciliation vocabulary shared by every transaction kind.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The six transaction tables that carry reconciliation columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Till sales.
    Sale,
    /// Store expenses.
    Expense,
    /// Customer returns.
    Return,
    /// Hand-bill collections.
    HandBill,
    /// Gift voucher sales.
    GiftVoucher,
    /// Sales orders and their advances.
    SalesOrder,
}

impl TransactionKind {
    /// Every kind, in reporting order.
    pub const ALL: [Self; 6] = [
        Self::Sale,
        Self::Expense,
        Self::Return,
        Self::HandBill,
        Self::GiftVoucher,
        Self::SalesOrder,
    ];

    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Expense => "expense",
            Self::Return => "return",
            Self::HandBill => "hand_bill",
            Self::GiftVoucher => "gift_voucher",
            Self::SalesOrder => "sales_order",
        }
    }

    /// Parses a kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sale" => Some(Self::Sale),
            "expense" => Some(Self::Expense),
            "return" => Some(Self::Return),
            "hand_bill" => Some(Self::HandBill),
            "gift_voucher" => Some(Self::GiftVoucher),
            "sales_order" => Some(Self::SalesOrder),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// External record a transaction was matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconciliationSource {
    /// Bank statement.
    Bank,
    /// ERP export.
    Erp,
    /// Physical cash count.
    Cash,
    /// Paper voucher.
    Voucher,
    /// Matched by hand.
    Manual,
    /// Matched as part of a batch.
    Batch,
    /// Not matched yet.
    None,
}

impl ReconciliationSource {
    /// Returns the string representation of the source.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bank => "bank",
            Self::Erp => "erp",
            Self::Cash => "cash",
            Self::Voucher => "voucher",
            Self::Manual => "manual",
            Self::Batch => "batch",
            Self::None => "none",
        }
    }

    /// Parses a source from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bank" => Some(Self::Bank),
            "erp" => Some(Self::Erp),
            "cash" => Some(Self::Cash),
            "voucher" => Some(Self::Voucher),
            "manual" => Some(Self::Manual),
            "batch" => Some(Self::Batch),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

impl fmt::Display for ReconciliationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a transaction has been matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconciliationStatus {
    /// Not matched yet.
    Pending,
    /// Matched; never overwritten.
    Reconciled,
}

impl ReconciliationStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reconciled => "reconciled",
        }
    }
}

impl fmt::Display for ReconciliationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Caller-supplied audit data for a reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileData {
    /// Who matched the transaction.
    pub reconciled_by: String,
    /// What it was matched against; defaults depend on the entry point.
    #[serde(default)]
    pub source: Option<ReconciliationSource>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Reference in the external system.
    #[serde(default)]
    pub external_reference: Option<String>,
}

/// Reconciliation data after defaults are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedReconcile {
    /// Who matched the transaction.
    pub reconciled_by: String,
    /// What it was matched against.
    pub source: ReconciliationSource,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Reference in the external system.
    pub external_reference: Option<String>,
}

/// An unreconciled transaction of any kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransaction {
    /// Row identifier.
    pub id: Uuid,
    /// Which table the row lives in.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Owning store.
    pub store_id: Uuid,
    /// Business date of the transaction.
    pub business_date: NaiveDate,
    /// Transaction amount.
    pub amount: Decimal,
    /// Human-facing reference number.
    pub reference_number: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
}

/// Outcome of one conditional reconciliation update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The row flipped from pending to reconciled.
    Reconciled,
    /// No row with that id exists.
    NotFound,
    /// The row was already reconciled and was left untouched.
    AlreadyReconciled,
}

/// Row counts for one transaction kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCounts {
    /// Transaction kind.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// All rows in range.
    pub total: u64,
    /// Rows still pending.
    pub pending: u64,
    /// Rows reconciled.
    pub reconciled: u64,
}

/// Reconciliation progress across every kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    /// All rows in range.
    pub total_transactions: u64,
    /// Rows still pending.
    pub pending_transactions: u64,
    /// Rows reconciled.
    pub reconciled_transactions: u64,
    /// Per-kind breakdown.
    pub by_type: Vec<KindCounts>,
}

impl ReconciliationSummary {
    /// Totals a per-kind breakdown.
    #[must_use]
    pub fn from_counts(mut by_type: Vec<KindCounts>) -> Self {
        by_type.sort_by_key(|c| c.kind);
        Self {
            total_transactions: by_type.iter().map(|c| c.total).sum(),
            pending_transactions: by_type.iter().map(|c| c.pending).sum(),
            reconciled_transactions: by_type.iter().map(|c| c.reconciled).sum(),
            by_type,
        }
    }
}

/// One item of a batch reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItem {
    /// Row identifier.
    pub id: Uuid,
    /// Which table the row lives in.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Audit data for this item.
    #[serde(flatten)]
    pub data: ReconcileData,
}

/// Result of one batch item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItemResult {
    /// Row identifier.
    pub id: Uuid,
    /// Which table the row lives in.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Whether the item was reconciled.
    pub success: bool,
    /// Error code if it failed.
    pub error_code: Option<String>,
    /// Error message if it failed.
    pub error: Option<String>,
}

/// Results of a batch, in request order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Per-item results.
    pub results: Vec<BatchItemResult>,
    /// Number reconciled.
    pub succeeded: usize,
    /// Number that failed.
    pub failed: usize,
}

impl BatchOutcome {
    /// Counts successes and failures.
    #[must_use]
    pub fn from_results(results: Vec<BatchItemResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        let failed = results.len() - succeeded;
        Self {
            results,
            succeeded,
            failed,
        }
    }
}
