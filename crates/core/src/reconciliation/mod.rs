//! Reconciliation of heterogeneous transactions against external records.
//!
//! Six unrelated transaction tables share the same reconciliation columns.
//! This module holds the kind-agnostic vocabulary; storage routes each kind
//! to its table.

pub mod error;
pub mod service;
pub mod types;

pub use error::ReconciliationError;
pub use service::ReconciliationService;
pub use types::{
    BatchItem, BatchItemResult, BatchOutcome, KindCounts, PendingTransaction, ReconcileData,
    ReconcileOutcome, ReconciliationSource, ReconciliationStatus, ReconciliationSummary,
    ResolvedReconcile, TransactionKind,
};
