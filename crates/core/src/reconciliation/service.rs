//! Reconciliation rules independent of storage.

use uuid::Uuid;

use super::error::ReconciliationError;
use super::types::{
    BatchItemResult, ReconcileData, ReconcileOutcome, ReconciliationSource, ResolvedReconcile,
    TransactionKind,
};

/// Stateless service for reconciliation validation and outcome mapping.
pub struct ReconciliationService;

impl ReconciliationService {
    /// Validates caller data and applies the entry point's default source.
    ///
    /// Single reconciliations default to `manual`, batches to `batch`.
    pub fn resolve(
        data: ReconcileData,
        default_source: ReconciliationSource,
    ) -> Result<ResolvedReconcile, ReconciliationError> {
        let reconciled_by = data.reconciled_by.trim();
        if reconciled_by.is_empty() {
            return Err(ReconciliationError::Validation(
                "reconciled_by is required".to_string(),
            ));
        }

        let source = match data.source {
            None | Some(ReconciliationSource::None) => default_source,
            Some(source) => source,
        };

        Ok(ResolvedReconcile {
            reconciled_by: reconciled_by.to_string(),
            source,
            notes: data.notes.filter(|n| !n.trim().is_empty()),
            external_reference: data.external_reference.filter(|r| !r.trim().is_empty()),
        })
    }

    /// Parses a transaction kind from a path or payload value.
    pub fn parse_kind(raw: &str) -> Result<TransactionKind, ReconciliationError> {
        TransactionKind::parse(raw).ok_or_else(|| ReconciliationError::UnknownKind(raw.to_string()))
    }

    /// Maps the outcome of a conditional update to a result.
    pub fn check_outcome(
        outcome: ReconcileOutcome,
        kind: TransactionKind,
        id: Uuid,
    ) -> Result<(), ReconciliationError> {
        match outcome {
            ReconcileOutcome::Reconciled => Ok(()),
            ReconcileOutcome::NotFound => Err(ReconciliationError::NotFound { kind, id }),
            ReconcileOutcome::AlreadyReconciled => {
                Err(ReconciliationError::AlreadyReconciled { kind, id })
            }
        }
    }

    /// Builds a batch item result.
    #[must_use]
    pub fn item_result(
        kind: TransactionKind,
        id: Uuid,
        result: &Result<(), ReconciliationError>,
    ) -> BatchItemResult {
        match result {
            Ok(()) => BatchItemResult {
                id,
                kind,
                success: true,
                error_code: None,
                error: None,
            },
            Err(e) => BatchItemResult {
                id,
                kind,
                success: false,
                error_code: Some(e.error_code().to_string()),
                error: Some(e.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(by: &str, source: Option<ReconciliationSource>) -> ReconcileData {
        ReconcileData {
            reconciled_by: by.to_string(),
            source,
            notes: Some("  ".into()),
            external_reference: Some("BANK-0042".into()),
        }
    }

    #[test]
    fn test_resolve_defaults_source() {
        let resolved =
            ReconciliationService::resolve(data("auditor", None), ReconciliationSource::Manual)
                .unwrap();
        assert_eq!(resolved.source, ReconciliationSource::Manual);
        assert_eq!(resolved.notes, None);
        assert_eq!(resolved.external_reference.as_deref(), Some("BANK-0042"));

        let batch =
            ReconciliationService::resolve(data("auditor", None), ReconciliationSource::Batch)
                .unwrap();
        assert_eq!(batch.source, ReconciliationSource::Batch);
    }

    #[test]
    fn test_resolve_keeps_explicit_source() {
        let resolved = ReconciliationService::resolve(
            data("auditor", Some(ReconciliationSource::Bank)),
            ReconciliationSource::Batch,
        )
        .unwrap();
        assert_eq!(resolved.source, ReconciliationSource::Bank);
    }

    #[test]
    fn test_resolve_requires_reconciler() {
        assert!(matches!(
            ReconciliationService::resolve(data("   ", None), ReconciliationSource::Manual),
            Err(ReconciliationError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(
            ReconciliationService::parse_kind("expense").unwrap(),
            TransactionKind::Expense
        );
        assert!(matches!(
            ReconciliationService::parse_kind("invoice"),
            Err(ReconciliationError::UnknownKind(_))
        ));
    }

    #[test]
    fn test_check_outcome() {
        let id = Uuid::new_v4();
        assert!(
            ReconciliationService::check_outcome(
                ReconcileOutcome::Reconciled,
                TransactionKind::Sale,
                id
            )
            .is_ok()
        );
        assert!(matches!(
            ReconciliationService::check_outcome(
                ReconcileOutcome::AlreadyReconciled,
                TransactionKind::Sale,
                id
            ),
            Err(ReconciliationError::AlreadyReconciled { .. })
        ));
        assert!(matches!(
            ReconciliationService::check_outcome(
                ReconcileOutcome::NotFound,
                TransactionKind::Return,
                id
            ),
            Err(ReconciliationError::NotFound { kind: TransactionKind::Return, .. })
        ));
    }

    #[test]
    fn test_item_result_carries_error_code() {
        let id = Uuid::new_v4();
        let result = Err(ReconciliationError::AlreadyReconciled {
            kind: TransactionKind::HandBill,
            id,
        });
        let item = ReconciliationService::item_result(TransactionKind::HandBill, id, &result);
        assert!(!item.success);
        assert_eq!(item.error_code.as_deref(), Some("ALREADY_RECONCILED"));
    }
}
