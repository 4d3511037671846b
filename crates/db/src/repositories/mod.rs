//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

mod convert;

pub mod approval;
pub mod deposit;
pub mod ledger;
pub mod movement;
pub mod reconciliation;

pub use approval::{ApprovalRepository, ApproveInput, SubmitAdjustmentInput, SubmitTransferInput};
pub use deposit::{CreateDepositInput, DepositRepository, DepositWithMappings, PendingDeposits};
pub use ledger::{LedgerRepository, closing_delta, position_flows};
pub use movement::{MovementFilter, MovementRepository, NewMovement};
pub use reconciliation::{
    EntityHandler, ReconcilableEntity, ReconcileField, ReconciliationHandler,
    ReconciliationRepository,
};
