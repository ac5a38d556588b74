//! Request lifecycle state machines.
//!
//! # Modules
//!
//! - `types` - Workflow actions with audit data (DepositAction, WithdrawalAction)
//! - `error` - Workflow-specific error types
//! - `deposit` - Deposit transitions (pending/processing → completed/failed)
//! - `withdrawal` - Withdrawal transitions (pending_review → approved/rejected/cancelled)

pub mod deposit;
pub mod error;
pub mod types;
pub mod withdrawal;

#[cfg(test)]
mod workflow_props;

pub use deposit::DepositWorkflow;
pub use error::WorkflowError;
pub use types::{DepositAction, WithdrawalAction};
pub use withdrawal::WithdrawalWorkflow;
