//! Deposit approval state machine.

use chrono::Utc;

use fundflow_shared::types::UserId;

use crate::request::deposit::Deposit;
use crate::request::types::TransactionStatus;
use crate::workflow::error::WorkflowError;
use crate::workflow::types::DepositAction;
use crate::workflow::withdrawal::normalize_notes;

/// Stateless service validating deposit transitions.
pub struct DepositWorkflow;

impl DepositWorkflow {
    /// Claim a pending deposit for review.
    ///
    /// # Returns
    /// * `Ok(DepositAction::StartProcessing)` if the deposit is Pending
    /// * `Err(WorkflowError::InvalidTransition)` otherwise
    pub fn start_processing(
        current_status: TransactionStatus,
        started_by: UserId,
    ) -> Result<DepositAction, WorkflowError> {
        Self::ensure_transition(current_status, TransactionStatus::Processing)?;

        Ok(DepositAction::StartProcessing {
            new_status: TransactionStatus::Processing,
            started_by,
            started_at: Utc::now(),
        })
    }

    /// Approve a deposit; the action carries the credit to apply.
    ///
    /// # Returns
    /// * `Ok(DepositAction::Approve)` if the deposit is Pending or Processing
    /// * `Err(WorkflowError::InvalidTransition)` otherwise
    pub fn approve(
        deposit: &Deposit,
        approved_by: UserId,
        admin_notes: Option<String>,
    ) -> Result<DepositAction, WorkflowError> {
        Self::ensure_transition(deposit.status, TransactionStatus::Completed)?;

        Ok(DepositAction::Approve {
            new_status: TransactionStatus::Completed,
            approved_by,
            processed_at: Utc::now(),
            admin_notes: normalize_notes(admin_notes),
            credit: deposit.amount,
        })
    }

    /// Reject a deposit.
    ///
    /// # Returns
    /// * `Ok(DepositAction::Reject)` if the transition is valid
    /// * `Err(WorkflowError::RejectionNotesRequired)` if the reason is blank
    /// * `Err(WorkflowError::InvalidTransition)` if not Pending or Processing
    pub fn reject(
        current_status: TransactionStatus,
        rejected_by: UserId,
        reason: String,
    ) -> Result<DepositAction, WorkflowError> {
        let reason = reason.trim().to_string();
        if reason.is_empty() {
            return Err(WorkflowError::RejectionNotesRequired);
        }

        Self::ensure_transition(current_status, TransactionStatus::Failed)?;

        Ok(DepositAction::Reject {
            new_status: TransactionStatus::Failed,
            rejected_by,
            processed_at: Utc::now(),
            reason,
        })
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Pending → Processing
    /// - Pending | Processing → Completed
    /// - Pending | Processing → Failed
    #[must_use]
    pub fn is_valid_transition(from: TransactionStatus, to: TransactionStatus) -> bool {
        matches!(
            (from, to),
            (TransactionStatus::Pending, TransactionStatus::Processing)
                | (
                    TransactionStatus::Pending | TransactionStatus::Processing,
                    TransactionStatus::Completed | TransactionStatus::Failed
                )
        )
    }

    fn ensure_transition(
        current: TransactionStatus,
        target: TransactionStatus,
    ) -> Result<(), WorkflowError> {
        if Self::is_valid_transition(current, target) {
            Ok(())
        } else {
            Err(WorkflowError::InvalidTransition {
                from: current.to_string(),
                to: target.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::deposit::NewDeposit;
    use crate::request::types::DepositMethod;
    use fundflow_shared::types::AccountId;
    use rust_decimal_macros::dec;

    fn deposit_in(status: TransactionStatus) -> Deposit {
        let submission = NewDeposit {
            user_id: UserId::new(),
            account_id: AccountId::new(),
            amount: dec!(500.00),
            method: DepositMethod::BankTransfer,
            bank_name: None,
            account_number_last4: None,
            notes: None,
            idempotency_key: None,
        };
        let mut deposit = Deposit::from_submission(submission, "DEP-TEST".to_string(), Utc::now());
        deposit.status = status;
        deposit
    }

    #[test]
    fn test_approve_from_pending_credits_amount() {
        let deposit = deposit_in(TransactionStatus::Pending);
        let action = DepositWorkflow::approve(&deposit, UserId::new(), None).unwrap();
        assert_eq!(action.new_status(), TransactionStatus::Completed);
        assert_eq!(action.balance_delta(), Some(dec!(500.00)));
    }

    #[test]
    fn test_approve_from_processing() {
        let deposit = deposit_in(TransactionStatus::Processing);
        assert!(DepositWorkflow::approve(&deposit, UserId::new(), Some("ok".into())).is_ok());
    }

    #[test]
    fn test_approve_terminal_fails() {
        for status in [
            TransactionStatus::Completed,
            TransactionStatus::Failed,
            TransactionStatus::Cancelled,
        ] {
            let deposit = deposit_in(status);
            assert!(matches!(
                DepositWorkflow::approve(&deposit, UserId::new(), None),
                Err(WorkflowError::InvalidTransition { .. })
            ));
        }
    }

    #[test]
    fn test_start_processing_only_from_pending() {
        assert!(DepositWorkflow::start_processing(TransactionStatus::Pending, UserId::new()).is_ok());
        assert!(
            DepositWorkflow::start_processing(TransactionStatus::Processing, UserId::new())
                .is_err()
        );
    }

    #[test]
    fn test_reject_requires_reason() {
        let result = DepositWorkflow::reject(TransactionStatus::Pending, UserId::new(), " ".into());
        assert_eq!(result, Err(WorkflowError::RejectionNotesRequired));
    }

    #[test]
    fn test_reject_from_processing() {
        let action = DepositWorkflow::reject(
            TransactionStatus::Processing,
            UserId::new(),
            "Wire recalled by sender".into(),
        )
        .unwrap();
        assert_eq!(action.new_status(), TransactionStatus::Failed);
        assert_eq!(action.balance_delta(), None);
    }

    #[test]
    fn test_is_valid_transition() {
        use TransactionStatus::{Cancelled, Completed, Failed, Pending, Processing};
        assert!(DepositWorkflow::is_valid_transition(Pending, Processing));
        assert!(DepositWorkflow::is_valid_transition(Pending, Completed));
        assert!(DepositWorkflow::is_valid_transition(Processing, Failed));
        assert!(!DepositWorkflow::is_valid_transition(Processing, Pending));
        assert!(!DepositWorkflow::is_valid_transition(Completed, Failed));
        assert!(!DepositWorkflow::is_valid_transition(Failed, Completed));
        assert!(!DepositWorkflow::is_valid_transition(Cancelled, Processing));
    }
}
