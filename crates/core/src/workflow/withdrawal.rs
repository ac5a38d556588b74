//! Withdrawal approval state machine.
//!
//! `pending_review` is the only non-terminal state. Approval, rejection and
//! owner cancellation each move the withdrawal to a terminal state; nothing
//! reopens it.

use chrono::Utc;
use rust_decimal::Decimal;

use fundflow_shared::types::UserId;

use crate::request::types::{AdminApprovalStatus, RejectionReason};
use crate::request::withdrawal::Withdrawal;
use crate::workflow::error::WorkflowError;
use crate::workflow::types::WithdrawalAction;

/// Stateless service validating withdrawal transitions.
///
/// Every method returns the `WithdrawalAction` to persist; none of them
/// touch storage or balances.
pub struct WithdrawalWorkflow;

impl WithdrawalWorkflow {
    /// Approve a withdrawal, optionally for a reduced amount.
    ///
    /// # Returns
    /// * `Ok(WithdrawalAction::Approve)` carrying the amount to debit
    /// * `Err(WorkflowError::InvalidTransition)` if not in PendingReview
    /// * `Err(WorkflowError::NonPositiveModifiedAmount)` if the modified amount is `<= 0`
    /// * `Err(WorkflowError::ModifiedAmountExceedsOriginal)` if it is above the original
    pub fn approve(
        withdrawal: &Withdrawal,
        reviewed_by: UserId,
        admin_notes: Option<String>,
        modified_amount: Option<Decimal>,
    ) -> Result<WithdrawalAction, WorkflowError> {
        Self::ensure_pending(withdrawal.status, AdminApprovalStatus::Approved)?;

        let original = withdrawal.original_amount;
        let modified_amount = match modified_amount {
            Some(amount) if amount <= Decimal::ZERO => {
                return Err(WorkflowError::NonPositiveModifiedAmount);
            }
            Some(amount) if amount > original => {
                return Err(WorkflowError::ModifiedAmountExceedsOriginal {
                    modified: amount,
                    original,
                });
            }
            // Same as requested: not a modification.
            Some(amount) if amount == original => None,
            other => other,
        };

        Ok(WithdrawalAction::Approve {
            new_status: AdminApprovalStatus::Approved,
            reviewed_by,
            reviewed_at: Utc::now(),
            admin_notes: normalize_notes(admin_notes),
            modified_amount,
            final_amount: modified_amount.unwrap_or(original),
        })
    }

    /// Checks that an amount modification comes with an explanation.
    ///
    /// Kept separate from [`Self::approve`] so callers enforce it at their
    /// own boundary.
    pub fn check_modification_notes(
        withdrawal: &Withdrawal,
        modified_amount: Option<Decimal>,
        admin_notes: Option<&str>,
    ) -> Result<(), WorkflowError> {
        let modifies = modified_amount.is_some_and(|amount| amount != withdrawal.original_amount);
        let has_notes = admin_notes.is_some_and(|notes| !notes.trim().is_empty());
        if modifies && !has_notes {
            return Err(WorkflowError::ModificationNotesRequired);
        }
        Ok(())
    }

    /// Reject a withdrawal.
    ///
    /// # Returns
    /// * `Ok(WithdrawalAction::Reject)` if the transition is valid
    /// * `Err(WorkflowError::RejectionNotesRequired)` if notes are blank
    /// * `Err(WorkflowError::InvalidTransition)` if not in PendingReview
    pub fn reject(
        current_status: AdminApprovalStatus,
        reviewed_by: UserId,
        rejection_reason: RejectionReason,
        admin_notes: String,
    ) -> Result<WithdrawalAction, WorkflowError> {
        let admin_notes = admin_notes.trim().to_string();
        if admin_notes.is_empty() {
            return Err(WorkflowError::RejectionNotesRequired);
        }

        Self::ensure_pending(current_status, AdminApprovalStatus::Rejected)?;

        Ok(WithdrawalAction::Reject {
            new_status: AdminApprovalStatus::Rejected,
            reviewed_by,
            reviewed_at: Utc::now(),
            rejection_reason,
            admin_notes,
        })
    }

    /// Cancel a withdrawal on behalf of its owner.
    ///
    /// # Returns
    /// * `Ok(WithdrawalAction::Cancel)` if the transition is valid
    /// * `Err(WorkflowError::NotOwner)` if `cancelled_by` is not the owner
    /// * `Err(WorkflowError::InvalidTransition)` if not in PendingReview
    pub fn cancel(
        withdrawal: &Withdrawal,
        cancelled_by: UserId,
    ) -> Result<WithdrawalAction, WorkflowError> {
        if withdrawal.user_id != cancelled_by {
            return Err(WorkflowError::NotOwner);
        }

        Self::ensure_pending(withdrawal.status, AdminApprovalStatus::Cancelled)?;

        Ok(WithdrawalAction::Cancel {
            new_status: AdminApprovalStatus::Cancelled,
            cancelled_by,
            cancelled_at: Utc::now(),
        })
    }

    /// Check if a status transition is valid.
    #[must_use]
    pub fn is_valid_transition(from: AdminApprovalStatus, to: AdminApprovalStatus) -> bool {
        from == AdminApprovalStatus::PendingReview && to != AdminApprovalStatus::PendingReview
    }

    fn ensure_pending(
        current: AdminApprovalStatus,
        target: AdminApprovalStatus,
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

/// Trims notes and drops them when blank.
pub(crate) fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::types::WithdrawalMethod;
    use crate::request::withdrawal::{NewWithdrawal, PayoutDetails};
    use fundflow_shared::types::AccountId;
    use rust_decimal_macros::dec;

    fn pending_withdrawal(amount: Decimal) -> Withdrawal {
        let submission = NewWithdrawal {
            user_id: UserId::new(),
            account_id: AccountId::new(),
            amount,
            method: WithdrawalMethod::Ach,
            details: PayoutDetails {
                bank_name: Some("Chase".to_string()),
                account_number_last4: Some("4321".to_string()),
                ..PayoutDetails::default()
            },
            notes: None,
            idempotency_key: None,
        };
        Withdrawal::from_submission(submission, "WTH-TEST".to_string(), Utc::now())
    }

    #[test]
    fn test_approve_full_amount() {
        let withdrawal = pending_withdrawal(dec!(1000.00));
        let admin = UserId::new();
        let action = WithdrawalWorkflow::approve(&withdrawal, admin, None, None).unwrap();
        match action {
            WithdrawalAction::Approve {
                final_amount,
                modified_amount,
                reviewed_by,
                ..
            } => {
                assert_eq!(final_amount, dec!(1000.00));
                assert_eq!(modified_amount, None);
                assert_eq!(reviewed_by, admin);
            }
            other => panic!("Expected Approve action, got {other:?}"),
        }
    }

    #[test]
    fn test_approve_with_reduced_amount() {
        let withdrawal = pending_withdrawal(dec!(1000.00));
        let action = WithdrawalWorkflow::approve(
            &withdrawal,
            UserId::new(),
            Some("  Limit for unverified accounts ".to_string()),
            Some(dec!(750.00)),
        )
        .unwrap();
        assert_eq!(action.balance_delta(), Some(dec!(-750.00)));
        if let WithdrawalAction::Approve { admin_notes, .. } = action {
            assert_eq!(admin_notes.as_deref(), Some("Limit for unverified accounts"));
        }
    }

    #[test]
    fn test_approve_modified_above_original_fails() {
        let withdrawal = pending_withdrawal(dec!(1000.00));
        let result = WithdrawalWorkflow::approve(
            &withdrawal,
            UserId::new(),
            Some("typo".to_string()),
            Some(dec!(1000.01)),
        );
        assert!(matches!(
            result,
            Err(WorkflowError::ModifiedAmountExceedsOriginal { .. })
        ));
    }

    #[test]
    fn test_approve_non_positive_modified_fails() {
        let withdrawal = pending_withdrawal(dec!(1000.00));
        let result =
            WithdrawalWorkflow::approve(&withdrawal, UserId::new(), None, Some(Decimal::ZERO));
        assert_eq!(result, Err(WorkflowError::NonPositiveModifiedAmount));
    }

    #[test]
    fn test_approve_twice_fails() {
        let mut withdrawal = pending_withdrawal(dec!(1000.00));
        let action = WithdrawalWorkflow::approve(&withdrawal, UserId::new(), None, None).unwrap();
        crate::request::TransactionRequest::apply(&mut withdrawal, &action);

        let result = WithdrawalWorkflow::approve(&withdrawal, UserId::new(), None, None);
        assert!(matches!(
            result,
            Err(WorkflowError::InvalidTransition { ref from, .. }) if from == "approved"
        ));
    }

    #[test]
    fn test_modification_requires_notes() {
        let withdrawal = pending_withdrawal(dec!(1000.00));
        assert_eq!(
            WithdrawalWorkflow::check_modification_notes(&withdrawal, Some(dec!(500)), None),
            Err(WorkflowError::ModificationNotesRequired)
        );
        assert_eq!(
            WithdrawalWorkflow::check_modification_notes(&withdrawal, Some(dec!(500)), Some(" ")),
            Err(WorkflowError::ModificationNotesRequired)
        );
        assert!(
            WithdrawalWorkflow::check_modification_notes(&withdrawal, Some(dec!(500)), Some("ok"))
                .is_ok()
        );
        assert!(WithdrawalWorkflow::check_modification_notes(&withdrawal, None, None).is_ok());
        assert!(
            WithdrawalWorkflow::check_modification_notes(&withdrawal, Some(dec!(1000)), None)
                .is_ok()
        );
    }

    #[test]
    fn test_reject_requires_notes() {
        let result = WithdrawalWorkflow::reject(
            AdminApprovalStatus::PendingReview,
            UserId::new(),
            RejectionReason::SuspiciousActivity,
            "   ".to_string(),
        );
        assert_eq!(result, Err(WorkflowError::RejectionNotesRequired));
    }

    #[test]
    fn test_reject_from_pending_review() {
        let action = WithdrawalWorkflow::reject(
            AdminApprovalStatus::PendingReview,
            UserId::new(),
            RejectionReason::IncorrectDetails,
            "Routing number does not match bank".to_string(),
        )
        .unwrap();
        assert_eq!(action.new_status(), AdminApprovalStatus::Rejected);
        assert_eq!(action.balance_delta(), None);
    }

    #[test]
    fn test_reject_after_cancel_fails() {
        let result = WithdrawalWorkflow::reject(
            AdminApprovalStatus::Cancelled,
            UserId::new(),
            RejectionReason::Other,
            "late".to_string(),
        );
        assert!(matches!(
            result,
            Err(WorkflowError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_cancel_by_owner() {
        let withdrawal = pending_withdrawal(dec!(50.00));
        let action = WithdrawalWorkflow::cancel(&withdrawal, withdrawal.user_id).unwrap();
        assert_eq!(action.new_status(), AdminApprovalStatus::Cancelled);
    }

    #[test]
    fn test_cancel_by_other_user_fails() {
        let withdrawal = pending_withdrawal(dec!(50.00));
        let result = WithdrawalWorkflow::cancel(&withdrawal, UserId::new());
        assert_eq!(result, Err(WorkflowError::NotOwner));
    }

    #[test]
    fn test_cancel_after_approval_fails() {
        let mut withdrawal = pending_withdrawal(dec!(50.00));
        withdrawal.status = AdminApprovalStatus::Approved;
        let result = WithdrawalWorkflow::cancel(&withdrawal, withdrawal.user_id);
        assert!(matches!(
            result,
            Err(WorkflowError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_is_valid_transition() {
        use AdminApprovalStatus::{Approved, Cancelled, PendingReview, Rejected};
        assert!(WithdrawalWorkflow::is_valid_transition(PendingReview, Approved));
        assert!(WithdrawalWorkflow::is_valid_transition(PendingReview, Rejected));
        assert!(WithdrawalWorkflow::is_valid_transition(PendingReview, Cancelled));
        assert!(!WithdrawalWorkflow::is_valid_transition(PendingReview, PendingReview));
        assert!(!WithdrawalWorkflow::is_valid_transition(Approved, Rejected));
        assert!(!WithdrawalWorkflow::is_valid_transition(Rejected, PendingReview));
        assert!(!WithdrawalWorkflow::is_valid_transition(Cancelled, Approved));
    }
}
