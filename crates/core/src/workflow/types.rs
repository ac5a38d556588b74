//! Workflow domain types for request lifecycle management.
//!
//! Each action captures the resulting status plus the audit trail
//! (who, when, why) that the store persists alongside it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use fundflow_shared::types::UserId;

use crate::request::types::{AdminApprovalStatus, RejectionReason, TransactionStatus};

/// Deposit workflow action.
///
/// Valid transitions:
/// - Pending → Processing (start processing)
/// - Pending | Processing → Completed (approve, credits the account)
/// - Pending | Processing → Failed (reject)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepositAction {
    /// An admin claims the deposit for review.
    StartProcessing {
        /// The new status (Processing).
        new_status: TransactionStatus,
        /// The admin claiming the deposit.
        started_by: UserId,
        /// When the deposit was claimed.
        started_at: DateTime<Utc>,
    },
    /// Approve and credit.
    Approve {
        /// The new status (Completed).
        new_status: TransactionStatus,
        /// The approving admin.
        approved_by: UserId,
        /// When the deposit was completed.
        processed_at: DateTime<Utc>,
        /// Optional notes from the approver.
        admin_notes: Option<String>,
        /// Amount to add to the account balance.
        credit: Decimal,
    },
    /// Reject without balance effect.
    Reject {
        /// The new status (Failed).
        new_status: TransactionStatus,
        /// The rejecting admin.
        rejected_by: UserId,
        /// When the deposit failed.
        processed_at: DateTime<Utc>,
        /// Reason, surfaced to the user as admin notes.
        reason: String,
    },
}

impl DepositAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub fn new_status(&self) -> TransactionStatus {
        match self {
            Self::StartProcessing { new_status, .. }
            | Self::Approve { new_status, .. }
            | Self::Reject { new_status, .. } => *new_status,
        }
    }

    /// Signed change this action makes to the account balance, if any.
    #[must_use]
    pub fn balance_delta(&self) -> Option<Decimal> {
        match self {
            Self::Approve { credit, .. } => Some(*credit),
            Self::StartProcessing { .. } | Self::Reject { .. } => None,
        }
    }
}

/// Withdrawal workflow action.
///
/// Valid transitions, all from PendingReview and all terminal:
/// - → Approved (approve, debits the account)
/// - → Rejected (reject)
/// - → Cancelled (owner cancel)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WithdrawalAction {
    /// Approve and debit, optionally for a reduced amount.
    Approve {
        /// The new status (Approved).
        new_status: AdminApprovalStatus,
        /// The approving admin.
        reviewed_by: UserId,
        /// Review time.
        reviewed_at: DateTime<Utc>,
        /// Notes from the approver; required when the amount was modified.
        admin_notes: Option<String>,
        /// Reduced amount, if the admin modified it.
        modified_amount: Option<Decimal>,
        /// Amount debited.
        final_amount: Decimal,
    },
    /// Reject without balance effect.
    Reject {
        /// The new status (Rejected).
        new_status: AdminApprovalStatus,
        /// The rejecting admin.
        reviewed_by: UserId,
        /// Review time.
        reviewed_at: DateTime<Utc>,
        /// Categorised reason.
        rejection_reason: RejectionReason,
        /// Explanation surfaced to the user.
        admin_notes: String,
    },
    /// Owner withdrew the request before review.
    Cancel {
        /// The new status (Cancelled).
        new_status: AdminApprovalStatus,
        /// The owning user.
        cancelled_by: UserId,
        /// Cancellation time.
        cancelled_at: DateTime<Utc>,
    },
}

impl WithdrawalAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub fn new_status(&self) -> AdminApprovalStatus {
        match self {
            Self::Approve { new_status, .. }
            | Self::Reject { new_status, .. }
            | Self::Cancel { new_status, .. } => *new_status,
        }
    }

    /// Signed change this action makes to the account balance, if any.
    #[must_use]
    pub fn balance_delta(&self) -> Option<Decimal> {
        match self {
            Self::Approve { final_amount, .. } => Some(-*final_amount),
            Self::Reject { .. } | Self::Cancel { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_deposit_balance_delta() {
        let now = Utc::now();
        let approve = DepositAction::Approve {
            new_status: TransactionStatus::Completed,
            approved_by: UserId::new(),
            processed_at: now,
            admin_notes: None,
            credit: dec!(500.00),
        };
        assert_eq!(approve.balance_delta(), Some(dec!(500.00)));

        let reject = DepositAction::Reject {
            new_status: TransactionStatus::Failed,
            rejected_by: UserId::new(),
            processed_at: now,
            reason: "No funds received".to_string(),
        };
        assert_eq!(reject.balance_delta(), None);
    }

    #[test]
    fn test_withdrawal_approval_debits() {
        let approve = WithdrawalAction::Approve {
            new_status: AdminApprovalStatus::Approved,
            reviewed_by: UserId::new(),
            reviewed_at: Utc::now(),
            admin_notes: None,
            modified_amount: None,
            final_amount: dec!(1000.00),
        };
        assert_eq!(approve.balance_delta(), Some(dec!(-1000.00)));
        assert_eq!(approve.new_status(), AdminApprovalStatus::Approved);
    }

    #[test]
    fn test_withdrawal_cancel_has_no_balance_effect() {
        let cancel = WithdrawalAction::Cancel {
            new_status: AdminApprovalStatus::Cancelled,
            cancelled_by: UserId::new(),
            cancelled_at: Utc::now(),
        };
        assert_eq!(cancel.balance_delta(), None);
    }
}
