//! Property-based tests for the deposit and withdrawal workflows.

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use fundflow_shared::types::{AccountId, UserId};

use crate::request::TransactionRequest;
use crate::request::types::{AdminApprovalStatus, RejectionReason, TransactionStatus, WithdrawalMethod};
use crate::request::withdrawal::{NewWithdrawal, PayoutDetails, Withdrawal};
use crate::workflow::deposit::DepositWorkflow;
use crate::workflow::error::WorkflowError;
use crate::workflow::withdrawal::WithdrawalWorkflow;

/// Strategy for generating random deposit statuses.
fn arb_deposit_status() -> impl Strategy<Value = TransactionStatus> {
    proptest::sample::select(TransactionStatus::ALL.to_vec())
}

/// Strategy for generating random withdrawal statuses.
fn arb_withdrawal_status() -> impl Strategy<Value = AdminApprovalStatus> {
    proptest::sample::select(AdminApprovalStatus::ALL.to_vec())
}

/// Strategy for generating random user ids.
fn arb_user() -> impl Strategy<Value = UserId> {
    any::<u128>().prop_map(|n| UserId::from_uuid(Uuid::from_u128(n)))
}

/// Strategy for positive two-decimal amounts up to 1,000,000.00.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1_i64..=100_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn withdrawal(amount: Decimal, status: AdminApprovalStatus) -> Withdrawal {
    let submission = NewWithdrawal {
        user_id: UserId::new(),
        account_id: AccountId::new(),
        amount,
        method: WithdrawalMethod::Paypal,
        details: PayoutDetails {
            email: Some("payee@example.com".to_string()),
            ..PayoutDetails::default()
        },
        notes: None,
        idempotency_key: None,
    };
    let mut withdrawal = Withdrawal::from_submission(submission, "WTH-PROP".to_string(), Utc::now());
    withdrawal.status = status;
    withdrawal
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Approval succeeds only from PendingReview.
    #[test]
    fn prop_withdrawal_approve_only_from_pending_review(
        status in arb_withdrawal_status(),
        amount in arb_amount(),
        admin in arb_user(),
    ) {
        let w = withdrawal(amount, status);
        let result = WithdrawalWorkflow::approve(&w, admin, None, None);
        if status == AdminApprovalStatus::PendingReview {
            prop_assert!(result.is_ok());
        } else {
            let is_conflict = matches!(result, Err(WorkflowError::InvalidTransition { .. }));
            prop_assert!(is_conflict);
        }
    }

    /// The debited amount never exceeds the original and is always positive.
    #[test]
    fn prop_final_amount_bounded_by_original(
        amount in arb_amount(),
        modified_cents in -1_000_i64..=200_000_000,
    ) {
        let w = withdrawal(amount, AdminApprovalStatus::PendingReview);
        let modified = Decimal::new(modified_cents, 2);
        match WithdrawalWorkflow::approve(&w, UserId::new(), Some("adjusted".into()), Some(modified)) {
            Ok(action) => {
                let debit = -action.balance_delta().unwrap_or_default();
                prop_assert!(debit > Decimal::ZERO);
                prop_assert!(debit <= amount);
                prop_assert_eq!(debit, modified);
            }
            Err(WorkflowError::ModifiedAmountExceedsOriginal { .. }) => prop_assert!(modified > amount),
            Err(WorkflowError::NonPositiveModifiedAmount) => prop_assert!(modified <= Decimal::ZERO),
            Err(other) => prop_assert!(false, "unexpected error {other:?}"),
        }
    }

    /// Once a withdrawal reaches a terminal state no action applies.
    #[test]
    fn prop_terminal_withdrawals_stay_terminal(
        status in arb_withdrawal_status(),
        admin in arb_user(),
    ) {
        prop_assume!(status.is_terminal());
        let w = withdrawal(Decimal::ONE_HUNDRED, status);
        prop_assert!(WithdrawalWorkflow::approve(&w, admin, None, None).is_err());
        prop_assert!(WithdrawalWorkflow::reject(status, admin, RejectionReason::Other, "x".into()).is_err());
        prop_assert!(WithdrawalWorkflow::cancel(&w, w.user_id).is_err());
    }

    /// Applying an action moves the record to the action's status and
    /// stamps the processing time.
    #[test]
    fn prop_apply_reaches_terminal_state(admin in arb_user(), amount in arb_amount()) {
        let mut w = withdrawal(amount, AdminApprovalStatus::PendingReview);
        let action = WithdrawalWorkflow::reject(
            w.status,
            admin,
            RejectionReason::InsufficientVerification,
            "Upload a government ID".into(),
        ).unwrap();
        w.apply(&action);
        prop_assert_eq!(w.status, AdminApprovalStatus::Rejected);
        prop_assert!(w.processed_at.is_some());
        prop_assert_eq!(w.reviewed_by, Some(admin));
    }

    /// Deposit approval and rejection succeed exactly from Pending or Processing.
    #[test]
    fn prop_deposit_review_requires_reviewable_status(
        status in arb_deposit_status(),
        admin in arb_user(),
    ) {
        let reject = DepositWorkflow::reject(status, admin, "reason".into());
        prop_assert_eq!(reject.is_ok(), status.is_reviewable());
        prop_assert_eq!(
            DepositWorkflow::is_valid_transition(status, TransactionStatus::Completed),
            status.is_reviewable()
        );
    }
}
