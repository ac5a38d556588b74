//! Withdrawal submission, payout details and record.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fundflow_shared::types::{AccountId, RequestId, UserId};

use super::TransactionRequest;
use super::types::{AdminApprovalStatus, RejectionReason, RequestKind, WithdrawalMethod};
use crate::workflow::types::WithdrawalAction;

/// Method-specific payout destination fields.
///
/// Which fields are required depends on the method's payout channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutDetails {
    /// Destination bank (banking channel).
    pub bank_name: Option<String>,
    /// Last four digits of the destination account (banking channel).
    pub account_number_last4: Option<String>,
    /// Routing number (banking channel, optional).
    pub routing_number: Option<String>,
    /// Wallet email (wallet channel).
    pub email: Option<String>,
    /// Destination wallet address (crypto channel).
    pub crypto_address: Option<String>,
    /// Asset ticker (crypto channel).
    pub crypto_currency: Option<String>,
    /// Chain or network name (crypto channel, optional).
    pub crypto_network: Option<String>,
    /// Last four digits of the destination card (card channel).
    pub card_last4: Option<String>,
}

impl PayoutDetails {
    /// Trims every field and upper-cases the crypto ticker.
    #[must_use]
    pub fn normalized(self) -> Self {
        let trim = |value: Option<String>| value.map(|s| s.trim().to_string());
        Self {
            bank_name: trim(self.bank_name),
            account_number_last4: trim(self.account_number_last4),
            routing_number: trim(self.routing_number),
            email: trim(self.email),
            crypto_address: trim(self.crypto_address),
            crypto_currency: trim(self.crypto_currency).map(|s| s.to_ascii_uppercase()),
            crypto_network: trim(self.crypto_network),
            card_last4: trim(self.card_last4),
        }
    }
}

/// A withdrawal as submitted by a user, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWithdrawal {
    /// Submitting user.
    pub user_id: UserId,
    /// Account to debit.
    pub account_id: AccountId,
    /// Requested amount.
    pub amount: Decimal,
    /// Payout method.
    pub method: WithdrawalMethod,
    /// Payout destination.
    #[serde(default)]
    pub details: PayoutDetails,
    /// Free-text notes from the user.
    pub notes: Option<String>,
    /// Replaying a key returns the request first created with it.
    pub idempotency_key: Option<String>,
}

/// A stored withdrawal request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawal {
    /// Record identifier.
    pub id: RequestId,
    /// Owning user.
    pub user_id: UserId,
    /// Account to debit.
    pub account_id: AccountId,
    /// Amount requested at submission.
    pub original_amount: Decimal,
    /// Reduced amount chosen by the approving admin.
    pub modified_amount: Option<Decimal>,
    /// Amount actually debited; set on approval.
    pub final_amount: Option<Decimal>,
    /// Payout method.
    pub method: WithdrawalMethod,
    /// Admin approval status.
    pub status: AdminApprovalStatus,
    /// Human-facing reference, `WTH-` prefixed.
    pub reference_number: String,
    /// Payout destination.
    #[serde(flatten)]
    pub details: PayoutDetails,
    /// Notes from the user.
    pub notes: Option<String>,
    /// Notes from the reviewing admin.
    pub admin_notes: Option<String>,
    /// Reviewing admin.
    pub reviewed_by: Option<UserId>,
    /// Review time.
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Reason given on rejection.
    pub rejection_reason: Option<RejectionReason>,
    /// Idempotency key supplied at submission.
    pub idempotency_key: Option<String>,
    /// Submission time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Time the withdrawal reached a terminal status.
    pub processed_at: Option<DateTime<Utc>>,
}

impl Withdrawal {
    /// Builds a pending-review withdrawal from a validated submission.
    #[must_use]
    pub fn from_submission(
        new: NewWithdrawal,
        reference_number: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RequestId::new(),
            user_id: new.user_id,
            account_id: new.account_id,
            original_amount: new.amount,
            modified_amount: None,
            final_amount: None,
            method: new.method,
            status: AdminApprovalStatus::PendingReview,
            reference_number,
            details: new.details.normalized(),
            notes: new.notes,
            admin_notes: None,
            reviewed_by: None,
            reviewed_at: None,
            rejection_reason: None,
            idempotency_key: new.idempotency_key,
            created_at: now,
            updated_at: now,
            processed_at: None,
        }
    }
}

impl TransactionRequest for Withdrawal {
    type Status = AdminApprovalStatus;
    type Action = WithdrawalAction;

    const KIND: RequestKind = RequestKind::Withdrawal;

    fn id(&self) -> RequestId {
        self.id
    }

    fn user_id(&self) -> UserId {
        self.user_id
    }

    fn account_id(&self) -> AccountId {
        self.account_id
    }

    fn amount(&self) -> Decimal {
        self.original_amount
    }

    fn status(&self) -> AdminApprovalStatus {
        self.status
    }

    fn reference_number(&self) -> &str {
        &self.reference_number
    }

    fn idempotency_key(&self) -> Option<&str> {
        self.idempotency_key.as_deref()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn processed_at(&self) -> Option<DateTime<Utc>> {
        self.processed_at
    }

    fn apply(&mut self, action: &WithdrawalAction) {
        self.status = action.new_status();
        match action {
            WithdrawalAction::Approve {
                reviewed_by,
                reviewed_at,
                admin_notes,
                modified_amount,
                final_amount,
                ..
            } => {
                self.reviewed_by = Some(*reviewed_by);
                self.reviewed_at = Some(*reviewed_at);
                self.admin_notes.clone_from(admin_notes);
                self.modified_amount = *modified_amount;
                self.final_amount = Some(*final_amount);
                self.processed_at = Some(*reviewed_at);
                self.updated_at = *reviewed_at;
            }
            WithdrawalAction::Reject {
                reviewed_by,
                reviewed_at,
                rejection_reason,
                admin_notes,
                ..
            } => {
                self.reviewed_by = Some(*reviewed_by);
                self.reviewed_at = Some(*reviewed_at);
                self.rejection_reason = Some(*rejection_reason);
                self.admin_notes = Some(admin_notes.clone());
                self.processed_at = Some(*reviewed_at);
                self.updated_at = *reviewed_at;
            }
            WithdrawalAction::Cancel { cancelled_at, .. } => {
                self.processed_at = Some(*cancelled_at);
                self.updated_at = *cancelled_at;
            }
        }
    }
}
