//! Deposit submission and record.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fundflow_shared::types::{AccountId, RequestId, UserId};

use super::TransactionRequest;
use super::types::{DepositMethod, RequestKind, TransactionStatus};
use crate::workflow::types::DepositAction;

/// A deposit as submitted by a user, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDeposit {
    /// Submitting user.
    pub user_id: UserId,
    /// Account to credit.
    pub account_id: AccountId,
    /// Requested amount.
    pub amount: Decimal,
    /// Funding method.
    pub method: DepositMethod,
    /// Originating bank, for bank-based methods.
    pub bank_name: Option<String>,
    /// Last four digits of the originating account.
    pub account_number_last4: Option<String>,
    /// Free-text notes from the user.
    pub notes: Option<String>,
    /// Replaying a key returns the request first created with it.
    pub idempotency_key: Option<String>,
}

/// A stored deposit request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    /// Record identifier.
    pub id: RequestId,
    /// Owning user.
    pub user_id: UserId,
    /// Account to credit.
    pub account_id: AccountId,
    /// Amount credited on approval. Never changes after creation.
    pub amount: Decimal,
    /// Funding method.
    pub method: DepositMethod,
    /// Current status.
    pub status: TransactionStatus,
    /// Human-facing reference, `DEP-` prefixed.
    pub reference_number: String,
    /// Originating bank.
    pub bank_name: Option<String>,
    /// Last four digits of the originating account.
    pub account_number_last4: Option<String>,
    /// Notes from the user.
    pub notes: Option<String>,
    /// Notes from the reviewing admin, or the rejection reason.
    pub admin_notes: Option<String>,
    /// Admin who last acted on the deposit.
    pub processed_by: Option<UserId>,
    /// Idempotency key supplied at submission.
    pub idempotency_key: Option<String>,
    /// Submission time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Time the deposit was completed or failed.
    pub processed_at: Option<DateTime<Utc>>,
}

impl Deposit {
    /// Builds a pending deposit from a validated submission.
    #[must_use]
    pub fn from_submission(new: NewDeposit, reference_number: String, now: DateTime<Utc>) -> Self {
        Self {
            id: RequestId::new(),
            user_id: new.user_id,
            account_id: new.account_id,
            amount: new.amount,
            method: new.method,
            status: TransactionStatus::Pending,
            reference_number,
            bank_name: new.bank_name.map(|s| s.trim().to_string()),
            account_number_last4: new.account_number_last4.map(|s| s.trim().to_string()),
            notes: new.notes,
            admin_notes: None,
            processed_by: None,
            idempotency_key: new.idempotency_key,
            created_at: now,
            updated_at: now,
            processed_at: None,
        }
    }
}

impl TransactionRequest for Deposit {
    type Status = TransactionStatus;
    type Action = DepositAction;

    const KIND: RequestKind = RequestKind::Deposit;

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
        self.amount
    }

    fn status(&self) -> TransactionStatus {
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

    fn apply(&mut self, action: &DepositAction) {
        self.status = action.new_status();
        match action {
            DepositAction::StartProcessing {
                started_by,
                started_at,
                ..
            } => {
                self.processed_by = Some(*started_by);
                self.updated_at = *started_at;
            }
            DepositAction::Approve {
                approved_by,
                processed_at,
                admin_notes,
                ..
            } => {
                self.processed_by = Some(*approved_by);
                self.processed_at = Some(*processed_at);
                if admin_notes.is_some() {
                    self.admin_notes.clone_from(admin_notes);
                }
                self.updated_at = *processed_at;
            }
            DepositAction::Reject {
                rejected_by,
                processed_at,
                reason,
                ..
            } => {
                self.processed_by = Some(*rejected_by);
                self.processed_at = Some(*processed_at);
                self.admin_notes = Some(reason.clone());
                self.updated_at = *processed_at;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn submission() -> NewDeposit {
        NewDeposit {
            user_id: UserId::new(),
            account_id: AccountId::new(),
            amount: dec!(500.00),
            method: DepositMethod::BankTransfer,
            bank_name: Some("  First Bank ".to_string()),
            account_number_last4: Some("1234".to_string()),
            notes: None,
            idempotency_key: None,
        }
    }

    #[test]
    fn test_from_submission_starts_pending() {
        let now = Utc::now();
        let deposit = Deposit::from_submission(submission(), "DEP-X".to_string(), now);
        assert_eq!(deposit.status, TransactionStatus::Pending);
        assert_eq!(deposit.reference_number, "DEP-X");
        assert_eq!(deposit.bank_name.as_deref(), Some("First Bank"));
        assert_eq!(deposit.created_at, now);
        assert!(deposit.processed_at.is_none());
    }

    #[test]
    fn test_apply_reject_stores_reason_in_admin_notes() {
        let now = Utc::now();
        let admin = UserId::new();
        let mut deposit = Deposit::from_submission(submission(), "DEP-X".to_string(), now);
        deposit.apply(&DepositAction::Reject {
            new_status: TransactionStatus::Failed,
            rejected_by: admin,
            processed_at: now,
            reason: "Funds never arrived".to_string(),
        });
        assert_eq!(deposit.status, TransactionStatus::Failed);
        assert_eq!(deposit.admin_notes.as_deref(), Some("Funds never arrived"));
        assert_eq!(deposit.processed_by, Some(admin));
        assert_eq!(deposit.processed_at, Some(now));
        assert_eq!(deposit.amount, dec!(500.00));
    }
}
