//! Deposit and withdrawal request records.
//!
//! # Modules
//!
//! - `types` - Closed enumerations (methods, statuses, rejection reasons)
//! - `deposit` - Deposit submission and record
//! - `withdrawal` - Withdrawal submission, payout details and record

pub mod deposit;
pub mod types;
pub mod withdrawal;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;

use fundflow_shared::types::{AccountId, RequestId, UserId};

pub use deposit::{Deposit, NewDeposit};
pub use types::{
    AdminApprovalStatus, CryptoCurrency, DepositMethod, PayoutChannel, RejectionReason,
    RequestKind, TransactionStatus, WithdrawalMethod,
};
pub use withdrawal::{NewWithdrawal, PayoutDetails, Withdrawal};

/// Behaviour shared by every stored funds-movement request.
///
/// Stores are written against this trait so that deposits and withdrawals
/// share one persistence contract while keeping their own status machines.
pub trait TransactionRequest: Clone + fmt::Debug + Send + Sync + 'static {
    /// Status enumeration for this request kind.
    type Status: Copy + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static;
    /// Workflow action that transitions this request.
    type Action: Clone + fmt::Debug + Send + Sync + 'static;

    /// Direction of the request.
    const KIND: RequestKind;

    /// Opaque record identifier.
    fn id(&self) -> RequestId;
    /// Owning user.
    fn user_id(&self) -> UserId;
    /// Account credited or debited.
    fn account_id(&self) -> AccountId;
    /// Amount requested at submission.
    fn amount(&self) -> Decimal;
    /// Current status.
    fn status(&self) -> Self::Status;
    /// Human-facing reference number.
    fn reference_number(&self) -> &str;
    /// Client-supplied key that makes submission idempotent.
    fn idempotency_key(&self) -> Option<&str>;
    /// Submission time.
    fn created_at(&self) -> DateTime<Utc>;
    /// Time the request reached a terminal status, if it has.
    fn processed_at(&self) -> Option<DateTime<Utc>>;
    /// Applies a workflow action produced by the matching workflow.
    fn apply(&mut self, action: &Self::Action);
}
