//! Persistence boundary for the request lifecycle.
//!
//! Repositories talk to storage only through these ports. Every status
//! change is a conditional update keyed on the expected current status,
//! and every balance change is a server-side atomic increment. The two are
//! combined in [`RequestStore::update_with_balance`], the single
//! transactional boundary used by approvals.
//!
//! # Modules
//!
//! - `error` - `StoreError`
//! - `memory` - In-process adapter
//! - `postgres` - SeaORM adapter
//! - `retry` - Backoff for idempotent reads

pub mod error;
pub mod memory;
pub mod postgres;
pub mod retry;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use fundflow_core::account::Account;
use fundflow_core::request::{Deposit, TransactionRequest, Withdrawal};
use fundflow_shared::types::{AccountId, RequestId, UserId};

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::PgStore;

/// How to locate a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// By record id.
    Id(RequestId),
    /// By reference number.
    Reference(&'a str),
    /// By the key a user supplied at submission.
    IdempotencyKey {
        /// Submitting user.
        user_id: UserId,
        /// The key.
        key: &'a str,
    },
}

impl Lookup<'_> {
    /// Returns true if `record` is the one this lookup names.
    pub fn matches<R: TransactionRequest>(&self, record: &R) -> bool {
        match *self {
            Self::Id(id) => record.id() == id,
            Self::Reference(reference) => record.reference_number() == reference,
            Self::IdempotencyKey { user_id, key } => {
                record.user_id() == user_id && record.idempotency_key() == Some(key)
            }
        }
    }
}

/// Filter for multi-record reads. Empty fields match everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFilter<S> {
    /// Owning user.
    pub user_id: Option<UserId>,
    /// Account.
    pub account_id: Option<AccountId>,
    /// Accepted statuses.
    pub statuses: Vec<S>,
    /// Only records processed at or after this instant.
    pub processed_since: Option<DateTime<Utc>>,
}

impl<S> Default for RequestFilter<S> {
    fn default() -> Self {
        Self {
            user_id: None,
            account_id: None,
            statuses: Vec::new(),
            processed_since: None,
        }
    }
}

impl<S: Copy + Eq> RequestFilter<S> {
    /// Records owned by `user_id`.
    #[must_use]
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }

    /// Records in any of `statuses`.
    #[must_use]
    pub fn with_statuses(statuses: &[S]) -> Self {
        Self {
            statuses: statuses.to_vec(),
            ..Self::default()
        }
    }

    /// Records processed at or after `since`.
    #[must_use]
    pub fn processed_since(since: DateTime<Utc>) -> Self {
        Self {
            processed_since: Some(since),
            ..Self::default()
        }
    }

    /// Returns true if `record` passes every set field.
    pub fn matches<R: TransactionRequest<Status = S>>(&self, record: &R) -> bool {
        self.user_id.is_none_or(|user| record.user_id() == user)
            && self.account_id.is_none_or(|account| record.account_id() == account)
            && (self.statuses.is_empty() || self.statuses.contains(&record.status()))
            && self
                .processed_since
                .is_none_or(|since| record.processed_at().is_some_and(|at| at >= since))
    }
}

/// Ordering by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Newest first.
    #[default]
    NewestFirst,
    /// Oldest first; used for review queues.
    OldestFirst,
}

/// Row window for multi-record reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Rows to skip.
    pub offset: u64,
    /// Maximum rows to return.
    pub limit: u64,
}

impl Window {
    /// Every row.
    pub const ALL: Self = Self {
        offset: 0,
        limit: u64::MAX,
    };
}

/// Storage for one kind of request record.
#[async_trait]
pub trait RequestStore<R: TransactionRequest>: Send + Sync {
    /// Persists a new record.
    ///
    /// Fails with `DuplicateReference` or `DuplicateIdempotencyKey` when a
    /// uniqueness constraint is hit; nothing is written in that case.
    async fn insert(&self, record: &R) -> Result<(), StoreError>;

    /// Reads a single record.
    async fn select_one(&self, lookup: Lookup<'_>) -> Result<Option<R>, StoreError>;

    /// Reads the records matching `filter`.
    async fn select_many(
        &self,
        filter: &RequestFilter<R::Status>,
        order: SortOrder,
        window: Window,
    ) -> Result<Vec<R>, StoreError>;

    /// Counts the records matching `filter`.
    async fn count(&self, filter: &RequestFilter<R::Status>) -> Result<u64, StoreError>;

    /// Applies `action` only if the record is currently in one of `expected`.
    ///
    /// Fails with `Conflict` carrying the actual status otherwise.
    async fn update_where(
        &self,
        id: RequestId,
        expected: &[R::Status],
        action: &R::Action,
    ) -> Result<R, StoreError>;

    /// Applies `action` and adds `delta` to the account balance as one unit.
    ///
    /// Either both happen or neither does. The increment is refused with
    /// `InsufficientFunds` if it would leave the balance below zero.
    /// Returns the updated record and the new balance.
    async fn update_with_balance(
        &self,
        id: RequestId,
        expected: &[R::Status],
        action: &R::Action,
        account_id: AccountId,
        delta: Decimal,
    ) -> Result<(R, Decimal), StoreError>;
}

/// Storage for account balances.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Reads the account only if it belongs to `user_id`.
    async fn find_account(
        &self,
        account_id: AccountId,
        user_id: UserId,
    ) -> Result<Option<Account>, StoreError>;

    /// Reads accounts by id, regardless of owner.
    async fn find_accounts(&self, ids: &[AccountId]) -> Result<Vec<Account>, StoreError>;

    /// Adds `delta` to the balance server-side and returns the new balance.
    ///
    /// Refused with `InsufficientFunds` if the result would be negative.
    async fn atomic_increment_balance(
        &self,
        account_id: AccountId,
        delta: Decimal,
    ) -> Result<Decimal, StoreError>;

    /// Creates an account.
    async fn open_account(&self, account: &Account) -> Result<(), StoreError>;
}

/// Everything the lifecycle needs from storage.
pub trait LifecycleStore: RequestStore<Deposit> + RequestStore<Withdrawal> + AccountStore {}

impl<T> LifecycleStore for T where
    T: RequestStore<Deposit> + RequestStore<Withdrawal> + AccountStore + ?Sized
{
}
