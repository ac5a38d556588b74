//! Repositories orchestrating the request lifecycle.
//!
//! Each repository validates through `fundflow-core`, persists through the
//! store ports and logs every state transition. They are generic over the
//! store so the same code runs on PostgreSQL and in memory.

pub mod account;
pub mod deposit;
pub mod statistics;
pub mod withdrawal;

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use fundflow_core::reference::ReferenceGenerator;
use fundflow_core::request::TransactionRequest;
use fundflow_core::workflow::WorkflowError;
use fundflow_core::{RequestError, RequestResult};
use fundflow_shared::types::UserId;
use fundflow_shared::{AppConfig, LimitsConfig, ReferenceConfig, RetryConfig, StatisticsConfig};

use crate::store::retry::retry_read;
use crate::store::{Lookup, RequestStore, StoreError};

pub use account::AccountRepository;
pub use deposit::DepositRepository;
pub use statistics::StatisticsRepository;
pub use withdrawal::WithdrawalRepository;

/// Settings the repositories need, taken from `AppConfig`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifecycleSettings {
    /// Validation thresholds.
    pub limits: LimitsConfig,
    /// Read retry policy.
    pub retry: RetryConfig,
    /// Reference allocation.
    pub reference: ReferenceConfig,
    /// Dashboard statistics.
    pub statistics: StatisticsConfig,
}

impl From<&AppConfig> for LifecycleSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            limits: config.limits.clone(),
            retry: config.retry.clone(),
            reference: config.reference.clone(),
            statistics: config.statistics.clone(),
        }
    }
}

/// A created (or replayed) request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submitted<R> {
    /// The stored request.
    pub request: R,
    /// True when an earlier submission with the same idempotency key was returned.
    pub replayed: bool,
}

/// A request whose approval moved money.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settled<R> {
    /// The updated request.
    pub request: R,
    /// Amount credited or debited.
    pub amount: Decimal,
    /// Account balance after the change.
    pub balance: Decimal,
}

/// An entry in the admin review queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingReview<R> {
    /// The request awaiting review.
    pub request: R,
    /// Current balance of the request's account, if it still exists.
    pub account_balance: Option<Decimal>,
}

/// Maps a lost conditional update onto the transition it refused.
pub(crate) fn refused(err: StoreError, target: impl fmt::Display) -> RequestError {
    match err {
        StoreError::Conflict { current } => WorkflowError::InvalidTransition {
            from: current,
            to: target.to_string(),
        }
        .into(),
        other => other.into(),
    }
}

/// Reads one record with retry, failing with `NotFound` if absent or not
/// owned by `owner`.
pub(crate) async fn fetch<R, S>(
    store: &S,
    retry: &RetryConfig,
    lookup: Lookup<'_>,
    owner: Option<UserId>,
) -> RequestResult<R>
where
    R: TransactionRequest,
    S: RequestStore<R> + ?Sized,
{
    let record = retry_read(retry, "select_one", || store.select_one(lookup)).await?;
    record
        .filter(|r| owner.is_none_or(|user| r.user_id() == user))
        .ok_or_else(|| RequestError::NotFound(R::KIND.noun().to_string()))
}

/// Returns the request a user already submitted under `key`, if any.
async fn find_replay<R, S>(
    store: &S,
    retry: &RetryConfig,
    user_id: UserId,
    key: Option<&str>,
) -> RequestResult<Option<R>>
where
    R: TransactionRequest,
    S: RequestStore<R> + ?Sized,
{
    let Some(key) = key else {
        return Ok(None);
    };
    let lookup = Lookup::IdempotencyKey { user_id, key };
    Ok(retry_read(retry, "select_one", || store.select_one(lookup)).await?)
}

/// Inserts a new request, drawing a fresh reference on each collision.
///
/// `build` receives the reference and returns the record to insert. A lost
/// race on the idempotency key returns the winner's record instead.
pub(crate) async fn insert_with_reference<R, S, F>(
    store: &S,
    settings: &LifecycleSettings,
    user_id: UserId,
    idempotency_key: Option<&str>,
    mut build: F,
) -> RequestResult<Submitted<R>>
where
    R: TransactionRequest,
    S: RequestStore<R> + ?Sized,
    F: FnMut(String) -> R,
{
    let attempts = settings.reference.max_attempts.max(1);
    for attempt in 1..=attempts {
        let record = build(ReferenceGenerator::for_kind(R::KIND));
        match store.insert(&record).await {
            Ok(()) => {
                return Ok(Submitted {
                    request: record,
                    replayed: false,
                });
            }
            Err(StoreError::DuplicateReference) => {
                tracing::warn!(
                    kind = %R::KIND,
                    reference = record.reference_number(),
                    attempt,
                    "Reference number collision, regenerating"
                );
            }
            Err(StoreError::DuplicateIdempotencyKey) => {
                let existing = find_replay(store, &settings.retry, user_id, idempotency_key)
                    .await?
                    .ok_or_else(|| RequestError::Conflict("Idempotency key already used".into()))?;
                return Ok(Submitted {
                    request: existing,
                    replayed: true,
                });
            }
            Err(err) => {
                tracing::error!(kind = %R::KIND, error = %err, "Failed to insert request");
                return Err(err.into());
            }
        }
    }
    Err(RequestError::Persistence(format!(
        "Could not allocate a unique reference number after {attempts} attempts"
    )))
}
