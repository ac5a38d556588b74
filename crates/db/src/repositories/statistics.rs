//! Admin dashboard statistics.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use fundflow_core::RequestResult;
use fundflow_core::request::types::{AdminApprovalStatus, TransactionStatus};
use fundflow_core::request::{Deposit, TransactionRequest, Withdrawal};
use fundflow_core::stats::{DashboardStats, RequestStats, Tally, local_midnight};
use fundflow_shared::RetryConfig;

use super::LifecycleSettings;
use crate::store::retry::retry_read;
use crate::store::{RequestFilter, RequestStore, SortOrder, Window};

/// Computes dashboard rollups on demand.
pub struct StatisticsRepository<S: ?Sized> {
    store: Arc<S>,
    settings: LifecycleSettings,
}

impl<S: ?Sized> Clone for StatisticsRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            settings: self.settings.clone(),
        }
    }
}

impl<S> StatisticsRepository<S>
where
    S: RequestStore<Deposit> + RequestStore<Withdrawal> + ?Sized,
{
    /// Creates a new statistics repository.
    #[must_use]
    pub const fn new(store: Arc<S>, settings: LifecycleSettings) -> Self {
        Self { store, settings }
    }

    /// Pending counts and amounts plus today's outcomes for both directions.
    ///
    /// "Today" starts at midnight in the configured time zone.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails after retries.
    pub async fn dashboard(&self, now: DateTime<Utc>) -> RequestResult<DashboardStats> {
        let since = local_midnight(now, self.settings.statistics.timezone);
        let retry = &self.settings.retry;

        let deposits =
            rollup::<Deposit, S>(&*self.store, retry, TransactionStatus::REVIEWABLE, since).await?;
        let withdrawals =
            rollup::<Withdrawal, S>(&*self.store, retry, AdminApprovalStatus::REVIEWABLE, since)
                .await?;

        debug!(
            since = %since,
            pending_deposits = deposits.pending_count,
            pending_withdrawals = withdrawals.pending_count,
            "Dashboard statistics computed"
        );
        Ok(DashboardStats {
            deposits,
            withdrawals,
            since,
        })
    }
}

/// Loads the awaiting-review records and those processed since `since`,
/// then folds them into one rollup.
async fn rollup<R, S>(
    store: &S,
    retry: &RetryConfig,
    reviewable: &[R::Status],
    since: DateTime<Utc>,
) -> RequestResult<RequestStats>
where
    R: Tally,
    S: RequestStore<R> + ?Sized,
{
    let awaiting = RequestFilter::with_statuses(reviewable);
    let processed = RequestFilter::processed_since(since);

    let pending = retry_read(retry, "select_many", || {
        store.select_many(&awaiting, SortOrder::OldestFirst, Window::ALL)
    })
    .await?;
    let finished = retry_read(retry, "select_many", || {
        store.select_many(&processed, SortOrder::OldestFirst, Window::ALL)
    })
    .await?;

    let records = merge_reads(pending, finished, reviewable);
    Ok(RequestStats::compute(&records, since))
}

/// Combines the two reads so each request is counted once.
///
/// The processed read runs second, so a request found in both has moved
/// on since the first read and its processed copy wins.
fn merge_reads<R: Tally>(pending: Vec<R>, finished: Vec<R>, reviewable: &[R::Status]) -> Vec<R> {
    let finished: Vec<R> = finished
        .into_iter()
        .filter(|record| !reviewable.contains(&record.status()))
        .collect();
    let moved_on: HashSet<_> = finished.iter().map(TransactionRequest::id).collect();

    pending
        .into_iter()
        .filter(|record| !moved_on.contains(&record.id()))
        .chain(finished)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fundflow_core::request::NewDeposit;
    use fundflow_core::request::types::DepositMethod;
    use fundflow_shared::types::{AccountId, UserId};
    use rust_decimal_macros::dec;

    fn pending_deposit() -> Deposit {
        let new = NewDeposit {
            user_id: UserId::new(),
            account_id: AccountId::new(),
            amount: dec!(80),
            method: DepositMethod::Wire,
            bank_name: None,
            account_number_last4: None,
            notes: None,
            idempotency_key: None,
        };
        Deposit::from_submission(new, "DEP-TEST".to_string(), Utc::now())
    }

    #[test]
    fn test_request_seen_in_both_reads_counts_once() {
        let now = Utc::now();
        let before = pending_deposit();
        let mut after = before.clone();
        after.status = TransactionStatus::Completed;
        after.processed_at = Some(now);
        let untouched = pending_deposit();

        let merged = merge_reads(
            vec![before, untouched.clone()],
            vec![after.clone()],
            TransactionStatus::REVIEWABLE,
        );

        assert_eq!(merged, vec![untouched, after]);
        let stats = RequestStats::compute(&merged, now - chrono::Duration::hours(1));
        assert_eq!(stats.pending_count, 1);
        assert_eq!(stats.approved_today, 1);
    }
}
