//! Dashboard rollups for admin review.
//!
//! Figures are computed on demand from the records the caller loaded; no
//! totals are cached or maintained incrementally.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::request::TransactionRequest;
use crate::request::deposit::Deposit;
use crate::request::types::{AdminApprovalStatus, TransactionStatus};
use crate::request::withdrawal::Withdrawal;

/// Where a record stands for dashboard purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standing {
    /// Waiting for an admin.
    AwaitingReview,
    /// Finished successfully (completed / approved).
    Succeeded,
    /// Finished unsuccessfully (failed / rejected).
    Failed,
    /// Withdrawn by its owner; not counted.
    Cancelled,
}

/// Maps a record onto a dashboard standing.
pub trait Tally: TransactionRequest {
    /// Returns the record's standing.
    fn standing(&self) -> Standing;
    /// Amount counted towards the pending total.
    fn pending_amount(&self) -> Decimal {
        self.amount()
    }
}

impl Tally for Deposit {
    fn standing(&self) -> Standing {
        match self.status {
            TransactionStatus::Pending | TransactionStatus::Processing => Standing::AwaitingReview,
            TransactionStatus::Completed => Standing::Succeeded,
            TransactionStatus::Failed => Standing::Failed,
            TransactionStatus::Cancelled => Standing::Cancelled,
        }
    }
}

impl Tally for Withdrawal {
    fn standing(&self) -> Standing {
        match self.status {
            AdminApprovalStatus::PendingReview => Standing::AwaitingReview,
            AdminApprovalStatus::Approved => Standing::Succeeded,
            AdminApprovalStatus::Rejected => Standing::Failed,
            AdminApprovalStatus::Cancelled => Standing::Cancelled,
        }
    }
}

/// Rollup for one request direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestStats {
    /// Requests awaiting review.
    pub pending_count: u64,
    /// Sum of the amounts awaiting review.
    pub pending_amount: Decimal,
    /// Requests that succeeded since local midnight.
    pub approved_today: u64,
    /// Requests that failed or were rejected since local midnight.
    pub rejected_today: u64,
}

impl RequestStats {
    /// Computes the rollup over `records`, counting terminal outcomes
    /// processed at or after `since`.
    pub fn compute<R: Tally>(records: &[R], since: DateTime<Utc>) -> Self {
        records.iter().fold(Self::default(), |mut stats, record| {
            let today = record.processed_at().is_some_and(|at| at >= since);
            match record.standing() {
                Standing::AwaitingReview => {
                    stats.pending_count += 1;
                    stats.pending_amount += record.pending_amount();
                }
                Standing::Succeeded if today => stats.approved_today += 1,
                Standing::Failed if today => stats.rejected_today += 1,
                _ => {}
            }
            stats
        })
    }
}

/// Deposit and withdrawal rollups together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// Deposit rollup.
    pub deposits: RequestStats,
    /// Withdrawal rollup.
    pub withdrawals: RequestStats,
    /// Start of the "today" window, in UTC.
    pub since: DateTime<Utc>,
}

/// Returns the most recent local midnight in `tz`, as a UTC instant.
///
/// Where midnight does not exist (a DST jump at 00:00) the first instant of
/// the local day is used instead.
#[must_use]
pub fn local_midnight(now: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    let day = now.with_timezone(&tz).date_naive();
    let midnight = day.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
        .map_or(now, |local| local.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::deposit::NewDeposit;
    use crate::request::types::{DepositMethod, WithdrawalMethod};
    use crate::request::withdrawal::{NewWithdrawal, PayoutDetails};
    use fundflow_shared::types::{AccountId, UserId};
    use rust_decimal_macros::dec;

    fn deposit(amount: Decimal, status: TransactionStatus, processed_at: Option<DateTime<Utc>>) -> Deposit {
        let submission = NewDeposit {
            user_id: UserId::new(),
            account_id: AccountId::new(),
            amount,
            method: DepositMethod::Wire,
            bank_name: None,
            account_number_last4: None,
            notes: None,
            idempotency_key: None,
        };
        let mut d = Deposit::from_submission(submission, "DEP-X".into(), Utc::now());
        d.status = status;
        d.processed_at = processed_at;
        d
    }

    fn withdrawal(amount: Decimal, status: AdminApprovalStatus, processed_at: Option<DateTime<Utc>>) -> Withdrawal {
        let submission = NewWithdrawal {
            user_id: UserId::new(),
            account_id: AccountId::new(),
            amount,
            method: WithdrawalMethod::Paypal,
            details: PayoutDetails::default(),
            notes: None,
            idempotency_key: None,
        };
        let mut w = Withdrawal::from_submission(submission, "WTH-X".into(), Utc::now());
        w.status = status;
        w.processed_at = processed_at;
        w
    }

    #[test]
    fn test_deposit_rollup_counts_processing_as_pending() {
        let since = Utc::now() - Duration::hours(2);
        let yesterday = since - Duration::hours(5);
        let records = vec![
            deposit(dec!(100), TransactionStatus::Pending, None),
            deposit(dec!(250.50), TransactionStatus::Processing, None),
            deposit(dec!(75), TransactionStatus::Completed, Some(Utc::now())),
            deposit(dec!(75), TransactionStatus::Completed, Some(yesterday)),
            deposit(dec!(10), TransactionStatus::Failed, Some(Utc::now())),
            deposit(dec!(10), TransactionStatus::Cancelled, Some(Utc::now())),
        ];
        let stats = RequestStats::compute(&records, since);
        assert_eq!(
            stats,
            RequestStats {
                pending_count: 2,
                pending_amount: dec!(350.50),
                approved_today: 1,
                rejected_today: 1,
            }
        );
    }

    #[test]
    fn test_withdrawal_rollup() {
        let since = Utc::now() - Duration::hours(1);
        let records = vec![
            withdrawal(dec!(1000), AdminApprovalStatus::PendingReview, None),
            withdrawal(dec!(500), AdminApprovalStatus::Approved, Some(Utc::now())),
            withdrawal(dec!(500), AdminApprovalStatus::Rejected, Some(Utc::now())),
            withdrawal(dec!(500), AdminApprovalStatus::Rejected, Some(since - Duration::seconds(1))),
        ];
        let stats = RequestStats::compute(&records, since);
        assert_eq!(stats.pending_count, 1);
        assert_eq!(stats.pending_amount, dec!(1000));
        assert_eq!(stats.approved_today, 1);
        assert_eq!(stats.rejected_today, 1);
    }

    #[test]
    fn test_empty_rollup() {
        let stats = RequestStats::compute::<Deposit>(&[], Utc::now());
        assert_eq!(stats, RequestStats::default());
    }

    #[test]
    fn test_local_midnight_utc() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 15, 30, 0).unwrap();
        assert_eq!(
            local_midnight(now, Tz::UTC),
            Utc.with_ymd_and_hms(2026, 10, 18, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_local_midnight_in_new_york() {
        // 02:00 UTC on the 18th is still the 17th in New York (UTC-4).
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 2, 0, 0).unwrap();
        assert_eq!(
            local_midnight(now, chrono_tz::America::New_York),
            Utc.with_ymd_and_hms(2026, 10, 17, 4, 0, 0).unwrap()
        );
    }
}
