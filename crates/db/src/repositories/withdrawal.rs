//! Withdrawal repository: submission, review, cancellation and read side.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};

use fundflow_core::account::Account;
use fundflow_core::request::types::{AdminApprovalStatus, RejectionReason};
use fundflow_core::request::{NewWithdrawal, Withdrawal};
use fundflow_core::validation::{ValidationOutcome, validate_withdrawal};
use fundflow_core::workflow::WithdrawalWorkflow;
use fundflow_core::{RequestError, RequestResult};
use fundflow_shared::types::{PageRequest, PageResponse, RequestId, UserId};

use super::{
    LifecycleSettings, PendingReview, Settled, Submitted, fetch, find_replay,
    insert_with_reference, refused,
};
use crate::store::retry::retry_read;
use crate::store::{AccountStore, Lookup, RequestFilter, RequestStore, SortOrder, Window};

/// Withdrawal repository over any store that holds withdrawals and accounts.
pub struct WithdrawalRepository<S: ?Sized> {
    store: Arc<S>,
    settings: LifecycleSettings,
}

impl<S: ?Sized> Clone for WithdrawalRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            settings: self.settings.clone(),
        }
    }
}

impl<S> WithdrawalRepository<S>
where
    S: RequestStore<Withdrawal> + AccountStore + ?Sized,
{
    /// Creates a new withdrawal repository.
    #[must_use]
    pub const fn new(store: Arc<S>, settings: LifecycleSettings) -> Self {
        Self { store, settings }
    }

    async fn owned_account(&self, withdrawal: &NewWithdrawal) -> RequestResult<Account> {
        let (account_id, user_id) = (withdrawal.account_id, withdrawal.user_id);
        retry_read(&self.settings.retry, "find_account", || {
            self.store.find_account(account_id, user_id)
        })
        .await?
        .ok_or_else(|| RequestError::NotFound("Account".to_string()))
    }

    /// Checks a proposed withdrawal against the current balance.
    ///
    /// The balance is read once; approval re-checks it atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing or the store fails. Rule
    /// failures are reported in the outcome, not as errors.
    pub async fn validate(&self, withdrawal: &NewWithdrawal) -> RequestResult<ValidationOutcome> {
        let account = self.owned_account(withdrawal).await?;
        Ok(validate_withdrawal(withdrawal, account.balance, &self.settings.limits).into())
    }

    /// Validates and stores a new withdrawal in `pending_review`.
    ///
    /// Nothing is debited until approval.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The account does not exist or is not the submitter's
    /// - A validation rule fails, including insufficient balance
    /// - The store fails
    pub async fn submit(&self, withdrawal: NewWithdrawal) -> RequestResult<Submitted<Withdrawal>> {
        let key = withdrawal.idempotency_key.clone();
        if let Some(existing) = find_replay(
            &*self.store,
            &self.settings.retry,
            withdrawal.user_id,
            key.as_deref(),
        )
        .await?
        {
            info!(request_id = %existing.id, reference = %existing.reference_number, "Withdrawal submission replayed");
            return Ok(Submitted {
                request: existing,
                replayed: true,
            });
        }

        let account = self.owned_account(&withdrawal).await?;
        validate_withdrawal(&withdrawal, account.balance, &self.settings.limits)?;

        let user_id = withdrawal.user_id;
        let now = Utc::now();
        let submitted = insert_with_reference(
            &*self.store,
            &self.settings,
            user_id,
            key.as_deref(),
            |reference| Withdrawal::from_submission(withdrawal.clone(), reference, now),
        )
        .await?;

        if !submitted.replayed {
            info!(
                request_id = %submitted.request.id,
                reference = %submitted.request.reference_number,
                user_id = %user_id,
                amount = %submitted.request.original_amount,
                method = %submitted.request.method,
                "Withdrawal submitted for review"
            );
        }
        Ok(submitted)
    }

    /// Approves a withdrawal and debits the account in one step.
    ///
    /// A `modified_amount` lowers the debit and needs explanatory notes.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The withdrawal is missing or no longer `pending_review`
    /// - The modified amount is non-positive, above the original or unexplained
    /// - The balance no longer covers the final amount; nothing is written
    pub async fn approve(
        &self,
        id: RequestId,
        admin_id: UserId,
        admin_notes: Option<String>,
        modified_amount: Option<Decimal>,
    ) -> RequestResult<Settled<Withdrawal>> {
        let withdrawal = self.get(id, None).await?;
        let notes_check = WithdrawalWorkflow::check_modification_notes(
            &withdrawal,
            modified_amount,
            admin_notes.as_deref(),
        );
        let action = WithdrawalWorkflow::approve(&withdrawal, admin_id, admin_notes, modified_amount)?;
        notes_check?;
        let debit = action.balance_delta().unwrap_or_default();

        let (updated, balance) = self
            .store
            .update_with_balance(
                id,
                AdminApprovalStatus::REVIEWABLE,
                &action,
                withdrawal.account_id,
                debit,
            )
            .await
            .inspect_err(|err| {
                warn!(request_id = %id, admin_id = %admin_id, error = %err, "Withdrawal approval failed");
            })
            .map_err(|err| refused(err, action.new_status()))?;

        let amount = -debit;
        info!(
            request_id = %id,
            reference = %updated.reference_number,
            admin_id = %admin_id,
            final_amount = %amount,
            modified = updated.modified_amount.is_some(),
            "Withdrawal approved, account debited"
        );
        Ok(Settled {
            request: updated,
            amount,
            balance,
        })
    }

    /// Rejects a withdrawal with a categorised reason and explanatory notes.
    ///
    /// # Errors
    ///
    /// Returns an error if the notes are blank, or the withdrawal is missing
    /// or no longer `pending_review`.
    pub async fn reject(
        &self,
        id: RequestId,
        admin_id: UserId,
        reason: RejectionReason,
        admin_notes: String,
    ) -> RequestResult<Withdrawal> {
        let withdrawal = self.get(id, None).await?;
        let action = WithdrawalWorkflow::reject(withdrawal.status, admin_id, reason, admin_notes)?;
        let updated = self
            .store
            .update_where(id, AdminApprovalStatus::REVIEWABLE, &action)
            .await
            .inspect_err(|err| warn!(request_id = %id, admin_id = %admin_id, error = %err, "Withdrawal rejection failed"))
            .map_err(|err| refused(err, action.new_status()))?;

        info!(
            request_id = %id,
            reference = %updated.reference_number,
            admin_id = %admin_id,
            reason = %reason,
            "Withdrawal rejected"
        );
        Ok(updated)
    }

    /// Cancels a withdrawal on behalf of its owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the withdrawal is missing, belongs to someone
    /// else, or is no longer `pending_review`.
    pub async fn cancel(&self, id: RequestId, user_id: UserId) -> RequestResult<Withdrawal> {
        let withdrawal = self.get(id, None).await?;
        let action = WithdrawalWorkflow::cancel(&withdrawal, user_id)?;
        let updated = self
            .store
            .update_where(id, AdminApprovalStatus::REVIEWABLE, &action)
            .await
            .map_err(|err| refused(err, action.new_status()))?;

        info!(request_id = %id, reference = %updated.reference_number, user_id = %user_id, "Withdrawal cancelled");
        Ok(updated)
    }

    /// Reads a withdrawal by id, optionally restricted to its owner.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent or owned by someone else.
    pub async fn get(&self, id: RequestId, owner: Option<UserId>) -> RequestResult<Withdrawal> {
        fetch(&*self.store, &self.settings.retry, Lookup::Id(id), owner).await
    }

    /// Reads a withdrawal by reference number.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent or owned by someone else.
    pub async fn get_by_reference(
        &self,
        reference: &str,
        owner: Option<UserId>,
    ) -> RequestResult<Withdrawal> {
        fetch(&*self.store, &self.settings.retry, Lookup::Reference(reference), owner).await
    }

    /// Lists a user's withdrawals, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> RequestResult<PageResponse<Withdrawal>> {
        let filter = RequestFilter::for_user(user_id);
        let window = Window {
            offset: page.offset(),
            limit: page.limit(),
        };
        let retry = &self.settings.retry;
        let total = retry_read(retry, "count", || self.store.count(&filter)).await?;
        let rows = retry_read(retry, "select_many", || {
            self.store.select_many(&filter, SortOrder::NewestFirst, window)
        })
        .await?;
        Ok(PageResponse::new(rows, page, total))
    }

    /// Withdrawals awaiting review, oldest first, with each account's balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn pending_queue(
        &self,
        page: PageRequest,
    ) -> RequestResult<PageResponse<PendingReview<Withdrawal>>> {
        let filter = RequestFilter::with_statuses(AdminApprovalStatus::REVIEWABLE);
        let window = Window {
            offset: page.offset(),
            limit: page.limit(),
        };
        let retry = &self.settings.retry;
        let total = retry_read(retry, "count", || self.store.count(&filter)).await?;
        let rows = retry_read(retry, "select_many", || {
            self.store.select_many(&filter, SortOrder::OldestFirst, window)
        })
        .await?;

        let ids: Vec<_> = rows.iter().map(|w| w.account_id).collect();
        let balances: HashMap<_, _> = retry_read(retry, "find_accounts", || self.store.find_accounts(&ids))
            .await?
            .into_iter()
            .map(|account| (account.id, account.balance))
            .collect();

        let entries = rows
            .into_iter()
            .map(|withdrawal| PendingReview {
                account_balance: balances.get(&withdrawal.account_id).copied(),
                request: withdrawal,
            })
            .collect();
        Ok(PageResponse::new(entries, page, total))
    }
}
