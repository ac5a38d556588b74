//! Deposit repository: submission, review and read side.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use fundflow_core::request::types::TransactionStatus;
use fundflow_core::request::{Deposit, NewDeposit};
use fundflow_core::validation::{ValidationOutcome, validate_deposit};
use fundflow_core::workflow::{DepositAction, DepositWorkflow};
use fundflow_core::{RequestError, RequestResult};
use fundflow_shared::types::{PageRequest, PageResponse, RequestId, UserId};

use super::{
    LifecycleSettings, PendingReview, Settled, Submitted, fetch, find_replay,
    insert_with_reference, refused,
};
use crate::store::retry::retry_read;
use crate::store::{AccountStore, Lookup, RequestFilter, RequestStore, SortOrder, Window};

/// Deposit repository over any store that holds deposits and accounts.
pub struct DepositRepository<S: ?Sized> {
    store: Arc<S>,
    settings: LifecycleSettings,
}

impl<S: ?Sized> Clone for DepositRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            settings: self.settings.clone(),
        }
    }
}

impl<S> DepositRepository<S>
where
    S: RequestStore<Deposit> + AccountStore + ?Sized,
{
    /// Creates a new deposit repository.
    #[must_use]
    pub const fn new(store: Arc<S>, settings: LifecycleSettings) -> Self {
        Self { store, settings }
    }

    /// Checks a proposed deposit without persisting anything.
    #[must_use]
    pub fn validate(&self, deposit: &NewDeposit) -> ValidationOutcome {
        validate_deposit(deposit, &self.settings.limits).into()
    }

    /// Validates and stores a new deposit in `pending`.
    ///
    /// Replaying an idempotency key returns the deposit first created with it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A validation rule fails
    /// - The account does not exist or is not the submitter's
    /// - The store fails
    pub async fn submit(&self, deposit: NewDeposit) -> RequestResult<Submitted<Deposit>> {
        let key = deposit.idempotency_key.clone();
        if let Some(existing) =
            find_replay(&*self.store, &self.settings.retry, deposit.user_id, key.as_deref()).await?
        {
            info!(request_id = %existing.id, reference = %existing.reference_number, "Deposit submission replayed");
            return Ok(Submitted {
                request: existing,
                replayed: true,
            });
        }

        validate_deposit(&deposit, &self.settings.limits)?;

        let (account_id, user_id) = (deposit.account_id, deposit.user_id);
        retry_read(&self.settings.retry, "find_account", || {
            self.store.find_account(account_id, user_id)
        })
        .await?
        .ok_or_else(|| RequestError::NotFound("Account".to_string()))?;

        let now = Utc::now();
        let submitted = insert_with_reference(
            &*self.store,
            &self.settings,
            user_id,
            key.as_deref(),
            |reference| Deposit::from_submission(deposit.clone(), reference, now),
        )
        .await?;

        if !submitted.replayed {
            info!(
                request_id = %submitted.request.id,
                reference = %submitted.request.reference_number,
                user_id = %user_id,
                amount = %submitted.request.amount,
                method = %submitted.request.method,
                "Deposit submitted"
            );
        }
        Ok(submitted)
    }

    /// Moves a pending deposit to `processing`.
    ///
    /// # Errors
    ///
    /// Returns an error if the deposit is missing or not `pending`.
    pub async fn start_processing(&self, id: RequestId, admin_id: UserId) -> RequestResult<Deposit> {
        let deposit = self.get(id, None).await?;
        let action = DepositWorkflow::start_processing(deposit.status, admin_id)?;
        let updated = self
            .store
            .update_where(id, &[TransactionStatus::Pending], &action)
            .await
            .inspect_err(|err| warn!(request_id = %id, admin_id = %admin_id, error = %err, "Deposit claim lost"))
            .map_err(|err| refused(err, action.new_status()))?;

        info!(
            request_id = %id,
            reference = %updated.reference_number,
            admin_id = %admin_id,
            "Deposit processing started"
        );
        Ok(updated)
    }

    /// Approves a deposit and credits the account in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The deposit is missing
    /// - The deposit is not `pending` or `processing` (including a lost race)
    /// - The store fails; nothing is written in that case
    pub async fn approve(
        &self,
        id: RequestId,
        admin_id: UserId,
        admin_notes: Option<String>,
    ) -> RequestResult<Settled<Deposit>> {
        let deposit = self.get(id, None).await?;
        let action = DepositWorkflow::approve(&deposit, admin_id, admin_notes)?;
        let credit = action.balance_delta().unwrap_or_default();

        let (updated, balance) = self
            .store
            .update_with_balance(id, TransactionStatus::REVIEWABLE, &action, deposit.account_id, credit)
            .await
            .inspect_err(|err| {
                warn!(request_id = %id, admin_id = %admin_id, error = %err, "Deposit approval failed");
            })
            .map_err(|err| refused(err, action.new_status()))?;

        info!(
            request_id = %id,
            reference = %updated.reference_number,
            admin_id = %admin_id,
            amount = %credit,
            "Deposit approved, account credited"
        );
        Ok(Settled {
            request: updated,
            amount: credit,
            balance,
        })
    }

    /// Rejects a deposit; the reason is shown to the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the reason is blank, or the deposit is missing or
    /// not `pending`/`processing`.
    pub async fn reject(
        &self,
        id: RequestId,
        admin_id: UserId,
        reason: String,
    ) -> RequestResult<Deposit> {
        let deposit = self.get(id, None).await?;
        let action = DepositWorkflow::reject(deposit.status, admin_id, reason)?;
        let updated = self
            .store
            .update_where(id, TransactionStatus::REVIEWABLE, &action)
            .await
            .inspect_err(|err| warn!(request_id = %id, admin_id = %admin_id, error = %err, "Deposit rejection failed"))
            .map_err(|err| refused(err, action.new_status()))?;

        if let DepositAction::Reject { reason, .. } = &action {
            info!(
                request_id = %id,
                reference = %updated.reference_number,
                admin_id = %admin_id,
                reason = %reason,
                "Deposit rejected"
            );
        }
        Ok(updated)
    }

    /// Reads a deposit by id, optionally restricted to its owner.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent or owned by someone else.
    pub async fn get(&self, id: RequestId, owner: Option<UserId>) -> RequestResult<Deposit> {
        fetch(&*self.store, &self.settings.retry, Lookup::Id(id), owner).await
    }

    /// Reads a deposit by reference number, optionally restricted to its owner.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent or owned by someone else.
    pub async fn get_by_reference(
        &self,
        reference: &str,
        owner: Option<UserId>,
    ) -> RequestResult<Deposit> {
        fetch(&*self.store, &self.settings.retry, Lookup::Reference(reference), owner).await
    }

    /// Lists a user's deposits, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> RequestResult<PageResponse<Deposit>> {
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

    /// Deposits awaiting review, oldest first, with each account's balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn pending_queue(
        &self,
        page: PageRequest,
    ) -> RequestResult<PageResponse<PendingReview<Deposit>>> {
        let filter = RequestFilter::with_statuses(TransactionStatus::REVIEWABLE);
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

        let ids: Vec<_> = rows.iter().map(|d| d.account_id).collect();
        let balances: HashMap<_, _> = retry_read(retry, "find_accounts", || self.store.find_accounts(&ids))
            .await?
            .into_iter()
            .map(|account| (account.id, account.balance))
            .collect();

        let entries = rows
            .into_iter()
            .map(|deposit| PendingReview {
                account_balance: balances.get(&deposit.account_id).copied(),
                request: deposit,
            })
            .collect();
        Ok(PageResponse::new(entries, page, total))
    }
}
