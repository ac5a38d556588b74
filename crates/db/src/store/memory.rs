//! In-process store adapter.
//!
//! All state sits behind one `RwLock`, so a conditional update and its
//! balance increment run under a single write guard.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use fundflow_core::account::Account;
use fundflow_core::request::{Deposit, TransactionRequest, Withdrawal};
use fundflow_shared::types::{AccountId, RequestId, UserId};

use super::{AccountStore, Lookup, RequestFilter, RequestStore, SortOrder, StoreError, Window};

#[derive(Debug, Default)]
struct State {
    deposits: HashMap<RequestId, Deposit>,
    withdrawals: HashMap<RequestId, Withdrawal>,
    accounts: HashMap<AccountId, Account>,
}

/// Store adapter keeping everything in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
    read_failures: AtomicU32,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` reads fail with `StoreError::Unavailable`.
    pub fn inject_read_failures(&self, count: u32) {
        self.read_failures.store(count, Ordering::SeqCst);
    }

    fn check_read(&self) -> Result<(), StoreError> {
        let injected = self
            .read_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        match injected {
            Ok(_) => Err(StoreError::Unavailable("injected read failure".to_string())),
            Err(_) => Ok(()),
        }
    }
}

fn insert_into<R: TransactionRequest>(
    table: &mut HashMap<RequestId, R>,
    record: &R,
) -> Result<(), StoreError> {
    for existing in table.values() {
        if existing.reference_number() == record.reference_number() {
            return Err(StoreError::DuplicateReference);
        }
        if existing.user_id() == record.user_id()
            && record.idempotency_key().is_some()
            && existing.idempotency_key() == record.idempotency_key()
        {
            return Err(StoreError::DuplicateIdempotencyKey);
        }
    }
    table.insert(record.id(), record.clone());
    Ok(())
}

fn select_from<R: TransactionRequest>(
    table: &HashMap<RequestId, R>,
    filter: &RequestFilter<R::Status>,
    order: SortOrder,
    window: Window,
) -> Vec<R> {
    let mut rows: Vec<&R> = table.values().filter(|r| filter.matches(*r)).collect();
    rows.sort_by_key(|r| (r.created_at(), r.id().into_inner()));
    if order == SortOrder::NewestFirst {
        rows.reverse();
    }
    rows.into_iter()
        .skip(usize::try_from(window.offset).unwrap_or(usize::MAX))
        .take(usize::try_from(window.limit).unwrap_or(usize::MAX))
        .cloned()
        .collect()
}

fn conditional_apply<R: TransactionRequest>(
    table: &mut HashMap<RequestId, R>,
    id: RequestId,
    expected: &[R::Status],
    action: &R::Action,
    what: &'static str,
) -> Result<R, StoreError> {
    let record = table.get_mut(&id).ok_or(StoreError::NotFound(what))?;
    if !expected.contains(&record.status()) {
        return Err(StoreError::Conflict {
            current: record.status().to_string(),
        });
    }
    record.apply(action);
    Ok(record.clone())
}

fn check_conditional<R: TransactionRequest>(
    table: &HashMap<RequestId, R>,
    id: RequestId,
    expected: &[R::Status],
    what: &'static str,
) -> Result<(), StoreError> {
    let record = table.get(&id).ok_or(StoreError::NotFound(what))?;
    if expected.contains(&record.status()) {
        Ok(())
    } else {
        Err(StoreError::Conflict {
            current: record.status().to_string(),
        })
    }
}

fn increment(
    accounts: &mut HashMap<AccountId, Account>,
    account_id: AccountId,
    delta: Decimal,
) -> Result<Decimal, StoreError> {
    let account = accounts
        .get_mut(&account_id)
        .ok_or(StoreError::NotFound("Account"))?;
    let balance = next_balance(account, delta)?;
    account.balance = balance;
    account.updated_at = Utc::now();
    Ok(balance)
}

fn next_balance(account: &Account, delta: Decimal) -> Result<Decimal, StoreError> {
    let balance = account.balance + delta;
    if balance < Decimal::ZERO {
        return Err(StoreError::InsufficientFunds {
            available: account.balance,
            requested: -delta,
        });
    }
    Ok(balance)
}

macro_rules! memory_request_store {
    ($record:ty, $table:ident, $what:literal) => {
        #[async_trait]
        impl RequestStore<$record> for MemoryStore {
            async fn insert(&self, record: &$record) -> Result<(), StoreError> {
                let mut state = self.state.write().await;
                insert_into(&mut state.$table, record)
            }

            async fn select_one(&self, lookup: Lookup<'_>) -> Result<Option<$record>, StoreError> {
                self.check_read()?;
                let state = self.state.read().await;
                Ok(state.$table.values().find(|r| lookup.matches(*r)).cloned())
            }

            async fn select_many(
                &self,
                filter: &RequestFilter<<$record as TransactionRequest>::Status>,
                order: SortOrder,
                window: Window,
            ) -> Result<Vec<$record>, StoreError> {
                self.check_read()?;
                let state = self.state.read().await;
                Ok(select_from(&state.$table, filter, order, window))
            }

            async fn count(
                &self,
                filter: &RequestFilter<<$record as TransactionRequest>::Status>,
            ) -> Result<u64, StoreError> {
                self.check_read()?;
                let state = self.state.read().await;
                let count = state.$table.values().filter(|r| filter.matches(*r)).count();
                Ok(u64::try_from(count).unwrap_or(u64::MAX))
            }

            async fn update_where(
                &self,
                id: RequestId,
                expected: &[<$record as TransactionRequest>::Status],
                action: &<$record as TransactionRequest>::Action,
            ) -> Result<$record, StoreError> {
                let mut state = self.state.write().await;
                conditional_apply(&mut state.$table, id, expected, action, $what)
            }

            async fn update_with_balance(
                &self,
                id: RequestId,
                expected: &[<$record as TransactionRequest>::Status],
                action: &<$record as TransactionRequest>::Action,
                account_id: AccountId,
                delta: Decimal,
            ) -> Result<($record, Decimal), StoreError> {
                let mut state = self.state.write().await;
                // Check both halves before touching either.
                check_conditional(&state.$table, id, expected, $what)?;
                let account = state
                    .accounts
                    .get(&account_id)
                    .ok_or(StoreError::NotFound("Account"))?;
                next_balance(account, delta)?;

                let balance = increment(&mut state.accounts, account_id, delta)?;
                let record = conditional_apply(&mut state.$table, id, expected, action, $what)?;
                Ok((record, balance))
            }
        }
    };
}

memory_request_store!(Deposit, deposits, "Deposit");
memory_request_store!(Withdrawal, withdrawals, "Withdrawal");

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_account(
        &self,
        account_id: AccountId,
        user_id: UserId,
    ) -> Result<Option<Account>, StoreError> {
        self.check_read()?;
        let state = self.state.read().await;
        Ok(state
            .accounts
            .get(&account_id)
            .filter(|account| account.user_id == user_id)
            .cloned())
    }

    async fn find_accounts(&self, ids: &[AccountId]) -> Result<Vec<Account>, StoreError> {
        self.check_read()?;
        let state = self.state.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.accounts.get(id).cloned())
            .collect())
    }

    async fn atomic_increment_balance(
        &self,
        account_id: AccountId,
        delta: Decimal,
    ) -> Result<Decimal, StoreError> {
        let mut state = self.state.write().await;
        increment(&mut state.accounts, account_id, delta)
    }

    async fn open_account(&self, account: &Account) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.accounts.insert(account.id, account.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fundflow_core::request::types::{AdminApprovalStatus, WithdrawalMethod};
    use fundflow_core::request::{NewWithdrawal, PayoutDetails};
    use fundflow_core::workflow::WithdrawalWorkflow;
    use rust_decimal_macros::dec;

    async fn funded(store: &MemoryStore, balance: Decimal) -> Account {
        let account = Account {
            id: AccountId::new(),
            user_id: UserId::new(),
            balance,
            updated_at: Utc::now(),
        };
        store.open_account(&account).await.unwrap();
        account
    }

    fn withdrawal(account: &Account, amount: Decimal, reference: &str) -> Withdrawal {
        Withdrawal::from_submission(
            NewWithdrawal {
                user_id: account.user_id,
                account_id: account.id,
                amount,
                method: WithdrawalMethod::Paypal,
                details: PayoutDetails::default(),
                notes: None,
                idempotency_key: None,
            },
            reference.to_string(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_increment_refuses_negative_balance() {
        let store = MemoryStore::new();
        let account = funded(&store, dec!(100)).await;

        assert_eq!(
            store.atomic_increment_balance(account.id, dec!(-40)).await,
            Ok(dec!(60))
        );
        assert_eq!(
            store.atomic_increment_balance(account.id, dec!(-60.01)).await,
            Err(StoreError::InsufficientFunds {
                available: dec!(60),
                requested: dec!(60.01),
            })
        );
    }

    #[tokio::test]
    async fn test_duplicate_reference_rejected() {
        let store = MemoryStore::new();
        let account = funded(&store, dec!(100)).await;
        store.insert(&withdrawal(&account, dec!(1), "WTH-1")).await.unwrap();
        assert_eq!(
            store.insert(&withdrawal(&account, dec!(2), "WTH-1")).await,
            Err(StoreError::DuplicateReference)
        );
    }

    #[tokio::test]
    async fn test_update_with_balance_rolls_back_on_insufficient_funds() {
        let store = MemoryStore::new();
        let account = funded(&store, dec!(50)).await;
        let w = withdrawal(&account, dec!(80), "WTH-2");
        store.insert(&w).await.unwrap();

        let action = WithdrawalWorkflow::approve(&w, UserId::new(), None, None).unwrap();
        let result: Result<(Withdrawal, Decimal), _> = store
            .update_with_balance(w.id, AdminApprovalStatus::REVIEWABLE, &action, account.id, dec!(-80))
            .await;
        assert!(matches!(result, Err(StoreError::InsufficientFunds { .. })));

        let stored: Withdrawal = store.select_one(Lookup::Id(w.id)).await.unwrap().unwrap();
        assert_eq!(stored.status, AdminApprovalStatus::PendingReview);
        let account = store.find_account(account.id, account.user_id).await.unwrap().unwrap();
        assert_eq!(account.balance, dec!(50));
    }

    #[tokio::test]
    async fn test_injected_read_failures() {
        let store = MemoryStore::new();
        store.inject_read_failures(1);
        let first: Result<Option<Withdrawal>, _> = store.select_one(Lookup::Reference("x")).await;
        assert!(matches!(first, Err(StoreError::Unavailable(_))));
        let second: Result<Option<Withdrawal>, _> = store.select_one(Lookup::Reference("x")).await;
        assert_eq!(second, Ok(None));
    }

    #[tokio::test]
    async fn test_find_account_checks_owner() {
        let store = MemoryStore::new();
        let account = funded(&store, dec!(1)).await;
        assert!(store.find_account(account.id, UserId::new()).await.unwrap().is_none());
        assert!(store.find_account(account.id, account.user_id).await.unwrap().is_some());
    }
}
