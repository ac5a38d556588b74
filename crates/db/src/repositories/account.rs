//! Account repository: opening accounts and reading balances.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;

use fundflow_core::account::Account;
use fundflow_core::{RequestError, RequestResult};
use fundflow_shared::RetryConfig;
use fundflow_shared::types::{AccountId, UserId};

use crate::store::AccountStore;
use crate::store::retry::retry_read;

/// Account repository over any account store.
pub struct AccountRepository<S: ?Sized> {
    store: Arc<S>,
    retry: RetryConfig,
}

impl<S: ?Sized> Clone for AccountRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            retry: self.retry.clone(),
        }
    }
}

impl<S: AccountStore + ?Sized> AccountRepository<S> {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(store: Arc<S>, retry: RetryConfig) -> Self {
        Self { store, retry }
    }

    /// Opens an empty account for `user_id`.
    ///
    /// Accounts always start at zero; funds arrive only through approved
    /// deposits.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the store fails.
    pub async fn open(&self, user_id: UserId) -> RequestResult<Account> {
        let account = Account {
            id: AccountId::new(),
            user_id,
            balance: Decimal::ZERO,
            updated_at: Utc::now(),
        };
        self.store.open_account(&account).await?;
        info!(account_id = %account.id, user_id = %user_id, "Account opened");
        Ok(account)
    }

    /// Reads an account owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account is absent or owned by someone else.
    pub async fn get(&self, account_id: AccountId, user_id: UserId) -> RequestResult<Account> {
        retry_read(&self.retry, "find_account", || {
            self.store.find_account(account_id, user_id)
        })
        .await?
        .ok_or_else(|| RequestError::NotFound("Account".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use fundflow_core::ErrorKind;

    fn repo() -> AccountRepository<MemoryStore> {
        AccountRepository::new(Arc::new(MemoryStore::new()), RetryConfig::default())
    }

    #[tokio::test]
    async fn test_open_starts_empty() {
        let repo = repo();
        let user = UserId::new();
        let account = repo.open(user).await.unwrap();

        let read = repo.get(account.id, user).await.unwrap();
        assert_eq!(read.balance, Decimal::ZERO);
        assert_eq!(read.user_id, user);
    }

    #[tokio::test]
    async fn test_other_users_account_is_not_found() {
        let repo = repo();
        let account = repo.open(UserId::new()).await.unwrap();

        let err = repo.get(account.id, UserId::new()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
