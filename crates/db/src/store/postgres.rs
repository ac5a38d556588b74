//! PostgreSQL store adapter on `SeaORM`.
//!
//! Status changes are `UPDATE ... WHERE id = $1 AND status IN (...)
//! RETURNING *`; balance changes are `UPDATE accounts SET balance = balance
//! + $delta WHERE id = $1 AND balance >= -$delta`. Neither reads a value
//! back into the application before writing it.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};

use fundflow_core::account::Account;
use fundflow_core::request::{Deposit, TransactionRequest, Withdrawal};
use fundflow_shared::types::{AccountId, RequestId, UserId};

use super::{AccountStore, Lookup, RequestFilter, RequestStore, SortOrder, StoreError, Window};
use crate::entities::{accounts, deposits, withdrawals};

/// Store adapter backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgStore {
    db: DatabaseConnection,
}

impl PgStore {
    /// Creates a store over an open connection pool.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn status_strings<S: ToString>(statuses: &[S]) -> Vec<String> {
    statuses.iter().map(ToString::to_string).collect()
}

/// Applies the row window, skipping `LIMIT` for unbounded reads.
fn windowed<E: EntityTrait>(query: Select<E>, window: Window) -> Select<E> {
    let query = query.offset(window.offset);
    if window.limit == u64::MAX {
        query
    } else {
        query.limit(window.limit)
    }
}

/// Adds `delta` to the balance if the result stays non-negative.
async fn increment_balance<C: ConnectionTrait>(
    conn: &C,
    account_id: AccountId,
    delta: Decimal,
) -> Result<Decimal, StoreError> {
    let updated = accounts::Entity::update_many()
        .col_expr(
            accounts::Column::Balance,
            Expr::col(accounts::Column::Balance).add(delta),
        )
        .col_expr(accounts::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(accounts::Column::Id.eq(account_id.into_inner()))
        .filter(accounts::Column::Balance.gte(-delta))
        .exec_with_returning(conn)
        .await?;

    if let Some(account) = updated.into_iter().next() {
        return Ok(account.balance);
    }

    match accounts::Entity::find_by_id(account_id.into_inner())
        .one(conn)
        .await?
    {
        Some(account) => Err(StoreError::InsufficientFunds {
            available: account.balance,
            requested: -delta,
        }),
        None => Err(StoreError::NotFound("Account")),
    }
}

macro_rules! pg_request_store {
    ($record:ty, $entity:ident, $what:literal, $query:ident, $update:ident) => {
        fn $query(filter: &RequestFilter<<$record as TransactionRequest>::Status>) -> Select<$entity::Entity> {
            let mut query = $entity::Entity::find();
            if let Some(user_id) = filter.user_id {
                query = query.filter($entity::Column::UserId.eq(user_id.into_inner()));
            }
            if let Some(account_id) = filter.account_id {
                query = query.filter($entity::Column::AccountId.eq(account_id.into_inner()));
            }
            if !filter.statuses.is_empty() {
                query = query.filter($entity::Column::Status.is_in(status_strings(&filter.statuses)));
            }
            if let Some(since) = filter.processed_since {
                query = query.filter($entity::Column::ProcessedAt.gte(since));
            }
            query
        }

        /// Runs the conditional update, reporting why nothing matched.
        async fn $update<C: ConnectionTrait>(
            conn: &C,
            id: RequestId,
            expected: &[<$record as TransactionRequest>::Status],
            action: &<$record as TransactionRequest>::Action,
        ) -> Result<$record, StoreError> {
            let mut update = $entity::Entity::update_many();
            for (column, value) in $entity::action_columns(action) {
                update = update.col_expr(column, value);
            }
            let updated = update
                .filter($entity::Column::Id.eq(id.into_inner()))
                .filter($entity::Column::Status.is_in(status_strings(expected)))
                .exec_with_returning(conn)
                .await?;

            if let Some(model) = updated.into_iter().next() {
                return <$record>::try_from(model);
            }

            match $entity::Entity::find_by_id(id.into_inner()).one(conn).await? {
                Some(model) => Err(StoreError::Conflict {
                    current: model.status,
                }),
                None => Err(StoreError::NotFound($what)),
            }
        }

        #[async_trait]
        impl RequestStore<$record> for PgStore {
            async fn insert(&self, record: &$record) -> Result<(), StoreError> {
                $entity::active_model(record).insert(&self.db).await?;
                Ok(())
            }

            async fn select_one(&self, lookup: Lookup<'_>) -> Result<Option<$record>, StoreError> {
                let query = match lookup {
                    Lookup::Id(id) => $entity::Entity::find_by_id(id.into_inner()),
                    Lookup::Reference(reference) => $entity::Entity::find()
                        .filter($entity::Column::ReferenceNumber.eq(reference)),
                    Lookup::IdempotencyKey { user_id, key } => $entity::Entity::find()
                        .filter($entity::Column::UserId.eq(user_id.into_inner()))
                        .filter($entity::Column::IdempotencyKey.eq(key)),
                };
                query.one(&self.db).await?.map(<$record>::try_from).transpose()
            }

            async fn select_many(
                &self,
                filter: &RequestFilter<<$record as TransactionRequest>::Status>,
                order: SortOrder,
                window: Window,
            ) -> Result<Vec<$record>, StoreError> {
                let query = match order {
                    SortOrder::NewestFirst => $query(filter)
                        .order_by_desc($entity::Column::CreatedAt)
                        .order_by_desc($entity::Column::Id),
                    SortOrder::OldestFirst => $query(filter)
                        .order_by_asc($entity::Column::CreatedAt)
                        .order_by_asc($entity::Column::Id),
                };
                windowed(query, window)
                    .all(&self.db)
                    .await?
                    .into_iter()
                    .map(<$record>::try_from)
                    .collect()
            }

            async fn count(
                &self,
                filter: &RequestFilter<<$record as TransactionRequest>::Status>,
            ) -> Result<u64, StoreError> {
                Ok($query(filter).count(&self.db).await?)
            }

            async fn update_where(
                &self,
                id: RequestId,
                expected: &[<$record as TransactionRequest>::Status],
                action: &<$record as TransactionRequest>::Action,
            ) -> Result<$record, StoreError> {
                $update(&self.db, id, expected, action).await
            }

            async fn update_with_balance(
                &self,
                id: RequestId,
                expected: &[<$record as TransactionRequest>::Status],
                action: &<$record as TransactionRequest>::Action,
                account_id: AccountId,
                delta: Decimal,
            ) -> Result<($record, Decimal), StoreError> {
                // Dropping the transaction on an early return rolls it back.
                let txn = self.db.begin().await?;
                let record = $update(&txn, id, expected, action).await?;
                let balance = increment_balance(&txn, account_id, delta).await?;
                txn.commit().await?;
                Ok((record, balance))
            }
        }
    };
}

pg_request_store!(Deposit, deposits, "Deposit", deposit_query, update_deposit);
pg_request_store!(Withdrawal, withdrawals, "Withdrawal", withdrawal_query, update_withdrawal);

#[async_trait]
impl AccountStore for PgStore {
    async fn find_account(
        &self,
        account_id: AccountId,
        user_id: UserId,
    ) -> Result<Option<Account>, StoreError> {
        let account = accounts::Entity::find_by_id(account_id.into_inner())
            .filter(accounts::Column::UserId.eq(user_id.into_inner()))
            .one(&self.db)
            .await?;
        Ok(account.map(Account::from))
    }

    async fn find_accounts(&self, ids: &[AccountId]) -> Result<Vec<Account>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let accounts = accounts::Entity::find()
            .filter(accounts::Column::Id.is_in(ids.iter().map(|id| id.into_inner())))
            .all(&self.db)
            .await?;
        Ok(accounts.into_iter().map(Account::from).collect())
    }

    async fn atomic_increment_balance(
        &self,
        account_id: AccountId,
        delta: Decimal,
    ) -> Result<Decimal, StoreError> {
        increment_balance(&self.db, account_id, delta).await
    }

    async fn open_account(&self, account: &Account) -> Result<(), StoreError> {
        let now = Utc::now();
        accounts::ActiveModel {
            id: Set(account.id.into_inner()),
            user_id: Set(account.user_id.into_inner()),
            balance: Set(account.balance),
            created_at: Set(now.into()),
            updated_at: Set(account.updated_at.into()),
        }
        .insert(&self.db)
        .await?;
        Ok(())
    }
}
