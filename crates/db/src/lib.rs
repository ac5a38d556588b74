//! Persistence layer for Fundflow.
//!
//! This crate provides:
//! - Store ports and their in-memory and PostgreSQL adapters
//! - `SeaORM` entity definitions
//! - Lifecycle repositories that orchestrate validation, workflow and storage
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;
pub mod store;

pub use repositories::{
    AccountRepository, DepositRepository, LifecycleSettings, PendingReview, Settled,
    StatisticsRepository, Submitted, WithdrawalRepository,
};
pub use store::{AccountStore, LifecycleStore, MemoryStore, PgStore, RequestStore, StoreError};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

use fundflow_shared::config::DatabaseConfig;

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Establishes a pooled connection using the configured pool bounds.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(false);
    Database::connect(options).await
}
