//! Database migration runner for Fundflow.
//!
//! Usage:
//!   migrator up      - Create the accounts, deposits and withdrawals tables
//!   migrator down    - Drop them again
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop everything and re-run migrations
//!
//! The connection string comes from `DATABASE_URL`.

use sea_orm_migration::prelude::*;
use fundflow_db::migration::Migrator;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // The CLI sets up its own tracing
    cli::run_cli(Migrator).await;
}
