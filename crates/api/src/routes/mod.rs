//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod accounts;
pub mod admin;
pub mod deposits;
pub mod health;
pub mod withdrawals;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(accounts::routes())
        .merge(deposits::routes())
        .merge(withdrawals::routes())
        .merge(admin::routes())
}
