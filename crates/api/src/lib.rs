//! HTTP API layer with Axum routes and extractors.
//!
//! This crate provides:
//! - REST routes for deposits, withdrawals, admin review and statistics
//! - Identity extractors for gateway-provided headers
//! - Mapping of lifecycle results onto HTTP responses

pub mod middleware;
pub mod response;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use fundflow_db::{
    AccountRepository, DepositRepository, LifecycleSettings, LifecycleStore,
    StatisticsRepository, WithdrawalRepository,
};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Account repository.
    pub accounts: AccountRepository<dyn LifecycleStore>,
    /// Deposit repository.
    pub deposits: DepositRepository<dyn LifecycleStore>,
    /// Withdrawal repository.
    pub withdrawals: WithdrawalRepository<dyn LifecycleStore>,
    /// Dashboard statistics.
    pub statistics: StatisticsRepository<dyn LifecycleStore>,
}

impl AppState {
    /// Wires every repository to the same store.
    #[must_use]
    pub fn new(store: Arc<dyn LifecycleStore>, settings: &LifecycleSettings) -> Self {
        Self {
            accounts: AccountRepository::new(Arc::clone(&store), settings.retry.clone()),
            deposits: DepositRepository::new(Arc::clone(&store), settings.clone()),
            withdrawals: WithdrawalRepository::new(Arc::clone(&store), settings.clone()),
            statistics: StatisticsRepository::new(store, settings.clone()),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
