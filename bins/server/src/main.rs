//! Fundflow API Server
//!
//! Main entry point for the deposit and withdrawal service.

use std::sync::Arc;

use anyhow::Context;
use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fundflow_api::{AppState, create_router};
use fundflow_db::migration::Migrator;
use fundflow_db::{LifecycleSettings, LifecycleStore, PgStore, connect_with};
use fundflow_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fundflow=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect_with(&config.database).await?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    Migrator::up(&db, None).await?;
    info!("Migrations applied");

    let settings = LifecycleSettings::from(&config);
    info!(
        timezone = %settings.statistics.timezone,
        max_amount = %settings.limits.max_amount,
        "Lifecycle settings loaded"
    );

    let store: Arc<dyn LifecycleStore> = Arc::new(PgStore::new(db));
    let app = create_router(AppState::new(store, &settings));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
