//! Integration Vault - Main Application Entry Point
//!
//! REST API server for registering and managing third-party provider credentials.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries), or an in-memory store
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create the integration store (database pool + migrations for postgres)
//! 3. Build HTTP router with routes and middleware
//! 4. Start server on configured port

use std::sync::Arc;

use anyhow::Context;
use integration_vault::{
    config::{Config, StoreBackend},
    db, handlers,
    services::{
        integration_store::{PgIntegrationStore, SharedStore},
        memory_store::MemoryIntegrationStore,
    },
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    tracing::info!(backend = ?config.store_backend, "Configuration loaded");

    let store = build_store(&config).await?;

    let mut app = handlers::router(store).layer(TraceLayer::new_for_http());
    if config.cors_allow_any_origin {
        app = app.layer(CorsLayer::permissive());
    }

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_store(config: &Config) -> anyhow::Result<SharedStore> {
    match config.store_backend {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres store backend")?;

            let pool = db::create_pool(database_url, config.database_max_connections).await?;
            tracing::info!("Database pool created");

            db::run_migrations(&pool).await?;
            tracing::info!("Database migrations complete");

            Ok(Arc::new(PgIntegrationStore::new(pool)))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; integrations are lost on restart");
            Ok(Arc::new(MemoryIntegrationStore::new()))
        }
    }
}
