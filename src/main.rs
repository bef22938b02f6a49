//! Blog Service - Main Application Entry Point
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Open the store (PostgreSQL pool + migrations, or in-memory)
//! 3. Create the bootstrap admin if configured
//! 4. Build HTTP router with routes and middleware
//! 5. Start server on configured port

use std::sync::Arc;

use rust_blog_web_server::{
    bootstrap,
    config::Config,
    db, routes,
    state::AppState,
    store::{DynStore, memory::MemoryStore, postgres::PgStore},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG, defaults to "info"
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    let store: DynStore = match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url, config.db_max_connections).await?;
            tracing::info!("Database pool created");

            db::run_migrations(&pool).await?;
            tracing::info!("Database migrations complete");

            Arc::new(PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::from_config(&config, store);

    if let Some((email, password)) = config.admin_credentials() {
        bootstrap::ensure_admin(&state, &config.admin_name, email, password).await?;
    }

    let app = routes::router(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
