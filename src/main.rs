mod api;
mod app;
mod config;
mod db;
mod domain;
mod error;
mod logging;
mod middleware;
mod routes;
mod services;

use anyhow::Result;
use std::sync::Arc;

use config::StoreBackend;
use services::{BlobStore, MemoryStore, RecordStore, RedisStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = config::Settings::from_env()?;

    // Initialize logging
    logging::init_logging(&settings.env);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        store = ?settings.store_backend,
        "Starting Ammar back-office backend"
    );

    // Create database pool and bring the schema up to date
    let pool = db::create_pool(&settings).await?;
    db::run_migrations(&pool).await?;

    // Create the record store for orders and recipients
    let store: Arc<dyn BlobStore> = match settings.store_backend {
        StoreBackend::Redis => {
            let store = RedisStore::new(&settings.redis_url).await?;
            tracing::info!("Redis record store initialized");
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory record store - orders are lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    // Create application state
    let state = app::AppState::new(pool, settings.clone(), RecordStore::new(store));

    // Build application
    let app = app::create_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
