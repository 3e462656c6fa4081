//! # Todoback API Server
//!
//! REST backend for users, tasks, todos and teams.
//!
//! ## Startup
//!
//! 1. Load configuration from `configs/app.env`, `.env` and the environment
//! 2. Create the database if needed, open the pool and apply migrations
//! 3. Serve the router until Ctrl+C, then drain connections and close the pool
//!
//! ## Usage
//!
//! ```bash
//! SECRET=$(openssl rand -hex 32) cargo run -p todoback-api
//! ```

use anyhow::Context;
use todoback_api::{
    app::{build_router, AppState},
    config::Config,
};
use todoback_shared::db::{
    migrations::{ensure_database_exists, run_migrations},
    pool::{close_pool, create_pool},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "todoback_api=debug,todoback_shared=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Todoback API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env().context("failed to load configuration")?;

    let database_url = config.database.url();
    ensure_database_exists(&database_url)
        .await
        .context("failed to create database")?;

    let pool = create_pool(config.database.pool_config())
        .await
        .context("failed to connect to database")?;

    if config.database.run_migrations {
        run_migrations(&pool).await.context("failed to run migrations")?;
    } else {
        tracing::info!("Skipping migrations (RUN_MIGRATIONS=false)");
    }

    let bind_address = config.bind_address();
    let app = build_router(AppState::new(pool.clone(), config));

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {}", bind_address))?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(pool).await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Resolves on Ctrl+C; never resolves if the handler cannot be installed
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
