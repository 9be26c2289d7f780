use std::{sync::Arc, time::Duration};

use anyhow::Result;
use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use filmes::{
    config::{ServerConfig, StorageBackend},
    repositories::{FilmeContext, FilmeRepository, InMemoryFilmeRepository, MIGRATOR},
    routes,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::load()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Filmes API");

    let filmes: Arc<dyn FilmeContext> = match config.storage {
        StorageBackend::Postgres => {
            // Initialize database connection pool
            let db_config = DatabaseConfig::from_env()?;
            let pool = init_pool(&db_config).await?;

            // Check database connectivity
            if health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }

            run_migrations(&pool, &MIGRATOR).await?;
            Arc::new(FilmeRepository::new(pool))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage, records will not survive a restart");
            Arc::new(InMemoryFilmeRepository::new())
        }
    };

    let app = routes::app(
        AppState::new(filmes),
        Duration::from_secs(config.request_timeout_secs),
    );

    let listener = TcpListener::bind(config.bind_address()).await?;
    info!("Filmes API listening on {}", config.bind_address());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Filmes API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
