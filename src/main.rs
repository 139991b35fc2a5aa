//! CourtHub Server: pooled venue booking engine.
//!
//! Main entry point that loads configuration, prepares the database, and
//! starts the HTTP server.

use tracing_subscriber::{EnvFilter, fmt};

use courthub_core::config::AppConfig;
use courthub_core::error::AppError;
use courthub_database::DatabasePool;
use courthub_database::migration::run_migrations;

#[tokio::main]
async fn main() {
    let env = std::env::var("COURTHUB_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Connect, migrate, and serve until shutdown
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting CourtHub v{}", env!("CARGO_PKG_VERSION"));

    let db_pool = DatabasePool::connect(&config.database).await?;
    run_migrations(db_pool.pool()).await?;

    let result = courthub_api::run_server(config, db_pool.clone()).await;
    db_pool.close().await;
    result
}
