//! Application builder: wires router, middleware, and state into an Axum
//! app, and runs the server with the background scheduler.

use std::sync::Arc;

use axum::Router;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;

use courthub_core::config::AppConfig;
use courthub_core::error::AppError;
use courthub_database::{DatabasePool, PgStore};
use courthub_worker::{CronScheduler, LockExpirySweep};

use crate::middleware::compression::build_compression_layer;
use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    build_router(state)
        .layer(build_compression_layer())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Runs the CourtHub server against PostgreSQL until Ctrl+C.
pub async fn run_server(config: AppConfig, db_pool: DatabasePool) -> Result<(), AppError> {
    tracing::info!("Starting CourtHub server...");

    let store = Arc::new(PgStore::new(db_pool.pool().clone()));
    let state = AppState::new(config.clone(), store.clone(), store)?.with_db_pool(db_pool);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let worker_handle = if config.worker.enabled {
        let sweep = Arc::new(LockExpirySweep::new(
            Arc::clone(&state.store),
            state.events.clone(),
        ));
        let scheduler = CronScheduler::new(sweep, config.worker.clone()).await?;
        Some(tokio::spawn(scheduler.run(shutdown_rx)))
    } else {
        tracing::info!("Background worker disabled");
        None
    };

    let app = build_app(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(address = %addr, "CourtHub server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(handle) = worker_handle {
        match handle.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!(error = %e, "Scheduler stopped with error"),
            Err(e) => tracing::error!(error = %e, "Scheduler task panicked"),
        }
    }

    tracing::info!("CourtHub server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C, shutting down");
    }
    tracing::info!("Shutdown signal received");
}
