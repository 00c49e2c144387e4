//! Adinsight worker
//!
//! HTTP front end for the ad insight rollup. Queue deliveries posted to
//! `/api/v1/events` are rolled up and published as in-app notifications;
//! `/api/v1/insights` returns the rollup directly.
//!
//! # Example
//!
//! ```no_run
//! use worker::run_server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     run_server().await
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod config;
pub mod db;
mod routes;
mod state;

pub use config::{Config, SourceBackend};
pub use routes::{ErrorResponse, EventResponse};
pub use state::AppState;

use anyhow::{Context, Result};
use axum::Router;
use shared::notify::{InMemoryNotificationSink, NotificationSink, SqsNotificationSink};
use shared::storage::{ClickHouseInsightSource, InMemoryInsightSource, InsightSource};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Runs the insight worker.
///
/// Loads configuration from environment variables and serves until
/// SIGTERM/SIGINT.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded from environment
/// - A configured backend cannot be reached
/// - The server fails to bind to the configured address
pub async fn run_server() -> Result<()> {
    let config = Config::from_env()?;
    run_server_with_config(config).await
}

/// Runs the insight worker with the provided configuration.
///
/// # Errors
///
/// Returns an error if:
/// - A configured backend cannot be reached
/// - The server fails to bind to the configured address
/// - A fatal error occurs during operation
pub async fn run_server_with_config(config: Config) -> Result<()> {
    let addr = config.socket_addr()?;

    tracing::info!(
        host = %config.host,
        port = %config.port,
        source = ?config.source,
        platform = %config.insight.platform,
        "Adinsight worker starting"
    );

    let state = build_state(&config).await?;
    let app = create_router(state);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(%addr, "Listening for connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Builds the application state for the configured backends.
///
/// # Errors
///
/// Returns an error if `ClickHouse` is selected and does not answer, or the
/// notification queue cannot be configured.
pub async fn build_state(config: &Config) -> Result<AppState> {
    let source: Arc<dyn InsightSource> = match config.source {
        SourceBackend::Memory => {
            tracing::warn!("Using in-memory insight source, no records are loaded");
            InMemoryInsightSource::new_shared()
        }
        SourceBackend::ClickHouse => {
            let db_config = db::DatabaseConfig::from_env();
            let database = db::Database::connect(&db_config).await?;
            tracing::info!(url = %db_config.url, database = %db_config.database, "Connected to ClickHouse");
            ClickHouseInsightSource::new_shared(database.client())
        }
    };

    let sink: Arc<dyn NotificationSink> = match &config.notification_queue_url {
        Some(queue_url) => {
            let sink = SqsNotificationSink::from_env(queue_url.as_str())
                .await
                .context("Can not configure notification queue")?;
            tracing::info!(queue_url = %sink.queue_url(), "Publishing notifications to SQS");
            Arc::new(sink)
        }
        None => {
            tracing::warn!(
                "ADINSIGHT_NOTIFICATION_QUEUE_URL is not set, notifications are kept in memory"
            );
            InMemoryNotificationSink::new_shared()
        }
    };

    Ok(AppState::new(source, sink, config.insight.clone()))
}

/// Creates the main application router with all routes and middleware.
///
/// This function is public to allow testing the router without starting a full server.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health_routes(state.clone()))
        .merge(routes::events_routes(state.clone()))
        .merge(routes::insights_routes(state))
        .layer(TraceLayer::new_for_http())
}

/// Waits for a shutdown signal (SIGTERM or SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
