//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems in dependency order
//! - Start the poller task
//! - Bind the listener and serve until a signal arrives

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::broadcast::Hub;
use crate::config::AppConfig;
use crate::http::HttpServer;
use crate::lifecycle::signals::wait_for_signal;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::poller::Poller;
use crate::storage::{self, StoreError};
use crate::weather::{WeatherClient, WeatherError};

/// Fatal startup failures.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("storage unavailable: {0}")]
    Store(#[from] StoreError),

    #[error("weather client: {0}")]
    Weather(#[from] WeatherError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Run the relay until SIGINT/SIGTERM.
pub async fn run(config: AppConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    if config.weather.api_key().is_none() {
        tracing::warn!("No API key configured; every poll cycle will fail until one is set");
    }

    let store = storage::open(&config.storage).await?;
    let hub = Arc::new(Hub::new(&config.broadcast));
    let shutdown = Shutdown::new();

    let client = WeatherClient::new(config.weather.clone())?;
    let poller = Poller::new(
        client,
        store.clone(),
        hub.clone(),
        Duration::from_secs(config.weather.poll_interval_secs),
    );
    let poller_task = tokio::spawn(poller.run(shutdown.subscribe()));

    let listener = TcpListener::bind(&config.server.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.server.bind_address.clone(),
            source,
        })?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(&config, store, hub, shutdown.clone());

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        let notified = signal_shutdown.trigger();
        tracing::info!(tasks = notified, "Shutdown signal delivered");
    });

    server.run(listener).await?;

    let remaining = shutdown.trigger();
    tracing::debug!(tasks = remaining, "Waiting for poller to stop");
    if let Err(e) = poller_task.await {
        tracing::error!(error = %e, "Poller task panicked");
    }

    Ok(())
}
