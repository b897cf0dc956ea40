//! Weather relay (v1)
//!
//! Polls the OpenWeatherMap current-weather endpoint on a fixed interval,
//! persists every observation and pushes it to WebSocket subscribers.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────────────────── weather-relay ─────────────────────────────┐
//!   │                                                                          │
//!   │   ┌────────┐ tick ┌─────────┐  GET   ┌────────────────┐                  │
//!   │   │ timer  │─────▶│ poller  │───────▶│ weather client │──────────────────┼──▶ OpenWeatherMap
//!   │   └────────┘      └────┬────┘        └────────────────┘                  │
//!   │                        │ Observation                                     │
//!   │              ┌─────────┴─────────┐                                       │
//!   │              ▼                   ▼                                       │
//!   │        ┌──────────┐        ┌──────────┐   frames   ┌──────────────┐      │
//!   │        │ storage  │        │   hub    │───────────▶│  /ws session │──────┼──▶ Clients
//!   │        │ pg / mem │        └──────────┘            └──────────────┘      │
//!   │        └────┬─────┘                                                      │
//!   │             ▼                                                            │
//!   │   ┌──────────────────────────────────────────┐                           │
//!   │   │ http: /api/health, /api/weather/latest,  │◀──────────────────────────┼─── Clients
//!   │   │       /api/weather/history               │                           │
//!   │   └──────────────────────────────────────────┘                           │
//!   └──────────────────────────────────────────────────────────────────────────┘
//! ```

use clap::Parser;

use weather_relay::config::{self, Args};
use weather_relay::lifecycle::startup;
use weather_relay::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let config = config::resolve(&args)?;

    logging::init(&config.observability.log_level);

    tracing::info!("weather-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.server.bind_address,
        storage = ?config.storage.backend,
        poll_interval_secs = config.weather.poll_interval_secs,
        lat = config.weather.latitude,
        lon = config.weather.longitude,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
