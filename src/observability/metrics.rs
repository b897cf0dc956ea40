//! Metrics collection and exposition.
//!
//! # Metrics
//! - `weather_poll_total` (counter): poll cycles by outcome
//! - `weather_poll_duration_seconds` (histogram): fetch-store-publish latency
//! - `weather_broadcast_receivers` (gauge): clients reached by the last publish
//! - `weather_ws_clients` (gauge): connected WebSocket clients
//! - `weather_last_temperature` (gauge): last observed temperature, labelled
//!   with the configured `units` (`metric`, `imperial` or `standard`)

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Outcome label for a poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Success,
    FetchError,
    StoreError,
    EncodeError,
}

impl PollOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            PollOutcome::Success => "success",
            PollOutcome::FetchError => "fetch_error",
            PollOutcome::StoreError => "store_error",
            PollOutcome::EncodeError => "encode_error",
        }
    }
}

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_poll(outcome: PollOutcome, start: Instant) {
    metrics::counter!("weather_poll_total", "outcome" => outcome.as_str()).increment(1);
    metrics::histogram!("weather_poll_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_temperature(temperature: Option<f64>, units: &str) {
    if let Some(t) = temperature {
        metrics::gauge!("weather_last_temperature", "units" => units.to_string()).set(t);
    }
}

pub fn record_broadcast(receivers: usize) {
    metrics::gauge!("weather_broadcast_receivers").set(receivers as f64);
}

pub fn record_ws_clients(clients: usize) {
    metrics::gauge!("weather_ws_clients").set(clients as f64);
}
