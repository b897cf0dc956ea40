//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the weather relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,

    /// Upstream weather API and polling cadence.
    pub weather: WeatherConfig,

    /// Observation store.
    pub storage: StorageConfig,

    /// Real-time fan-out settings.
    pub broadcast: BroadcastConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,

    /// Request timeout for the read API in seconds.
    pub request_timeout_secs: u64,

    /// Allow any origin to call the API (CORS `*`).
    pub cors_allow_any: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
            request_timeout_secs: 30,
            cors_allow_any: true,
        }
    }
}

/// Upstream weather API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Current-weather endpoint.
    pub endpoint: String,

    /// API key sent as `appid`. Polling fails every cycle while unset.
    pub api_key: Option<String>,

    /// Latitude of the observed location.
    pub latitude: f64,

    /// Longitude of the observed location.
    pub longitude: f64,

    /// Unit system requested from upstream.
    pub units: String,

    /// Seconds between poll cycles.
    pub poll_interval_secs: u64,

    /// Upstream request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openweathermap.org/data/2.5/weather".to_string(),
            api_key: None,
            latitude: 13.7563,
            longitude: 100.5018,
            units: "metric".to_string(),
            poll_interval_secs: 60,
            request_timeout_secs: 10,
        }
    }
}

impl WeatherConfig {
    /// The API key, if one is set and non-empty.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }
}

/// Which store implementation backs the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// Connection string, required for the postgres backend.
    pub database_url: Option<String>,

    /// Maximum pooled connections.
    pub max_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Postgres,
            database_url: None,
            max_connections: 5,
        }
    }
}

/// Real-time broadcast configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BroadcastConfig {
    /// Event name carried in every frame.
    pub event_name: String,

    /// Frames buffered per subscriber before it starts lagging.
    pub channel_capacity: usize,

    /// Send the most recent frame to a client as soon as it connects.
    pub replay_latest: bool,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            event_name: "weather_update".to_string(),
            channel_capacity: 16,
            replay_latest: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
