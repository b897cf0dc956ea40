//! Observation model and weather error definitions.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// A normalized weather record derived from one upstream response.
///
/// Observations are immutable once created; the store only appends them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub id: Uuid,

    /// Creation time of the record (not the upstream `dt`), at microsecond
    /// precision so it survives a round trip through `TIMESTAMPTZ`.
    pub timestamp: DateTime<Utc>,

    /// Air temperature in the requested unit system.
    pub temperature: Option<f64>,

    pub windspeed: Option<f64>,

    /// Wind direction in meteorological degrees.
    pub winddirection: Option<f64>,

    /// Upstream weather condition code (`weather[0].id`).
    pub weathercode: Option<i64>,

    /// The upstream payload, kept verbatim.
    pub raw: Value,
}

impl Observation {
    /// Build an observation from a raw upstream payload.
    ///
    /// Absent or mistyped fields become `None` rather than errors.
    pub fn from_payload(raw: Value, now: DateTime<Utc>) -> Self {
        let temperature = raw.pointer("/main/temp").and_then(Value::as_f64);
        let windspeed = raw.pointer("/wind/speed").and_then(Value::as_f64);
        let winddirection = raw.pointer("/wind/deg").and_then(Value::as_f64);
        let weathercode = raw.pointer("/weather/0/id").and_then(Value::as_i64);

        Self {
            id: Uuid::new_v4(),
            timestamp: now.trunc_subsecs(6),
            temperature,
            windspeed,
            winddirection,
            weathercode,
            raw,
        }
    }
}

/// Errors that can occur while fetching current weather.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// No API key configured; the request is never sent.
    #[error("missing API key for the weather endpoint")]
    MissingCredentials,

    /// The configured endpoint could not be turned into a request URL.
    #[error("invalid weather endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// Transport failure, including timeouts.
    #[error("weather request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("weather API error {status}: {body}")]
    Status { status: u16, body: String },

    /// The body was not valid JSON.
    #[error("weather response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type for weather operations.
pub type WeatherResult<T> = Result<T, WeatherError>;
