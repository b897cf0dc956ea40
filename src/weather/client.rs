//! Upstream weather API client.
//!
//! # Responsibilities
//! - Build the current-weather request for the configured location
//! - Enforce a per-request timeout
//! - Map transport, status and decoding failures to `WeatherError`

use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::config::WeatherConfig;
use crate::weather::types::{WeatherError, WeatherResult};

/// Client for the OpenWeatherMap current-weather endpoint.
#[derive(Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    config: WeatherConfig,
}

impl WeatherClient {
    pub fn new(config: WeatherConfig) -> WeatherResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("weather-relay/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, config })
    }

    /// Full request URL including the API key.
    pub fn request_url(&self) -> WeatherResult<Url> {
        let api_key = self
            .config
            .api_key()
            .ok_or(WeatherError::MissingCredentials)?;

        let url = Url::parse_with_params(
            &self.config.endpoint,
            &[
                ("lat", self.config.latitude.to_string()),
                ("lon", self.config.longitude.to_string()),
                ("appid", api_key.to_string()),
                ("units", self.config.units.clone()),
            ],
        )?;
        Ok(url)
    }

    /// Fetch the current conditions as raw JSON.
    pub async fn fetch_current(&self) -> WeatherResult<Value> {
        let url = self.request_url()?;

        tracing::debug!(
            endpoint = %self.config.endpoint,
            lat = self.config.latitude,
            lon = self.config.longitude,
            "Fetching current weather"
        );

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(WeatherError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    pub fn config(&self) -> &WeatherConfig {
        &self.config
    }
}
