//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and
//! cross-field requirements. All errors are collected, not just the first.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{AppConfig, StorageBackend};

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("weather.poll_interval_secs must be greater than 0")]
    InvalidPollInterval,

    #[error("poll interval {0} must not be negative")]
    NegativePollInterval(f64),

    #[error("weather.request_timeout_secs must be greater than 0")]
    InvalidRequestTimeout,

    #[error("weather.latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("weather.longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("weather.endpoint '{0}' is not an absolute URL")]
    InvalidEndpoint(String),

    #[error("server.bind_address '{0}' is not a socket address")]
    InvalidBindAddress(String),

    #[error("storage.database_url is required for the postgres backend")]
    MissingDatabaseUrl,

    #[error("broadcast.channel_capacity must be greater than 0")]
    InvalidChannelCapacity,

    #[error("broadcast.event_name must not be empty")]
    EmptyEventName,
}

/// Validate a configuration, returning every error found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let weather = &config.weather;

    if weather.poll_interval_secs == 0 {
        errors.push(ValidationError::InvalidPollInterval);
    }
    if weather.request_timeout_secs == 0 {
        errors.push(ValidationError::InvalidRequestTimeout);
    }
    if !(-90.0..=90.0).contains(&weather.latitude) {
        errors.push(ValidationError::LatitudeOutOfRange(weather.latitude));
    }
    if !(-180.0..=180.0).contains(&weather.longitude) {
        errors.push(ValidationError::LongitudeOutOfRange(weather.longitude));
    }
    if url::Url::parse(&weather.endpoint).is_err() {
        errors.push(ValidationError::InvalidEndpoint(weather.endpoint.clone()));
    }

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.server.bind_address.clone(),
        ));
    }

    if config.storage.backend == StorageBackend::Postgres
        && config
            .storage
            .database_url
            .as_deref()
            .is_none_or(|url| url.trim().is_empty())
    {
        errors.push(ValidationError::MissingDatabaseUrl);
    }

    if config.broadcast.channel_capacity == 0 {
        errors.push(ValidationError::InvalidChannelCapacity);
    }
    if config.broadcast.event_name.trim().is_empty() {
        errors.push(ValidationError::EmptyEventName);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
