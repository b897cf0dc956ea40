//! Command line and environment overrides.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::config::schema::{AppConfig, StorageBackend};
use crate::config::validation::ValidationError;

#[derive(Debug, Parser)]
#[command(name = "weather-relay")]
#[command(about = "Polls a weather API, stores each observation and broadcasts it over WebSocket")]
pub struct Args {
    /// TOML configuration file. Defaults are used when omitted.
    #[arg(short, long, env = "WEATHER_RELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Port to listen on; keeps the host part of `server.bind_address`.
    /// Empty, `0` or non-numeric values are ignored.
    #[arg(long, env = "PORT", allow_hyphen_values = true)]
    pub port: Option<String>,

    /// Postgres connection string.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Empty or non-numeric values are ignored.
    #[arg(long, env = "LAT", allow_hyphen_values = true)]
    pub lat: Option<String>,

    #[arg(long, env = "LON", allow_hyphen_values = true)]
    pub lon: Option<String>,

    /// Empty, `0` or non-numeric values are ignored; negative is an error.
    #[arg(long, env = "POLL_INTERVAL_SECONDS", allow_hyphen_values = true)]
    pub poll_interval_secs: Option<String>,

    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Keep observations in memory instead of Postgres.
    #[arg(long)]
    pub memory_store: bool,
}

impl Args {
    /// Lay the overrides over a file-loaded configuration.
    ///
    /// Blank or unusable numeric overrides leave the configured value in
    /// place, so a `.env` with `LAT=` still starts. Only a negative poll
    /// interval is rejected.
    pub fn apply(&self, config: &mut AppConfig) -> Result<(), ValidationError> {
        if let Some(port) = numeric::<u16>(&self.port).filter(|p| *p != 0) {
            config.server.bind_address = match config.server.bind_address.parse::<SocketAddr>() {
                Ok(mut addr) => {
                    addr.set_port(port);
                    addr.to_string()
                }
                Err(_) => format!("0.0.0.0:{}", port),
            };
        }
        if let Some(url) = &self.database_url {
            config.storage.database_url = Some(url.clone());
        }
        if let Some(lat) = numeric::<f64>(&self.lat) {
            config.weather.latitude = lat;
        }
        if let Some(lon) = numeric::<f64>(&self.lon) {
            config.weather.longitude = lon;
        }
        if let Some(secs) = numeric::<f64>(&self.poll_interval_secs) {
            if secs < 0.0 {
                return Err(ValidationError::NegativePollInterval(secs));
            }
            if secs > 0.0 {
                config.weather.poll_interval_secs = secs.ceil() as u64;
            }
        }
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.is_empty()) {
            config.weather.api_key = Some(key.clone());
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
        if self.memory_store {
            config.storage.backend = StorageBackend::Memory;
        }
        Ok(())
    }
}

/// Parse a raw override; blank, unparsable and non-finite values count as absent.
fn numeric<T>(raw: &Option<String>) -> Option<T>
where
    T: std::str::FromStr + Into<f64> + Copy,
{
    raw.as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<T>().ok())
        .filter(|v| Into::<f64>::into(*v).is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_keeps_host() {
        let args = Args::try_parse_from(["weather-relay", "--port", "8088"]).unwrap();
        let mut config = AppConfig::default();
        config.server.bind_address = "127.0.0.1:5000".to_string();

        args.apply(&mut config).unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1:8088");
    }

    #[test]
    fn test_overrides_weather_settings() {
        let args = Args::try_parse_from([
            "weather-relay",
            "--lat",
            "-33.87",
            "--lon",
            "151.21",
            "--poll-interval-secs",
            "120",
            "--api-key",
            "abc123",
            "--memory-store",
        ])
        .unwrap();
        let mut config = AppConfig::default();

        args.apply(&mut config).unwrap();
        assert_eq!(config.weather.latitude, -33.87);
        assert_eq!(config.weather.longitude, 151.21);
        assert_eq!(config.weather.poll_interval_secs, 120);
        assert_eq!(config.weather.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.storage.backend, StorageBackend::Memory);
    }

    #[test]
    fn test_empty_api_key_is_ignored() {
        let args = Args::try_parse_from(["weather-relay", "--api-key", ""]).unwrap();
        let mut config = AppConfig::default();
        config.weather.api_key = Some("from-file".to_string());

        args.apply(&mut config).unwrap();
        assert_eq!(config.weather.api_key.as_deref(), Some("from-file"));
    }

    fn applied(argv: &[&str]) -> Result<AppConfig, ValidationError> {
        let mut full = vec!["weather-relay"];
        full.extend_from_slice(argv);
        let args = Args::try_parse_from(full).unwrap();
        let mut config = AppConfig::default();
        args.apply(&mut config)?;
        Ok(config)
    }

    #[test]
    fn test_blank_location_keeps_defaults() {
        let config = applied(&["--lat", "", "--lon", "  "]).unwrap();
        assert_eq!(config.weather.latitude, 13.7563);
        assert_eq!(config.weather.longitude, 100.5018);
    }

    #[test]
    fn test_non_numeric_location_keeps_defaults() {
        let config = applied(&["--lat", "north", "--lon", "NaN"]).unwrap();
        assert_eq!(config.weather.latitude, 13.7563);
        assert_eq!(config.weather.longitude, 100.5018);
    }

    #[test]
    fn test_zero_latitude_is_a_real_location() {
        let config = applied(&["--lat", "0", "--lon", "0"]).unwrap();
        assert_eq!(config.weather.latitude, 0.0);
        assert_eq!(config.weather.longitude, 0.0);
    }

    #[test]
    fn test_unusable_port_keeps_bind_address() {
        for port in ["", "0", "abc", "70000"] {
            let config = applied(&["--port", port]).unwrap();
            assert_eq!(config.server.bind_address, "0.0.0.0:5000", "port {:?}", port);
        }
    }

    #[test]
    fn test_unusable_interval_keeps_default() {
        for secs in ["", "0", "soon"] {
            let config = applied(&["--poll-interval-secs", secs]).unwrap();
            assert_eq!(config.weather.poll_interval_secs, 60, "interval {:?}", secs);
        }
    }

    #[test]
    fn test_fractional_interval_rounds_up() {
        let config = applied(&["--poll-interval-secs", "1.5"]).unwrap();
        assert_eq!(config.weather.poll_interval_secs, 2);
    }

    #[test]
    fn test_negative_interval_is_rejected() {
        assert_eq!(
            applied(&["--poll-interval-secs", "-5"]).unwrap_err(),
            ValidationError::NegativePollInterval(-5.0)
        );
    }
}
