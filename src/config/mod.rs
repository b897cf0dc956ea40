//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env (optional, dotenvy)
//!     → config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → args.rs (command line / environment overrides)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod args;
pub mod loader;
pub mod schema;
pub mod validation;

pub use args::Args;
pub use loader::{load_config, read_config, ConfigError};
pub use schema::{
    AppConfig, BroadcastConfig, ObservabilityConfig, ServerConfig, StorageBackend, StorageConfig,
    WeatherConfig,
};
pub use validation::{validate_config, ValidationError};

/// Resolve the effective configuration from a file (if any) and overrides.
pub fn resolve(args: &Args) -> Result<AppConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => read_config(path)?,
        None => AppConfig::default(),
    };
    args.apply(&mut config).map_err(|e| ConfigError::Validation(vec![e]))?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_negative_interval_fails_resolve() {
        let args = Args::try_parse_from(["weather-relay", "--poll-interval-secs", "-1"]).unwrap();
        match resolve(&args) {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors, vec![ValidationError::NegativePollInterval(-1.0)]);
            }
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }
}
