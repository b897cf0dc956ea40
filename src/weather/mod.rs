//! Upstream weather integration.
//!
//! # Data Flow
//! ```text
//! WeatherConfig (endpoint, key, location)
//!     → client.rs (GET current weather, timeout, status mapping)
//!     → raw JSON payload
//!     → types.rs (Observation::from_payload)
//! ```

pub mod client;
pub mod types;

pub use client::WeatherClient;
pub use types::{Observation, WeatherError, WeatherResult};
