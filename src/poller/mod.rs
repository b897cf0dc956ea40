//! Poll cycle scheduling.
//!
//! # Data Flow
//! ```text
//! interval tick
//!     → WeatherClient::fetch_current
//!     → Observation::from_payload
//!     → ObservationStore::insert
//!     → Hub::publish
//! ```
//!
//! # Design Decisions
//! - One cycle runs immediately at startup, then on every tick
//! - A failed cycle is logged and skipped; there is no retry
//! - An observation that fails to persist is never broadcast

pub mod monitor;

use thiserror::Error;

use crate::storage::StoreError;
use crate::weather::WeatherError;

pub use monitor::Poller;

/// Why a poll cycle was skipped.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] WeatherError),

    #[error("store failed: {0}")]
    Store(#[from] StoreError),

    #[error("broadcast encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}
