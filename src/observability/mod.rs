//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Poller, hub and HTTP handlers produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (tracing-subscriber fmt layer)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level when set
//! - Metrics go through the `metrics` facade; recording is a no-op until
//!   an exporter is installed

pub mod logging;
pub mod metrics;
