//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → Metrics → Store (connect + migrate) → Hub → Poller task → Listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → trigger → poller exits, server drains → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: config, store and bind errors are fatal at startup
//! - The listener starts last so health only answers once polling is wired

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
