//! Real-time fan-out of observations.
//!
//! # Data Flow
//! ```text
//! Poller
//!     → Hub::publish (serialize once into a frame)
//!     → tokio broadcast channel
//!     → one receiver per WebSocket session (http/websocket.rs)
//! ```
//!
//! # Design Decisions
//! - Frames are serialized once and shared as `Arc<str>`
//! - No backpressure: a lagging receiver skips frames instead of slowing
//!   the poller
//! - The latest frame is kept for replay to newly connected clients

pub mod hub;

pub use hub::{ClientGuard, Hub};
