//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → handlers.rs (read API over the store)
//!     → health (liveness)
//!     → websocket.rs (upgrade, then forward hub frames)
//! ```

pub mod handlers;
pub mod server;
pub mod websocket;

pub use server::{AppState, HttpServer};
