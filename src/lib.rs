//! Weather relay library: poll a weather API, store, broadcast.

pub mod broadcast;
pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod poller;
pub mod storage;
pub mod weather;

pub use config::schema::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
