//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (timeout, tracing, request ID, CORS)
//! - Serve on a bound listener until shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header::HeaderName, Method},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::broadcast::Hub;
use crate::config::AppConfig;
use crate::health;
use crate::http::{handlers, websocket};
use crate::lifecycle::Shutdown;
use crate::storage::ObservationStore;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ObservationStore>,
    pub hub: Arc<Hub>,
    pub shutdown: Shutdown,
    pub replay_latest: bool,
}

/// HTTP server exposing health, the read API and the WebSocket feed.
pub struct HttpServer {
    router: Router,
    shutdown: Shutdown,
}

impl HttpServer {
    pub fn new(
        config: &AppConfig,
        store: Arc<dyn ObservationStore>,
        hub: Arc<Hub>,
        shutdown: Shutdown,
    ) -> Self {
        let state = AppState {
            store,
            hub,
            shutdown: shutdown.clone(),
            replay_latest: config.broadcast.replay_latest,
        };

        let router = Self::build_router(config, state);
        Self { router, shutdown }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let request_id = HeaderName::from_static(X_REQUEST_ID);

        let mut router = Router::new()
            .route("/api/health", get(health::liveness))
            .route("/api/weather/latest", get(handlers::latest))
            .route("/api/weather/history", get(handlers::history))
            .route("/ws", get(websocket::ws_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            )));

        if config.server.cors_allow_any {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods([Method::GET, Method::POST]),
            );
        }

        router
            .layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
    }

    /// The fully layered router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on the given listener until shutdown is triggered.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let mut shutdown = self.shutdown.subscribe();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
