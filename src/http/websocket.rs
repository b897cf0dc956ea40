//! WebSocket endpoint for live weather updates.
//!
//! # Data Flow
//! ```text
//! Hub ──── frame (text) ────→ session ──── WebSocket text message ────→ Client
//! ```
//!
//! # Design Decisions
//! - Subscribe before replaying the latest frame, so a publish racing the
//!   connect is delivered at least once
//! - Inbound messages are ignored; close or error ends the session
//! - Lagging sessions skip missed frames and keep going

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use tokio::sync::broadcast::error::RecvError;

use crate::http::server::AppState;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| session(socket, state))
}

async fn session(mut socket: WebSocket, state: AppState) {
    let _client = state.hub.connect();
    let mut frames = state.hub.subscribe();
    let mut shutdown = state.shutdown.subscribe();

    tracing::info!(clients = state.hub.client_count(), "WebSocket client connected");

    if state.replay_latest {
        if let Some(frame) = state.hub.latest_frame() {
            if socket.send(Message::Text(frame.to_string().into())).await.is_err() {
                return;
            }
        }
    }

    loop {
        tokio::select! {
            frame = frames.recv() => match frame {
                Ok(frame) => {
                    if socket.send(Message::Text(frame.to_string().into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "WebSocket client lagging, frames dropped");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
            _ = shutdown.recv() => {
                let _ = socket.send(Message::Close(None)).await;
                break;
            }
        }
    }

    tracing::info!("WebSocket client disconnected");
}
