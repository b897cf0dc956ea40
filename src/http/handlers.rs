//! Read-only observation API.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::http::server::AppState;

pub const DEFAULT_HISTORY_LIMIT: u32 = 50;
pub const MAX_HISTORY_LIMIT: u32 = 500;

#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<u32>,
}

impl HistoryParams {
    pub fn effective_limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT)
    }
}

pub async fn latest(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.latest().await {
        Ok(Some(observation)) => (StatusCode::OK, Json(observation)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "No observations yet").into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to read latest observation");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read observations").into_response()
        }
    }
}

pub async fn history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> impl IntoResponse {
    match state.store.recent(params.effective_limit()).await {
        Ok(observations) => (StatusCode::OK, Json(observations)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to read observation history");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read observations").into_response()
        }
    }
}
