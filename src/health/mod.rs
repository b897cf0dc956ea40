//! Liveness check.
//!
//! Reports that the process is up and serving. It does not probe the
//! upstream API or the store; a failing poll cycle leaves health green.

use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Liveness {
    pub ok: bool,
    pub ts: DateTime<Utc>,
}

pub async fn liveness() -> Json<Liveness> {
    Json(Liveness {
        ok: true,
        ts: Utc::now(),
    })
}
