//! Observation persistence.
//!
//! # Data Flow
//! ```text
//! Poll cycle
//!     → ObservationStore::insert (append only)
//!     → postgres.rs (sqlx, JSONB raw payload) | memory.rs (Vec)
//!
//! Read API
//!     → ObservationStore::latest / recent / count
//! ```
//!
//! # Design Decisions
//! - Stores never update or delete; observations are immutable
//! - The trait is object safe so the server can hold `Arc<dyn ObservationStore>`

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::config::{StorageBackend, StorageConfig};
use crate::weather::Observation;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Errors that can occur while persisting or reading observations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("observation {0} already stored")]
    Duplicate(Uuid),

    #[error("store misconfigured: {0}")]
    Config(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Append-only storage for weather observations.
#[async_trait]
pub trait ObservationStore: Send + Sync {
    /// Persist a new observation.
    async fn insert(&self, observation: &Observation) -> StoreResult<()>;

    /// Most recent observation by timestamp.
    async fn latest(&self) -> StoreResult<Option<Observation>>;

    /// Up to `limit` observations, newest first.
    async fn recent(&self, limit: u32) -> StoreResult<Vec<Observation>>;

    async fn count(&self) -> StoreResult<u64>;
}

/// Open the configured store, running schema setup where needed.
pub async fn open(config: &StorageConfig) -> StoreResult<Arc<dyn ObservationStore>> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory store; observations are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| StoreError::Config("database_url is not set".to_string()))?;
            let store = PostgresStore::connect(url, config.max_connections).await?;
            store.migrate().await?;
            Ok(Arc::new(store))
        }
    }
}
