//! In-process store for development and tests.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::storage::{ObservationStore, StoreError, StoreResult};
use crate::weather::Observation;

/// Keeps every observation in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    observations: RwLock<Vec<Observation>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ObservationStore for MemoryStore {
    async fn insert(&self, observation: &Observation) -> StoreResult<()> {
        let mut observations = self.observations.write().expect("memory store lock poisoned");
        if observations.iter().any(|o| o.id == observation.id) {
            return Err(StoreError::Duplicate(observation.id));
        }
        observations.push(observation.clone());
        Ok(())
    }

    async fn latest(&self) -> StoreResult<Option<Observation>> {
        let observations = self.observations.read().expect("memory store lock poisoned");
        Ok(observations.iter().max_by_key(|o| o.timestamp).cloned())
    }

    async fn recent(&self, limit: u32) -> StoreResult<Vec<Observation>> {
        let observations = self.observations.read().expect("memory store lock poisoned");
        let mut recent: Vec<Observation> = observations.clone();
        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        recent.truncate(limit as usize);
        Ok(recent)
    }

    async fn count(&self) -> StoreResult<u64> {
        let observations = self.observations.read().expect("memory store lock poisoned");
        Ok(observations.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use serde_json::json;

    fn observation_at(offset_secs: i64, temp: f64) -> Observation {
        Observation::from_payload(
            json!({"main": {"temp": temp}}),
            Utc::now() + Duration::seconds(offset_secs),
        )
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = MemoryStore::new();
        assert!(store.latest().await.unwrap().is_none());
        assert!(store.recent(10).await.unwrap().is_empty());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_latest_and_recent_order() {
        let store = MemoryStore::new();
        store.insert(&observation_at(0, 20.0)).await.unwrap();
        store.insert(&observation_at(120, 22.0)).await.unwrap();
        store.insert(&observation_at(60, 21.0)).await.unwrap();

        let latest = store.latest().await.unwrap().unwrap();
        assert_eq!(latest.temperature, Some(22.0));

        let temps: Vec<_> = store
            .recent(2)
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.temperature)
            .collect();
        assert_eq!(temps, vec![Some(22.0), Some(21.0)]);
        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_rejects_duplicate_insert() {
        let store = MemoryStore::new();
        let obs = observation_at(0, 18.5);
        store.insert(&obs).await.unwrap();

        let err = store.insert(&obs).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(id) if id == obs.id));
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
