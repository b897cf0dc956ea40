//! Postgres-backed observation store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::storage::{ObservationStore, StoreError, StoreResult};
use crate::weather::Observation;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS weather_observations (
        id UUID PRIMARY KEY,
        observed_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        temperature DOUBLE PRECISION,
        wind_speed DOUBLE PRECISION,
        wind_direction DOUBLE PRECISION,
        weather_code BIGINT,
        raw JSONB NOT NULL
    )
"#;

const CREATE_INDEX: &str = r#"
    CREATE INDEX IF NOT EXISTS weather_observations_observed_at_idx
    ON weather_observations (observed_at DESC)
"#;

const SELECT_COLUMNS: &str =
    "SELECT id, observed_at, temperature, wind_speed, wind_direction, weather_code, raw FROM weather_observations";

#[derive(Debug, FromRow)]
struct ObservationRow {
    id: Uuid,
    observed_at: DateTime<Utc>,
    temperature: Option<f64>,
    wind_speed: Option<f64>,
    wind_direction: Option<f64>,
    weather_code: Option<i64>,
    raw: Json<Value>,
}

impl From<ObservationRow> for Observation {
    fn from(row: ObservationRow) -> Self {
        Self {
            id: row.id,
            timestamp: row.observed_at,
            temperature: row.temperature,
            windspeed: row.wind_speed,
            winddirection: row.wind_direction,
            weathercode: row.weather_code,
            raw: row.raw.0,
        }
    }
}

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        tracing::info!(max_connections, "Connected to Postgres");
        Ok(Self { pool })
    }

    /// Create the observation table and index if they do not exist.
    pub async fn migrate(&self) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(CREATE_TABLE).execute(&mut *tx).await?;
        sqlx::query(CREATE_INDEX).execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl ObservationStore for PostgresStore {
    async fn insert(&self, observation: &Observation) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO weather_observations
                (id, observed_at, temperature, wind_speed, wind_direction, weather_code, raw)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(observation.id)
        .bind(observation.timestamp)
        .bind(observation.temperature)
        .bind(observation.windspeed)
        .bind(observation.winddirection)
        .bind(observation.weathercode)
        .bind(Json(&observation.raw))
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                StoreError::Duplicate(observation.id)
            }
            other => StoreError::Database(other),
        })?;

        Ok(())
    }

    async fn latest(&self) -> StoreResult<Option<Observation>> {
        let row: Option<ObservationRow> =
            sqlx::query_as(&format!("{} ORDER BY observed_at DESC LIMIT 1", SELECT_COLUMNS))
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Observation::from))
    }

    async fn recent(&self, limit: u32) -> StoreResult<Vec<Observation>> {
        let rows: Vec<ObservationRow> =
            sqlx::query_as(&format!("{} ORDER BY observed_at DESC LIMIT $1", SELECT_COLUMNS))
                .bind(i64::from(limit))
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(Observation::from).collect())
    }

    async fn count(&self) -> StoreResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM weather_observations")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // Needs a disposable database: TEST_DATABASE_URL=postgres://... cargo test -- --ignored
    #[tokio::test]
    #[ignore]
    async fn test_roundtrip_against_postgres() {
        let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL not set");
        let store = PostgresStore::connect(&url, 2).await.unwrap();
        store.migrate().await.unwrap();
        store.migrate().await.unwrap();

        let before = store.count().await.unwrap();
        let obs = Observation::from_payload(
            json!({"main": {"temp": 27.5}, "wind": {"speed": 1.2, "deg": 90}, "weather": [{"id": 500}]}),
            Utc::now(),
        );
        store.insert(&obs).await.unwrap();

        assert_eq!(store.count().await.unwrap(), before + 1);
        let latest = store.latest().await.unwrap().unwrap();
        assert_eq!(latest.id, obs.id);
        assert_eq!(latest.weathercode, Some(500));
        assert_eq!(latest.raw, obs.raw);

        let err = store.insert(&obs).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }
}
