//! The repeating fetch-store-broadcast task.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use crate::broadcast::Hub;
use crate::observability::metrics::{self, PollOutcome};
use crate::poller::PollError;
use crate::storage::ObservationStore;
use crate::weather::{Observation, WeatherClient};

pub struct Poller {
    client: WeatherClient,
    store: Arc<dyn ObservationStore>,
    hub: Arc<Hub>,
    interval: Duration,
}

impl Poller {
    pub fn new(
        client: WeatherClient,
        store: Arc<dyn ObservationStore>,
        hub: Arc<Hub>,
        interval: Duration,
    ) -> Self {
        Self {
            client,
            store,
            hub,
            interval,
        }
    }

    /// Run cycles until shutdown. The first cycle starts immediately.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            lat = self.client.config().latitude,
            lon = self.client.config().longitude,
            "Weather poller starting"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.poll_once().await {
                        tracing::error!(error = %e, "Poll cycle failed, skipping");
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Weather poller received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// One fetch-store-broadcast cycle.
    pub async fn poll_once(&self) -> Result<Observation, PollError> {
        let start = Instant::now();

        let raw = match self.client.fetch_current().await {
            Ok(raw) => raw,
            Err(e) => {
                metrics::record_poll(PollOutcome::FetchError, start);
                return Err(e.into());
            }
        };

        let observation = Observation::from_payload(raw, Utc::now());

        if let Err(e) = self.store.insert(&observation).await {
            metrics::record_poll(PollOutcome::StoreError, start);
            return Err(e.into());
        }

        tracing::info!(
            id = %observation.id,
            timestamp = %observation.timestamp.to_rfc3339(),
            temperature = ?observation.temperature,
            "Saved weather observation"
        );

        let receivers = match self.hub.publish(&observation) {
            Ok(receivers) => receivers,
            Err(e) => {
                metrics::record_poll(PollOutcome::EncodeError, start);
                return Err(e.into());
            }
        };
        tracing::debug!(receivers, event = self.hub.event_name(), "Broadcast weather update");

        metrics::record_temperature(observation.temperature, &self.client.config().units);
        metrics::record_poll(PollOutcome::Success, start);
        Ok(observation)
    }
}
