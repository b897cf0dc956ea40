//! Broadcast hub shared by the poller and WebSocket sessions.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use serde::Serialize;
use tokio::sync::broadcast;

use crate::config::BroadcastConfig;
use crate::observability::metrics;
use crate::weather::Observation;

#[derive(Serialize)]
struct Envelope<'a> {
    event: &'a str,
    data: &'a Observation,
}

struct Published {
    observation: Observation,
    frame: Arc<str>,
}

/// Fan-out point for the newest observation.
pub struct Hub {
    tx: broadcast::Sender<Arc<str>>,
    event_name: String,
    latest: ArcSwapOption<Published>,
    clients: Arc<AtomicUsize>,
}

impl Hub {
    pub fn new(config: &BroadcastConfig) -> Self {
        let (tx, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            tx,
            event_name: config.event_name.clone(),
            latest: ArcSwapOption::empty(),
            clients: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Serialize and send an observation to every subscriber.
    ///
    /// Returns the number of receivers reached; zero is not an error.
    pub fn publish(&self, observation: &Observation) -> Result<usize, serde_json::Error> {
        let frame: Arc<str> = serde_json::to_string(&Envelope {
            event: &self.event_name,
            data: observation,
        })?
        .into();

        self.latest.store(Some(Arc::new(Published {
            observation: observation.clone(),
            frame: frame.clone(),
        })));

        let receivers = self.tx.send(frame).unwrap_or(0);
        metrics::record_broadcast(receivers);
        Ok(receivers)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<str>> {
        self.tx.subscribe()
    }

    /// Frame of the most recent publish, if any.
    pub fn latest_frame(&self) -> Option<Arc<str>> {
        self.latest.load_full().map(|p| p.frame.clone())
    }

    /// Most recently published observation, if any.
    pub fn latest(&self) -> Option<Observation> {
        self.latest.load_full().map(|p| p.observation.clone())
    }

    /// Register a connected client; the count drops when the guard does.
    pub fn connect(&self) -> ClientGuard {
        let count = self.clients.fetch_add(1, Ordering::Relaxed) + 1;
        metrics::record_ws_clients(count);
        ClientGuard {
            clients: self.clients.clone(),
        }
    }

    pub fn client_count(&self) -> usize {
        self.clients.load(Ordering::Relaxed)
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }
}

/// Keeps a WebSocket client counted while alive.
pub struct ClientGuard {
    clients: Arc<AtomicUsize>,
}

impl Drop for ClientGuard {
    fn drop(&mut self) {
        let count = self.clients.fetch_sub(1, Ordering::Relaxed) - 1;
        metrics::record_ws_clients(count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::{json, Value};

    fn hub(capacity: usize) -> Hub {
        Hub::new(&BroadcastConfig {
            channel_capacity: capacity,
            ..BroadcastConfig::default()
        })
    }

    fn observation(temp: f64) -> Observation {
        Observation::from_payload(json!({"main": {"temp": temp}}), Utc::now())
    }

    #[test]
    fn test_publish_without_subscribers() {
        let hub = hub(4);
        assert_eq!(hub.publish(&observation(20.0)).unwrap(), 0);
        assert_eq!(hub.latest().unwrap().temperature, Some(20.0));
    }

    #[tokio::test]
    async fn test_frame_envelope() {
        let hub = hub(4);
        let mut rx = hub.subscribe();
        let obs = observation(25.5);

        assert_eq!(hub.publish(&obs).unwrap(), 1);

        let frame = rx.recv().await.unwrap();
        let value: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["event"], "weather_update");
        assert_eq!(value["data"]["temperature"], 25.5);
        assert_eq!(value["data"]["id"], obs.id.to_string());
        assert_eq!(hub.latest_frame().as_deref(), Some(frame.as_ref()));
    }

    #[tokio::test]
    async fn test_lagging_receiver_skips_frames() {
        let hub = hub(2);
        let mut rx = hub.subscribe();
        for t in 0..5 {
            hub.publish(&observation(t as f64)).unwrap();
        }

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(3))
        ));
        let frame = rx.recv().await.unwrap();
        let value: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["data"]["temperature"], 3.0);
    }

    #[test]
    fn test_client_guard_counts() {
        let hub = hub(4);
        let a = hub.connect();
        let b = hub.connect();
        assert_eq!(hub.client_count(), 2);
        drop(a);
        assert_eq!(hub.client_count(), 1);
        drop(b);
        assert_eq!(hub.client_count(), 0);
    }
}
