//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use weather_relay::broadcast::Hub;
use weather_relay::config::{AppConfig, StorageBackend, WeatherConfig};
use weather_relay::storage::ObservationStore;
use weather_relay::{HttpServer, Shutdown};

/// A current-weather body in the upstream format.
pub fn weather_payload(temp: f64) -> String {
    serde_json::json!({
        "coord": {"lon": 100.5018, "lat": 13.7563},
        "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
        "main": {"temp": temp, "feels_like": temp + 3.0, "pressure": 1009, "humidity": 78},
        "wind": {"speed": 2.57, "deg": 230},
        "dt": 1718000000,
        "name": "Bangkok",
        "cod": 200
    })
    .to_string()
}

/// Request lines seen by a mock upstream, e.g. `GET /weather?lat=... HTTP/1.1`.
pub type SeenRequests = Arc<Mutex<Vec<String>>>;

/// Start a programmable mock upstream on an ephemeral port.
pub async fn start_upstream<F, Fut>(f: F) -> (SocketAddr, SeenRequests)
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen: SeenRequests = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let seen_task = seen.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let f = f.clone();
            let seen = seen_task.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let mut read = 0;
                while read < buf.len() {
                    match socket.read(&mut buf[read..]).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            read += n;
                            if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                                break;
                            }
                        }
                    }
                }
                let head = String::from_utf8_lossy(&buf[..read]).to_string();
                if let Some(line) = head.lines().next() {
                    seen.lock().unwrap().push(line.to_string());
                }

                let (status, body) = f().await;
                let status_text = match status {
                    200 => "200 OK",
                    401 => "401 Unauthorized",
                    404 => "404 Not Found",
                    429 => "429 Too Many Requests",
                    500 => "500 Internal Server Error",
                    503 => "503 Service Unavailable",
                    _ => "200 OK",
                };

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, seen)
}

/// Weather settings pointing at a mock upstream.
pub fn weather_config(upstream: SocketAddr) -> WeatherConfig {
    WeatherConfig {
        endpoint: format!("http://{}/data/2.5/weather", upstream),
        api_key: Some("test-key".to_string()),
        request_timeout_secs: 2,
        ..WeatherConfig::default()
    }
}

pub fn memory_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.storage.backend = StorageBackend::Memory;
    config.server.bind_address = "127.0.0.1:0".to_string();
    config
}

/// Serve the relay's HTTP surface on an ephemeral port.
pub async fn start_server(
    config: &AppConfig,
    store: Arc<dyn ObservationStore>,
    hub: Arc<Hub>,
    shutdown: Shutdown,
) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config, store, hub, shutdown);

    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    addr
}
