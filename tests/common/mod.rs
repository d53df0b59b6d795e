//! Shared utilities for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use todo_api::config::AppConfig;
use todo_api::lifecycle::{self, Shutdown};
use todo_api::logging::{LogLevel, Logger, LoggerConfig, MemoryWriter};

/// A running service on an ephemeral port with an in-memory database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub logs: MemoryWriter,
    pub client: reqwest::Client,
    pub shutdown: Shutdown,
}

#[allow(dead_code)]
impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn log_lines(&self) -> Vec<String> {
        self.logs.lines()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the service. `labels_endpoint` points the label client at a mock.
pub async fn spawn_app(labels_endpoint: Option<String>) -> TestApp {
    let mut config = AppConfig::default();
    config.http.bind_address = "127.0.0.1:0".to_string();
    config.labels.endpoint = labels_endpoint;
    config.labels.retry_delay_ms = 10;
    config.labels.timeout_secs = 2;

    let logs = MemoryWriter::new();
    let logger = Logger::with_writer(
        LoggerConfig {
            level: LogLevel::Debug,
            colorize: false,
            ..LoggerConfig::default()
        },
        Arc::new(logs.clone()),
    );

    let app = lifecycle::build(&config, &logger).await.unwrap();
    let addr = app.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = app.run(rx).await;
    });

    TestApp {
        addr,
        logs,
        client: reqwest::Client::new(),
        shutdown,
    }
}

/// Start a programmable mock backend on an ephemeral port. Each request
/// is answered with the status and JSON body `f` produces.
#[allow(dead_code)]
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            tokio::spawn(async move {
                // Drain the request head before answering.
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }

                let (status, body) = f().await;
                let status_text = match status {
                    200 => "200 OK",
                    404 => "404 Not Found",
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

    addr
}
