//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use gray_config::watch::{ChangeFeed, FeedError, Subscription, WatchEvent};

pub type BatchResult = Result<Vec<WatchEvent>, FeedError>;

/// A change feed that replays scripted batches.
///
/// Each successful subscribe takes the next script; once a script runs out
/// the subscription waits forever.
#[derive(Clone, Default)]
pub struct ScriptedFeed {
    scripts: Arc<Mutex<VecDeque<Vec<BatchResult>>>>,
    subscribes: Arc<Mutex<Vec<(Vec<String>, String)>>>,
    failing_subscribes: Arc<AtomicU32>,
}

impl ScriptedFeed {
    pub fn new(scripts: Vec<Vec<BatchResult>>) -> Self {
        Self {
            scripts: Arc::new(Mutex::new(scripts.into_iter().collect())),
            ..Default::default()
        }
    }

    /// Make the next `n` subscribe calls fail.
    pub fn fail_next_subscribes(&self, n: u32) {
        self.failing_subscribes.store(n, Ordering::SeqCst);
    }

    /// Every subscribe call seen so far, as (endpoints, key).
    pub fn subscribes(&self) -> Vec<(Vec<String>, String)> {
        self.subscribes.lock().unwrap().clone()
    }
}

pub struct ScriptedSubscription {
    steps: VecDeque<BatchResult>,
}

impl ChangeFeed for ScriptedFeed {
    type Subscription = ScriptedSubscription;

    async fn subscribe(&self, endpoints: &[String], key: &str) -> Result<ScriptedSubscription, FeedError> {
        self.subscribes
            .lock()
            .unwrap()
            .push((endpoints.to_vec(), key.to_string()));

        let failing = self.failing_subscribes.load(Ordering::SeqCst);
        if failing > 0 {
            self.failing_subscribes.store(failing - 1, Ordering::SeqCst);
            return Err(FeedError::Transport("connection refused".into()));
        }

        let steps = self.scripts.lock().unwrap().pop_front().unwrap_or_default();
        Ok(ScriptedSubscription {
            steps: steps.into_iter().collect(),
        })
    }
}

impl Subscription for ScriptedSubscription {
    async fn next_batch(&mut self) -> BatchResult {
        match self.steps.pop_front() {
            Some(step) => step,
            None => std::future::pending().await,
        }
    }
}

/// Poll `condition` until it holds or `timeout` passes.
pub async fn wait_until<F: Fn() -> bool>(timeout: Duration, condition: F) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}

/// Start a mock manager that answers every request with `status` and `body`.
///
/// Returns its address and the request lines it received.
pub async fn start_mock_manager(status: u16, body: &'static str) -> (SocketAddr, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = requests.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let seen = seen.clone();
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 4096];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let request = String::from_utf8_lossy(&buf[..n]).to_string();
                        if let Some(line) = request.lines().next() {
                            seen.lock().unwrap().push(line.to_string());
                        }

                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, requests)
}
