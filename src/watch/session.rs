//! Watch/refresh session.
//!
//! # States
//! - Subscribing: opening a subscription on the feed
//! - Active: waiting for and applying update batches
//! - Failed: the subscription broke; waiting out the backoff
//!
//! # State Transitions
//! ```text
//! Subscribing → Active: subscription opened
//! Subscribing → Failed: subscribe failed
//! Active → Active: batch applied, or wait interrupted
//! Active → Failed: transport error or feed closed the subscription
//! Failed → Subscribing: after backoff, same key and endpoints
//! ```
//!
//! There is no terminal state. The loop ends only when its task is aborted
//! or the runtime shuts down.

use std::sync::atomic::{AtomicU32, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::gray::GrayRuleEngine;
use crate::observability::metrics;
use crate::resilience::Backoff;
use crate::store::ConfigStore;
use crate::watch::feed::{ChangeFeed, FeedError, Subscription, WatchEvent};

/// Session state.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Subscribing = 0,
    Active = 1,
    Failed = 2,
}

impl From<u8> for SessionState {
    fn from(val: u8) -> Self {
        match val {
            1 => SessionState::Active,
            2 => SessionState::Failed,
            _ => SessionState::Subscribing,
        }
    }
}

/// Counters and state of a running session, shared with observers.
#[derive(Debug, Default)]
pub struct SessionStatus {
    state: AtomicU8,
    subscriptions: AtomicU64,
    failures: AtomicU64,
    reloads: AtomicU64,
    backoff_attempts: AtomicU32,
}

impl SessionStatus {
    pub fn state(&self) -> SessionState {
        SessionState::from(self.state.load(Ordering::Acquire))
    }

    /// Subscriptions successfully opened, including the first one.
    pub fn subscriptions(&self) -> u64 {
        self.subscriptions.load(Ordering::Relaxed)
    }

    /// Subscribe attempts or subscriptions that failed.
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Reload blobs applied to the store.
    pub fn reloads(&self) -> u64 {
        self.reloads.load(Ordering::Relaxed)
    }

    /// Consecutive failures since the last received batch.
    pub fn backoff_attempts(&self) -> u32 {
        self.backoff_attempts.load(Ordering::Relaxed)
    }

    fn set_state(&self, state: SessionState) {
        self.state.store(state as u8, Ordering::Release);
        metrics::record_session_state(state);
    }
}

/// Keeps the config store in sync with one watch key.
pub struct WatchSession<F: ChangeFeed> {
    feed: F,
    endpoints: Vec<String>,
    key: String,
    store: Arc<ConfigStore>,
    gray: Arc<GrayRuleEngine>,
    backoff: Backoff,
    status: Arc<SessionStatus>,
}

impl<F: ChangeFeed> WatchSession<F> {
    pub fn new(
        feed: F,
        endpoints: Vec<String>,
        key: impl Into<String>,
        store: Arc<ConfigStore>,
        gray: Arc<GrayRuleEngine>,
    ) -> Self {
        Self {
            feed,
            endpoints,
            key: key.into(),
            store,
            gray,
            backoff: Backoff::default(),
            status: Arc::new(SessionStatus::default()),
        }
    }

    /// Replace the reconnect backoff policy.
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Share an externally owned status handle.
    pub fn with_status(mut self, status: Arc<SessionStatus>) -> Self {
        self.status = status;
        self
    }

    pub fn status(&self) -> Arc<SessionStatus> {
        Arc::clone(&self.status)
    }

    /// Run the session on a background task.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Run the watch loop. Never returns.
    pub async fn run(mut self) {
        tracing::info!(
            key = %self.key,
            endpoints = ?self.endpoints,
            "Watch session starting"
        );

        loop {
            self.status.set_state(SessionState::Subscribing);
            let mut subscription = match self.feed.subscribe(&self.endpoints, &self.key).await {
                Ok(subscription) => subscription,
                Err(e) => {
                    tracing::error!(key = %self.key, error = %e, "Failed to open watch subscription");
                    self.fail().await;
                    continue;
                }
            };

            self.status.subscriptions.fetch_add(1, Ordering::Relaxed);
            self.status.set_state(SessionState::Active);
            tracing::info!(key = %self.key, "Watch subscription active");

            let error = self.listen(&mut subscription).await;
            tracing::error!(
                key = %self.key,
                error = %error,
                "Watch subscription failed, reconnecting"
            );
            drop(subscription);
            self.fail().await;
        }
    }

    /// Apply batches until the subscription fails.
    async fn listen(&mut self, subscription: &mut F::Subscription) -> FeedError {
        loop {
            match subscription.next_batch().await {
                Ok(events) => {
                    self.backoff.reset();
                    self.status.backoff_attempts.store(0, Ordering::Relaxed);
                    self.apply_batch(&events);
                }
                Err(e) if !e.is_transport_failure() => {
                    tracing::warn!(key = %self.key, error = %e, "Watch wait interrupted, continuing");
                }
                Err(e) => return e,
            }
        }
    }

    /// Mark the session failed and wait out the backoff.
    async fn fail(&mut self) {
        self.status.set_state(SessionState::Failed);
        self.status.failures.fetch_add(1, Ordering::Relaxed);
        metrics::record_resubscribe();

        let delay = self.backoff.next_delay();
        self.status
            .backoff_attempts
            .store(self.backoff.attempts(), Ordering::Relaxed);
        tracing::debug!(
            attempt = self.backoff.attempts(),
            delay_ms = delay.as_millis() as u64,
            "Waiting before re-subscribing"
        );
        tokio::time::sleep(delay).await;
    }

    fn apply_batch(&self, events: &[WatchEvent]) {
        for event in events {
            if apply_event(&self.store, &self.gray, event) {
                self.status.reloads.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

/// Apply one feed event. Returns whether the store was reloaded.
pub fn apply_event(store: &ConfigStore, gray: &GrayRuleEngine, event: &WatchEvent) -> bool {
    tracing::debug!(
        kind = ?event.kind,
        key = %event.key,
        value = event.value.as_deref().unwrap_or_default(),
        "Watch event received"
    );

    let Some(payload) = event.reload_payload() else {
        return false;
    };

    let applied = store.reload_config_content(payload);
    gray.reset_gray_config_cache();
    metrics::record_reload();
    tracing::info!(key = %event.key, entries = applied, "Config reloaded");
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts() -> (Arc<ConfigStore>, Arc<GrayRuleEngine>) {
        let store = Arc::new(ConfigStore::new());
        let gray = Arc::new(GrayRuleEngine::new(Arc::clone(&store)));
        (store, gray)
    }

    #[test]
    fn test_apply_put_reloads_and_resets() {
        let (store, gray) = parts();
        store.reload_config_content("[g]\nr=deny");
        assert!(!gray.is_allowed("g.r", "x"));
        assert_eq!(gray.cached_rules(), 1);

        assert!(apply_event(&store, &gray, &WatchEvent::put("/app", "[g]\nr=allow")));
        assert_eq!(gray.cached_rules(), 0);
        assert!(gray.is_allowed("g.r", "x"));
    }

    #[test]
    fn test_apply_ignores_delete_and_empty() {
        let (store, gray) = parts();
        store.reload_config_content("[g]\nr=deny");
        gray.is_allowed("g.r", "x");

        assert!(!apply_event(&store, &gray, &WatchEvent::delete("/app")));
        assert!(!apply_event(&store, &gray, &WatchEvent::put("/app", "")));
        assert_eq!(gray.cached_rules(), 1);
        assert_eq!(store.get("g", "r").as_deref(), Some("deny"));
    }

    #[test]
    fn test_state_from_u8() {
        assert_eq!(SessionState::from(0), SessionState::Subscribing);
        assert_eq!(SessionState::from(1), SessionState::Active);
        assert_eq!(SessionState::from(2), SessionState::Failed);
        assert_eq!(SessionState::from(9), SessionState::Subscribing);
    }

    #[test]
    fn test_status_defaults() {
        let status = SessionStatus::default();
        assert_eq!(status.state(), SessionState::Subscribing);
        assert_eq!(status.subscriptions(), 0);
        assert_eq!(status.failures(), 0);
        assert_eq!(status.reloads(), 0);
        assert_eq!(status.backoff_attempts(), 0);
    }
}
