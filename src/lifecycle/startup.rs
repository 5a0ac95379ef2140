//! Client startup.
//!
//! # Responsibilities
//! - Own the shared store and gray engine
//! - Resolve the watch target once (bootstrap failure is fatal)
//! - Start exactly one watch session per client
//!
//! # Design Decisions
//! - A second start is a warning, not an error
//! - Until a session delivers content the store is empty: lookups return
//!   nothing and every gray check denies

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::bootstrap::{Bootstrap, BootstrapError, WatchTarget};
use crate::gray::GrayRuleEngine;
use crate::resilience::Backoff;
use crate::store::ConfigStore;
use crate::watch::{ChangeFeed, SessionStatus, WatchSession};

/// Errors that prevent the client from starting its watch session.
#[derive(Debug, Error)]
pub enum StartError {
    /// No application name was configured.
    #[error("Application name is empty")]
    MissingApp,

    /// The watch target could not be resolved.
    #[error("Bootstrap failed: {0}")]
    Bootstrap(#[from] BootstrapError),
}

/// Runtime config client: store, gray rules and the session that feeds them.
#[derive(Debug)]
pub struct ConfigClient {
    store: Arc<ConfigStore>,
    gray: Arc<GrayRuleEngine>,
    status: Arc<SessionStatus>,
    started: AtomicBool,
}

impl ConfigClient {
    pub fn new() -> Self {
        let store = Arc::new(ConfigStore::new());
        let gray = Arc::new(GrayRuleEngine::new(Arc::clone(&store)));
        Self {
            store,
            gray,
            status: Arc::new(SessionStatus::default()),
            started: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    pub fn gray(&self) -> &Arc<GrayRuleEngine> {
        &self.gray
    }

    /// State of the watch session, once started.
    pub fn status(&self) -> &Arc<SessionStatus> {
        &self.status
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Resolve `app` and start watching its target.
    ///
    /// Returns `Ok(None)` if a session was already started.
    pub async fn init<B, F>(
        &self,
        app: &str,
        bootstrap: &B,
        feed: F,
        backoff: Backoff,
    ) -> Result<Option<JoinHandle<()>>, StartError>
    where
        B: Bootstrap,
        F: ChangeFeed,
    {
        if app.trim().is_empty() {
            tracing::error!("Cannot start config client without an application name");
            return Err(StartError::MissingApp);
        }

        let target = match bootstrap.resolve(app).await.and_then(|t| t.validate().map(|()| t)) {
            Ok(target) => target,
            Err(e) => {
                tracing::error!(app, error = %e, "Config client bootstrap failed");
                return Err(e.into());
            }
        };

        Ok(self.start_watch(feed, target, backoff))
    }

    /// Start the watch session on `target`.
    ///
    /// Only the first call starts a session; later calls log a warning and
    /// return `None`.
    pub fn start_watch<F: ChangeFeed>(
        &self,
        feed: F,
        target: WatchTarget,
        backoff: Backoff,
    ) -> Option<JoinHandle<()>> {
        if self
            .started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!(key = %target.key, "Watch session already started, ignoring");
            return None;
        }

        let session = WatchSession::new(
            feed,
            target.endpoints,
            target.key,
            Arc::clone(&self.store),
            Arc::clone(&self.gray),
        )
        .with_backoff(backoff)
        .with_status(Arc::clone(&self.status));
        Some(session.spawn())
    }
}

impl Default for ConfigClient {
    fn default() -> Self {
        Self::new()
    }
}
