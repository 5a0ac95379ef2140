//! Bootstrap subsystem.
//!
//! # Data Flow
//! ```text
//! application name
//!     → Bootstrap::resolve (http.rs: GET <manager>/v1/watchers?app=...)
//!     → WatchTarget { endpoints, key }
//!     → validated, handed to the watch session
//! ```
//!
//! # Design Decisions
//! - Resolution happens once; failure is fatal to starting the session
//! - No retry at this layer

pub mod http;

use std::future::Future;

use serde::Deserialize;
use thiserror::Error;

pub use http::HttpBootstrap;

/// Where to watch for config updates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WatchTarget {
    /// Change-feed endpoints.
    #[serde(default)]
    pub endpoints: Vec<String>,
    /// The single key to watch.
    #[serde(default)]
    pub key: String,
}

impl WatchTarget {
    pub fn new(endpoints: Vec<String>, key: impl Into<String>) -> Self {
        Self {
            endpoints,
            key: key.into(),
        }
    }

    /// Reject targets with no endpoints or an empty key.
    pub fn validate(&self) -> Result<(), BootstrapError> {
        if self.endpoints.iter().all(|e| e.trim().is_empty()) {
            return Err(BootstrapError::InvalidTarget("no feed endpoints".to_string()));
        }
        if self.key.trim().is_empty() {
            return Err(BootstrapError::InvalidTarget("empty watch key".to_string()));
        }
        Ok(())
    }
}

/// Errors that can occur while resolving the watch target.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The manager endpoint could not be turned into a URL.
    #[error("Invalid manager endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    /// The HTTP request failed or the body could not be decoded.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The manager answered with a non-200 status.
    #[error("Manager returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response had no `data` section.
    #[error("Manager response carried no watch target")]
    MissingTarget,

    /// The resolved target is unusable.
    #[error("Invalid watch target: {0}")]
    InvalidTarget(String),
}

/// Resolves an application name to its watch target.
pub trait Bootstrap: Send + Sync {
    fn resolve(&self, app: &str) -> impl Future<Output = Result<WatchTarget, BootstrapError>> + Send;
}
