//! Settings schema definitions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bootstrap::http::DEFAULT_WATCHERS_PATH;
use crate::observability::logging::DEFAULT_LOG_FILTER;
use crate::resilience::Backoff;

/// Root settings for the config client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientSettings {
    /// Application name resolved at bootstrap.
    pub app: Option<String>,

    /// Config manager address (scheme optional).
    pub manager_endpoint: Option<String>,

    /// Bootstrap request settings.
    pub bootstrap: BootstrapSettings,

    /// Watch session settings.
    pub watch: WatchSettings,

    /// Logging and metrics.
    pub observability: ObservabilitySettings,
}

/// Bootstrap request settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BootstrapSettings {
    /// Path of the watcher lookup, relative to the manager endpoint.
    pub path: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for BootstrapSettings {
    fn default() -> Self {
        Self {
            path: DEFAULT_WATCHERS_PATH.to_string(),
            timeout_secs: 10,
        }
    }
}

impl BootstrapSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Watch session settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WatchSettings {
    /// First reconnect delay in milliseconds.
    pub backoff_base_ms: u64,

    /// Reconnect delay cap in milliseconds.
    pub backoff_max_ms: u64,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            backoff_base_ms: 100,
            backoff_max_ms: 30_000,
        }
    }
}

impl WatchSettings {
    pub fn backoff(&self) -> Backoff {
        Backoff::new(self.backoff_base_ms, self.backoff_max_ms)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilitySettings {
    /// Default tracing filter; `RUST_LOG` takes precedence.
    pub log_filter: String,

    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilitySettings {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9100".to_string(),
        }
    }
}
