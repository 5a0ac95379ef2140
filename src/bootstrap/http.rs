//! Watch target resolution over HTTP.
//!
//! # Protocol
//! ```text
//! GET <manager>/v1/watchers?app=<app>
//!
//! 200 {"msg": "...", "data": {"key": "/cfg/app", "endpoints": ["http://feed:2379"]}}
//! ```

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::bootstrap::{Bootstrap, BootstrapError, WatchTarget};

/// Default path of the watcher lookup on the manager.
pub const DEFAULT_WATCHERS_PATH: &str = "v1/watchers";

#[derive(Debug, Deserialize)]
struct WatchersResponse {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    data: Option<WatchTarget>,
}

/// Resolves watch targets from the config manager's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpBootstrap {
    client: reqwest::Client,
    url: Url,
}

impl HttpBootstrap {
    /// Create a client for `manager_endpoint`.
    ///
    /// The endpoint may omit the scheme, in which case `http://` is assumed.
    pub fn new(manager_endpoint: &str, path: &str, timeout: Duration) -> Result<Self, BootstrapError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(manager_endpoint, path, client)
    }

    /// Like [`HttpBootstrap::new`] but with a caller-built HTTP client.
    pub fn with_client(
        manager_endpoint: &str,
        path: &str,
        client: reqwest::Client,
    ) -> Result<Self, BootstrapError> {
        let url = watchers_url(manager_endpoint, path)?;
        Ok(Self { client, url })
    }

    /// The lookup URL, without the `app` query.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl Bootstrap for HttpBootstrap {
    async fn resolve(&self, app: &str) -> Result<WatchTarget, BootstrapError> {
        tracing::debug!(url = %self.url, app, "Resolving watch target");

        let res = self
            .client
            .get(self.url.clone())
            .query(&[("app", app)])
            .send()
            .await?;

        let status = res.status();
        if status != reqwest::StatusCode::OK {
            let body = res.text().await.unwrap_or_default();
            return Err(BootstrapError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response: WatchersResponse = res.json().await?;
        let target = response.data.ok_or(BootstrapError::MissingTarget)?;
        tracing::info!(
            app,
            key = %target.key,
            endpoints = ?target.endpoints,
            msg = response.msg.as_deref().unwrap_or_default(),
            "Watch target resolved"
        );
        Ok(target)
    }
}

/// Build `<endpoint>/<path>`, adding `http://` when no scheme is given.
pub fn watchers_url(manager_endpoint: &str, path: &str) -> Result<Url, BootstrapError> {
    let invalid = |source| BootstrapError::InvalidEndpoint {
        endpoint: manager_endpoint.to_string(),
        source,
    };

    let endpoint = manager_endpoint.trim();
    let endpoint = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("http://{endpoint}")
    };

    let mut base = Url::parse(&endpoint).map_err(invalid)?;
    if !base.path().ends_with('/') {
        let dir = format!("{}/", base.path());
        base.set_path(&dir);
    }
    base.join(path.trim_start_matches('/')).map_err(invalid)
}
