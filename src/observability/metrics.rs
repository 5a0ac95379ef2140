//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gray_config_reloads_total` (counter): reload blobs applied by the session
//! - `gray_config_entries_applied_total` (counter): entries written by reloads
//! - `gray_config_store_entries` (gauge): entries currently held
//! - `gray_config_rule_cache_total` (counter): gray rule lookups by `result` (hit/miss)
//! - `gray_config_resubscribes_total` (counter): subscriptions rebuilt after failure
//! - `gray_config_session_state` (gauge): 0=subscribing, 1=active, 2=failed

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::watch::session::SessionState;

/// Install the Prometheus recorder and its HTTP scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_reload() {
    metrics::counter!("gray_config_reloads_total").increment(1);
}

pub fn record_entries_applied(count: usize) {
    metrics::counter!("gray_config_entries_applied_total").increment(count as u64);
}

pub fn record_store_size(entries: usize) {
    metrics::gauge!("gray_config_store_entries").set(entries as f64);
}

pub fn record_rule_cache(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    metrics::counter!("gray_config_rule_cache_total", "result" => result).increment(1);
}

pub fn record_resubscribe() {
    metrics::counter!("gray_config_resubscribes_total").increment(1);
}

pub fn record_session_state(state: SessionState) {
    metrics::gauge!("gray_config_session_state").set(f64::from(state as u8));
}
