//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! store / gray / watch subsystems produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters and gauges)
//!
//! Consumers:
//!     → stdout via tracing-subscriber
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields (namespace, key, state) rather than formatted strings
//! - Metric updates are cheap enough for the gray-check hot path
//! - Without an installed recorder every metric call is a no-op

pub mod logging;
pub mod metrics;
