//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Change-feed subscription fails:
//!     → backoff.rs (exponential delay with jitter, capped)
//!     → watch session re-subscribes after the delay
//!     → first received batch resets the backoff
//! ```
//!
//! # Design Decisions
//! - Reconnection never gives up; only the delay is bounded
//! - Jittered backoff prevents thundering herd on the feed servers

pub mod backoff;

pub use backoff::{calculate_backoff, Backoff};
