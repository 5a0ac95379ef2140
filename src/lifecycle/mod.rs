//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validate app → Bootstrap → Validate target → Spawn watch session
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → binary exits; the session dies with the process
//! ```
//!
//! # Design Decisions
//! - Fail fast: bootstrap errors are returned, never retried here
//! - The session has no stop API; it lives as long as the runtime

pub mod signals;
pub mod startup;

pub use signals::wait_for_shutdown;
pub use startup::{ConfigClient, StartError};
