//! Runtime configuration client with gray-release rules.
//!
//! # Architecture Overview
//!
//! ```text
//!   bootstrap ──▶ (endpoints, watch key)
//!                        │
//!                        ▼
//!                 ┌──────────────┐   batches   ┌───────────────┐
//!                 │ watch session│◀────────────│  change feed  │
//!                 └──────┬───────┘             └───────────────┘
//!                        │ reload blob
//!                        ▼
//!                 ┌──────────────┐  raw rule   ┌───────────────┐
//!   get / get_* ─▶│ config store │────────────▶│  gray engine  │◀── is_allowed
//!                 └──────────────┘             └───────────────┘
//!                        ▲                              │
//!                        └──────── cache reset ◀────────┘ (after every reload)
//! ```

pub mod bootstrap;
pub mod gray;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod settings;
pub mod store;
pub mod watch;

pub use bootstrap::{Bootstrap, HttpBootstrap, WatchTarget};
pub use gray::{GrayRule, GrayRuleEngine, RuleType};
pub use lifecycle::ConfigClient;
pub use settings::ClientSettings;
pub use store::ConfigStore;
pub use watch::{ChangeFeed, FileFeed, WatchSession};
