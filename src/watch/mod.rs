//! Watch/refresh subsystem.
//!
//! # Data Flow
//! ```text
//! (endpoints, watch key) from bootstrap
//!     → session.rs subscribes through a ChangeFeed (feed.rs)
//!     → batch of WatchEvents arrives
//!     → Put with payload: ConfigStore::reload_config_content
//!                         → GrayRuleEngine::reset_gray_config_cache
//!     → transport failure: drop subscription, back off, re-subscribe
//! ```
//!
//! # Design Decisions
//! - The transport is a trait; `file_feed.rs` is the bundled implementation
//! - One writer task; all readers go straight to the store
//! - Transport failures never reach store or gray callers; they keep the last
//!   loaded state

pub mod feed;
pub mod file_feed;
pub mod session;

pub use feed::{ChangeFeed, EventKind, FeedError, Subscription, WatchEvent};
pub use file_feed::FileFeed;
pub use session::{SessionState, SessionStatus, WatchSession};
