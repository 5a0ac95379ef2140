//! Gray-release (canary) rule subsystem.
//!
//! # Data Flow
//! ```text
//! is_allowed(config_name, id)
//!     → engine.rs (cache hit? else read raw text from ConfigStore)
//!     → rule.rs (parse "allow;alice;%10" → GrayRule)
//!     → identifier.rs (membership key + bucket key for the id)
//!     → bool
//!
//! On reload:
//!     watch session → reset_gray_config_cache() → next lookup re-parses
//! ```
//!
//! # Design Decisions
//! - Fail closed: absent or unparsable rules deny
//! - The cache is derived data; it is cleared wholesale, never patched
//! - String and integer ids share one evaluation core via `GrayId`

pub mod engine;
pub mod identifier;
pub mod rule;

pub use engine::GrayRuleEngine;
pub use identifier::{string_hash, GrayId};
pub use rule::{is_allowed, GrayRule, RuleType};
