//! Config store subsystem.
//!
//! # Data Flow
//! ```text
//! change feed payload (reload blob)
//!     → parser.rs (lines → (namespace, key, value))
//!     → config_store.rs (insert-or-overwrite, merge only)
//!     → readers: get / get_by_name / typed getters (convert.rs)
//! ```
//!
//! # Design Decisions
//! - Reload merges; nothing is ever pruned
//! - Reload is applied entry by entry, not atomically per document
//! - Every lookup failure resolves to "no value", never an error

pub mod config_store;
pub mod convert;
pub mod parser;

pub use config_store::ConfigStore;
pub use convert::FromConfigValue;
pub use parser::{parse_entries, split_config_name, ConfigEntry};
