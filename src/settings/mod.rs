//! Client settings subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (GRAY_CONFIG_APP, GRAY_CONFIG_MANAGER_ENDPOINT)
//!     → validation.rs (semantic checks)
//!     → ClientSettings (immutable)
//! ```
//!
//! # Design Decisions
//! - Settings are the client's own knobs; the config it serves comes from the feed
//! - All fields have defaults to allow minimal files
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_settings, SettingsError};
pub use schema::{BootstrapSettings, ClientSettings, ObservabilitySettings, WatchSettings};
pub use validation::{validate_settings, ValidationError};
