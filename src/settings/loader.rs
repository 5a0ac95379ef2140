//! Settings loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::settings::schema::ClientSettings;
use crate::settings::validation::{validate_settings, ValidationError};

/// Environment variable overriding `app`.
pub const ENV_APP: &str = "GRAY_CONFIG_APP";
/// Environment variable overriding `manager_endpoint`.
pub const ENV_MANAGER_ENDPOINT: &str = "GRAY_CONFIG_MANAGER_ENDPOINT";

/// Error type for settings loading.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load settings from an optional TOML file, apply environment overrides and
/// validate the result.
pub fn load_settings(path: Option<&Path>) -> Result<ClientSettings, SettingsError> {
    let mut settings = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ClientSettings::default(),
    };

    apply_overrides(&mut settings, |name| std::env::var(name).ok());
    validate_settings(&settings).map_err(SettingsError::Validation)?;

    Ok(settings)
}

/// Apply overrides from `lookup` (normally the process environment).
///
/// Empty values are ignored.
pub fn apply_overrides<F>(settings: &mut ClientSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(app) = non_empty(ENV_APP) {
        settings.app = Some(app);
    }
    if let Some(endpoint) = non_empty(ENV_MANAGER_ENDPOINT) {
        settings.manager_endpoint = Some(endpoint);
    }
}
