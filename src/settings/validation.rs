//! Settings validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientSettings → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use thiserror::Error;

use crate::bootstrap::http::watchers_url;
use crate::settings::schema::ClientSettings;

/// Upper bound for `watch.backoff_max_ms` (one hour).
pub const MAX_BACKOFF_MS: u64 = 60 * 60 * 1000;

/// A single semantic problem in the settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("bootstrap.timeout_secs must be greater than 0")]
    ZeroBootstrapTimeout,

    #[error("watch.backoff_base_ms must be greater than 0")]
    ZeroBackoffBase,

    #[error("watch.backoff_max_ms ({max}) must be >= watch.backoff_base_ms ({base})")]
    BackoffRange { base: u64, max: u64 },

    #[error("watch.backoff_max_ms ({0}) must be <= {max}", max = MAX_BACKOFF_MS)]
    BackoffTooLarge(u64),

    #[error("manager_endpoint '{0}' is not a valid address")]
    InvalidManagerEndpoint(String),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check settings for semantic errors.
pub fn validate_settings(settings: &ClientSettings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if settings.bootstrap.timeout_secs == 0 {
        errors.push(ValidationError::ZeroBootstrapTimeout);
    }

    let watch = &settings.watch;
    if watch.backoff_base_ms == 0 {
        errors.push(ValidationError::ZeroBackoffBase);
    }
    if watch.backoff_max_ms < watch.backoff_base_ms {
        errors.push(ValidationError::BackoffRange {
            base: watch.backoff_base_ms,
            max: watch.backoff_max_ms,
        });
    }
    if watch.backoff_max_ms > MAX_BACKOFF_MS {
        errors.push(ValidationError::BackoffTooLarge(watch.backoff_max_ms));
    }

    if let Some(endpoint) = settings.manager_endpoint.as_deref() {
        if watchers_url(endpoint, &settings.bootstrap.path).is_err() {
            errors.push(ValidationError::InvalidManagerEndpoint(endpoint.to_string()));
        }
    }

    let observability = &settings.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_settings(&ClientSettings::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut settings = ClientSettings::default();
        settings.bootstrap.timeout_secs = 0;
        settings.watch.backoff_base_ms = 500;
        settings.watch.backoff_max_ms = 100;
        settings.manager_endpoint = Some("http://bad host".to_string());
        settings.observability.metrics_enabled = true;
        settings.observability.metrics_address = "nowhere".to_string();

        let errors = validate_settings(&settings).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::ZeroBootstrapTimeout,
                ValidationError::BackoffRange { base: 500, max: 100 },
                ValidationError::InvalidManagerEndpoint("http://bad host".to_string()),
                ValidationError::InvalidMetricsAddress("nowhere".to_string()),
            ]
        );
    }

    #[test]
    fn test_rejects_unbounded_backoff() {
        let mut settings = ClientSettings::default();
        settings.watch.backoff_base_ms = u64::MAX;
        settings.watch.backoff_max_ms = u64::MAX;
        assert_eq!(
            validate_settings(&settings).unwrap_err(),
            vec![ValidationError::BackoffTooLarge(u64::MAX)]
        );

        settings.watch.backoff_base_ms = 1_000;
        settings.watch.backoff_max_ms = MAX_BACKOFF_MS;
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_metrics_address_ignored_when_disabled() {
        let mut settings = ClientSettings::default();
        settings.observability.metrics_address = "nowhere".to_string();
        assert!(validate_settings(&settings).is_ok());
    }
}
