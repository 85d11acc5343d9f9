//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, retries > 0)
//! - Detect duplicate endpoints
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FailoverConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use thiserror::Error;
use url::Url;

use crate::config::schema::FailoverConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("at least one RPC endpoint is required")]
    NoEndpoints,

    #[error("endpoint #{index} has an empty url")]
    EmptyUrl { index: usize },

    #[error("endpoint '{url}' is not a valid url: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("endpoint '{url}' uses unsupported scheme '{scheme}'")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("endpoint '{url}' is configured more than once")]
    DuplicateUrl { url: String },

    #[error("endpoint '{url}' has a zero timeout")]
    ZeroTimeout { url: String },

    #[error("endpoint '{url}' sets max_retries to 0")]
    ZeroEndpointRetries { url: String },

    #[error("environment variable '{var}' for endpoint '{url}' is not set")]
    MissingPasswordEnv { url: String, var: String },

    #[error("retries.max_retries must be at least 1")]
    ZeroRetries,

    #[error("circuit_breaker.threshold must be at least 1")]
    ZeroBreakerThreshold,

    #[error("health_check.interval_ms must be greater than 0")]
    ZeroProbeInterval,

    #[error("health_check.probe_method must not be empty")]
    EmptyProbeMethod,
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &FailoverConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.endpoints.is_empty() {
        errors.push(ValidationError::NoEndpoints);
    }

    let mut seen = HashSet::new();
    for (index, endpoint) in config.endpoints.iter().enumerate() {
        if endpoint.url.trim().is_empty() {
            errors.push(ValidationError::EmptyUrl { index });
            continue;
        }

        match Url::parse(&endpoint.url) {
            Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
                errors.push(ValidationError::UnsupportedScheme {
                    url: endpoint.url.clone(),
                    scheme: url.scheme().to_string(),
                });
            }
            Ok(_) => {}
            Err(e) => errors.push(ValidationError::InvalidUrl {
                url: endpoint.url.clone(),
                reason: e.to_string(),
            }),
        }

        if !seen.insert(endpoint.url.as_str()) {
            errors.push(ValidationError::DuplicateUrl { url: endpoint.url.clone() });
        }
        if endpoint.timeout_ms == 0 {
            errors.push(ValidationError::ZeroTimeout { url: endpoint.url.clone() });
        }
        if endpoint.max_retries == Some(0) {
            errors.push(ValidationError::ZeroEndpointRetries { url: endpoint.url.clone() });
        }
    }

    if config.retries.max_retries == 0 {
        errors.push(ValidationError::ZeroRetries);
    }
    if config.circuit_breaker.threshold == 0 {
        errors.push(ValidationError::ZeroBreakerThreshold);
    }
    if config.health_check.interval_ms == 0 {
        errors.push(ValidationError::ZeroProbeInterval);
    }
    if config.health_check.probe_method.trim().is_empty() {
        errors.push(ValidationError::EmptyProbeMethod);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
