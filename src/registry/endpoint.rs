//! Endpoint abstraction.
//!
//! # Responsibilities
//! - Represent a single configured RPC node
//! - Hold connection settings (credentials, timeout, TLS verification)
//! - Provide the identity key used for health and breaker bookkeeping

use std::time::Duration;

use crate::config::EndpointConfig;

/// A single RPC endpoint. Immutable after construction.
#[derive(Clone)]
pub struct Endpoint {
    /// Endpoint URL. Doubles as the endpoint's identity.
    pub url: String,
    /// Basic auth username.
    pub username: String,
    password: String,
    /// Selection priority (lower = preferred).
    pub priority: i32,
    /// Configured name, possibly empty.
    pub name: String,
    /// Deadline for a single call.
    pub timeout: Duration,
    /// Per-endpoint retry override.
    pub max_retries: Option<u32>,
    /// Verify the server certificate on https endpoints.
    pub verify_tls: bool,
}

impl Endpoint {
    pub fn from_config(config: &EndpointConfig) -> Self {
        Self {
            url: config.url.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            priority: config.priority,
            name: config.name.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
            max_retries: config.max_retries,
            verify_tls: config.verify_tls,
        }
    }

    /// Name for logs and status output, falling back to the URL.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.url
        } else {
            &self.name
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// True when the endpoint should be called with basic auth.
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty() || !self.password.is_empty()
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("url", &self.url)
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("verify_tls", &self.verify_tls)
            .finish_non_exhaustive()
    }
}
