//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the failover
//! manager. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the failover manager and its daemon.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FailoverConfig {
    /// RPC endpoint definitions, in any order (sorted by priority at startup).
    pub endpoints: Vec<EndpointConfig>,

    /// Background health probe settings.
    pub health_check: HealthCheckConfig,

    /// Per-endpoint retry settings.
    pub retries: RetryConfig,

    /// Circuit breaker settings.
    pub circuit_breaker: CircuitBreakerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Status surface settings.
    pub admin: AdminConfig,
}

/// A single JSON-RPC endpoint.
#[derive(Clone, Deserialize, Serialize)]
pub struct EndpointConfig {
    /// Endpoint URL (e.g., "https://node-1.internal:8332").
    pub url: String,

    /// Basic auth username.
    #[serde(default)]
    pub username: String,

    /// Basic auth password. Prefer `password_env` outside of local setups.
    #[serde(default)]
    pub password: String,

    /// Environment variable holding the password, resolved at load time.
    #[serde(default)]
    pub password_env: Option<String>,

    /// Selection priority (lower = preferred).
    #[serde(default)]
    pub priority: i32,

    /// Human readable name for logs and status output.
    #[serde(default)]
    pub name: String,

    /// Per-call timeout in milliseconds.
    #[serde(default = "default_endpoint_timeout_ms")]
    pub timeout_ms: u64,

    /// Overrides the manager-wide retry count for this endpoint.
    #[serde(default)]
    pub max_retries: Option<u32>,

    /// Verify the server certificate on https endpoints.
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,
}

fn default_endpoint_timeout_ms() -> u64 {
    30_000
}

fn default_verify_tls() -> bool {
    true
}

impl EndpointConfig {
    /// Endpoint with default settings for the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: String::new(),
            password: String::new(),
            password_env: None,
            priority: 0,
            name: String::new(),
            timeout_ms: default_endpoint_timeout_ms(),
            max_retries: None,
            verify_tls: default_verify_tls(),
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }
}

impl std::fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("password_env", &self.password_env)
            .field("priority", &self.priority)
            .field("name", &self.name)
            .field("timeout_ms", &self.timeout_ms)
            .field("max_retries", &self.max_retries)
            .field("verify_tls", &self.verify_tls)
            .finish()
    }
}

/// Health probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Run the background prober when the manager starts.
    pub enabled: bool,

    /// Delay between probe cycles in milliseconds.
    pub interval_ms: u64,

    /// Read-only RPC method used as the probe.
    pub probe_method: String,

    /// How long `stop()` waits for the prober task before aborting it.
    pub stop_timeout_ms: u64,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: 30_000,
            probe_method: "getblockcount".to_string(),
            stop_timeout_ms: 5_000,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts per endpoint before failing over.
    pub max_retries: u32,

    /// Backoff time unit in milliseconds. Attempt `k` waits `2^k` units plus jitter.
    pub backoff_unit_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_unit_ms: 1_000,
        }
    }
}

/// Circuit breaker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures before the breaker opens.
    pub threshold: u32,

    /// How long an open breaker stays open, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            threshold: 5,
            timeout_ms: 60_000,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Status surface configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Serve `/status` and `/health`.
    pub enabled: bool,

    /// Bind address for the status surface.
    pub bind_address: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: "127.0.0.1:8081".to_string(),
        }
    }
}
