//! Endpoint health state machine.
//!
//! # States
//! - Unknown: never observed
//! - Healthy: last observation succeeded
//! - Degraded: failing, below the breaker threshold
//! - Unhealthy: consecutive failures reached the breaker threshold
//!
//! # State Transitions
//! ```text
//! any → Healthy:    one success (counter reset to 0)
//! any → Degraded:   failure with consecutive_failures < threshold
//! any → Unhealthy:  failure with consecutive_failures >= threshold
//! ```
//!
//! Status is derived from the failure counter. `mark_failure` is the only
//! failure transition; calls and probes both go through it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Weight kept from the previous latency average on each new sample.
const LATENCY_RETAIN: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    #[default]
    Unknown,
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            HealthStatus::Unknown => "unknown",
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Unhealthy => "unhealthy",
        }
    }

    /// Numeric encoding for gauges.
    pub fn as_gauge(self) -> f64 {
        match self {
            HealthStatus::Unknown => 0.0,
            HealthStatus::Healthy => 1.0,
            HealthStatus::Degraded => 2.0,
            HealthStatus::Unhealthy => 3.0,
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable health bookkeeping for one endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HealthRecord {
    pub status: HealthStatus,
    pub last_success: Option<DateTime<Utc>>,
    pub last_failure: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
    pub total_requests: u64,
    pub successful_requests: u64,
    /// Exponentially smoothed latency in milliseconds; 0 until the first sample.
    pub avg_latency_ms: f64,
}

impl HealthRecord {
    /// Record a successful observation. Returns the status before the transition.
    pub fn mark_success(&mut self, latency: Duration) -> HealthStatus {
        let previous = self.status;
        self.status = HealthStatus::Healthy;
        self.last_success = Some(Utc::now());
        self.consecutive_failures = 0;
        self.record_latency(latency);
        previous
    }

    /// Record a failed observation. Returns the status after the transition.
    pub fn mark_failure(&mut self, threshold: u32) -> HealthStatus {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.last_failure = Some(Utc::now());
        self.status = if self.consecutive_failures >= threshold {
            HealthStatus::Unhealthy
        } else {
            HealthStatus::Degraded
        };
        self.status
    }

    pub fn record_latency(&mut self, latency: Duration) {
        let sample = latency.as_secs_f64() * 1000.0;
        self.avg_latency_ms = if self.avg_latency_ms == 0.0 {
            sample
        } else {
            self.avg_latency_ms * LATENCY_RETAIN + sample * (1.0 - LATENCY_RETAIN)
        };
    }

    /// Fraction of dispatched requests that succeeded, 0 when none were made.
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.successful_requests as f64 / self.total_requests as f64
        }
    }
}
