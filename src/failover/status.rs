//! Point-in-time status report.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::health::state::HealthStatus;

/// Health of a single endpoint as seen by the manager.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointStatus {
    /// Configured name, or the URL when unnamed.
    pub name: String,
    pub url: String,
    pub priority: i32,
    pub status: HealthStatus,
    pub last_success: Option<DateTime<Utc>>,
    pub last_failure: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
    pub total_requests: u64,
    pub successful_requests: u64,
    /// `successful_requests / total_requests`, 0 when nothing was dispatched.
    pub success_rate: f64,
    pub avg_latency_ms: f64,
    pub circuit_open: bool,
}

impl EndpointStatus {
    /// Whether the dispatcher would consider this endpoint outside of the
    /// last-endpoint exception.
    pub fn is_usable(&self) -> bool {
        !self.circuit_open && self.status != HealthStatus::Unhealthy
    }
}

/// Snapshot of every endpoint, in registry (priority) order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub endpoints: Vec<EndpointStatus>,
}

impl StatusReport {
    pub fn usable_count(&self) -> usize {
        self.endpoints.iter().filter(|e| e.is_usable()).count()
    }

    pub fn healthy_count(&self) -> usize {
        self.endpoints
            .iter()
            .filter(|e| e.status == HealthStatus::Healthy)
            .count()
    }

    pub fn find(&self, url: &str) -> Option<&EndpointStatus> {
        self.endpoints.iter().find(|e| e.url == url)
    }
}
