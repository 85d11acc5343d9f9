//! Shared health and breaker state.
//!
//! # Responsibilities
//! - Own every HealthRecord and the breaker map behind one mutex
//! - Apply call and probe outcomes as atomic transitions
//! - Answer eligibility checks for the dispatcher
//! - Produce consistent status snapshots
//!
//! # Design Decisions
//! - One coarse lock for the whole manager; mutation rate is low
//! - Callers never hold the lock across network I/O
//! - Calls and probes share `mark_success` / `mark_failure`, so status
//!   semantics never diverge between "probed" and "actually used"
//! - Only dispatched calls count toward total/successful request counters
//! - A probe success marks the endpoint Healthy but leaves an open breaker
//!   in place until it expires

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::failover::status::{EndpointStatus, StatusReport};
use crate::health::state::{HealthRecord, HealthStatus};
use crate::observability::metrics;
use crate::registry::{eligibility, Eligibility, Endpoint, EndpointRegistry};
use crate::resilience::CircuitBreakers;

#[derive(Debug)]
struct TrackerState {
    /// Index-aligned with the registry.
    records: Vec<HealthRecord>,
    breakers: CircuitBreakers,
}

/// Which path produced an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    Call,
    Probe,
}

#[derive(Debug)]
pub struct HealthTracker {
    state: Mutex<TrackerState>,
    breaker_threshold: u32,
}

impl HealthTracker {
    pub fn new(endpoint_count: usize, breaker_threshold: u32, breaker_timeout: Duration) -> Self {
        Self {
            state: Mutex::new(TrackerState {
                records: vec![HealthRecord::default(); endpoint_count],
                breakers: CircuitBreakers::new(breaker_timeout),
            }),
            breaker_threshold: breaker_threshold.max(1),
        }
    }

    // Every transition leaves the state consistent, so a poisoned lock is safe to reuse.
    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether the dispatcher may try the endpoint at `index` now. Clears an
    /// expired breaker as a side effect.
    pub fn eligibility(&self, index: usize, endpoint: &Endpoint, is_last: bool) -> Eligibility {
        let mut state = self.lock();
        let breaker_open = state.breakers.is_open(&endpoint.url);
        let status = state
            .records
            .get(index)
            .map(|r| r.status)
            .unwrap_or_default();
        eligibility(status, breaker_open, is_last)
    }

    /// Apply a success observed by the dispatcher or the prober.
    pub fn record_success(&self, index: usize, endpoint: &Endpoint, latency: Duration, source: Observation) {
        let mut state = self.lock();
        let Some(record) = state.records.get_mut(index) else {
            return;
        };

        if source == Observation::Call {
            record.total_requests += 1;
            record.successful_requests += 1;
        }
        let previous = record.mark_success(latency);
        // An open breaker only yields to its timeout or a dispatched call.
        if source == Observation::Call {
            state.breakers.close(&endpoint.url);
        }
        drop(state);

        if source == Observation::Call && previous != HealthStatus::Healthy {
            tracing::info!(
                endpoint = %endpoint.display_name(),
                previous = %previous,
                "Endpoint recovered"
            );
        }
        metrics::record_endpoint_health(endpoint.display_name(), HealthStatus::Healthy);
    }

    /// Apply a failure observed by the dispatcher (after retries were spent)
    /// or by the prober.
    pub fn record_failure(&self, index: usize, endpoint: &Endpoint, source: Observation) {
        let mut state = self.lock();
        if source == Observation::Call {
            if let Some(record) = state.records.get_mut(index) {
                record.total_requests += 1;
            }
        }
        self.mark_failure(&mut state, index, endpoint);
    }

    /// The failure transition. The only place a breaker opens.
    fn mark_failure(&self, state: &mut TrackerState, index: usize, endpoint: &Endpoint) {
        let Some(record) = state.records.get_mut(index) else {
            return;
        };

        let status = record.mark_failure(self.breaker_threshold);
        let failures = record.consecutive_failures;
        if status == HealthStatus::Unhealthy {
            state.breakers.open(&endpoint.url, Instant::now());
            tracing::error!(
                endpoint = %endpoint.display_name(),
                failures,
                "Circuit breaker opened"
            );
            metrics::record_breaker_opened(endpoint.display_name());
        }
        metrics::record_endpoint_health(endpoint.display_name(), status);
    }

    /// Copy of one endpoint's record.
    pub fn record(&self, index: usize) -> Option<HealthRecord> {
        self.lock().records.get(index).cloned()
    }

    /// Current breaker state for an endpoint, clearing it if expired.
    pub fn is_circuit_open(&self, endpoint: &Endpoint) -> bool {
        self.lock().breakers.is_open(&endpoint.url)
    }

    /// Consistent view of every endpoint, taken under the lock.
    pub fn snapshot(&self, registry: &EndpointRegistry) -> StatusReport {
        let mut state = self.lock();
        let mut endpoints = Vec::with_capacity(registry.len());

        for (index, endpoint) in registry.iter().enumerate() {
            let circuit_open = state.breakers.is_open(&endpoint.url);
            let record = state.records.get(index).cloned().unwrap_or_default();
            endpoints.push(EndpointStatus {
                name: endpoint.display_name().to_string(),
                url: endpoint.url.clone(),
                priority: endpoint.priority,
                status: record.status,
                last_success: record.last_success,
                last_failure: record.last_failure,
                consecutive_failures: record.consecutive_failures,
                total_requests: record.total_requests,
                successful_requests: record.successful_requests,
                success_rate: record.success_rate(),
                avg_latency_ms: record.avg_latency_ms,
                circuit_open,
            });
        }

        StatusReport { endpoints }
    }
}
