//! Metrics collection and exposition.
//!
//! # Metrics
//! - `rpc_failover_calls_total` (counter): dispatched calls by method, outcome
//! - `rpc_failover_call_duration_seconds` (histogram): end-to-end call latency
//! - `rpc_failover_endpoint_attempts_total` (counter): per-endpoint outcomes
//! - `rpc_failover_endpoint_skips_total` (counter): ineligible endpoints by reason
//! - `rpc_failover_endpoint_health` (gauge): 0=unknown 1=healthy 2=degraded 3=unhealthy
//! - `rpc_failover_breaker_opened_total` (counter): breaker trips per endpoint
//! - `rpc_failover_probes_total` (counter): health probe outcomes
//!
//! Without an installed recorder every call here is a no-op.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

use crate::health::state::HealthStatus;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_call(method: &str, outcome: &'static str, start: Instant) {
    counter!("rpc_failover_calls_total", "method" => method.to_string(), "outcome" => outcome).increment(1);
    histogram!("rpc_failover_call_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_endpoint_attempt(endpoint: &str, outcome: &'static str) {
    counter!(
        "rpc_failover_endpoint_attempts_total",
        "endpoint" => endpoint.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_endpoint_skip(endpoint: &str, reason: &'static str) {
    counter!(
        "rpc_failover_endpoint_skips_total",
        "endpoint" => endpoint.to_string(),
        "reason" => reason
    )
    .increment(1);
}

pub fn record_endpoint_health(endpoint: &str, status: HealthStatus) {
    gauge!("rpc_failover_endpoint_health", "endpoint" => endpoint.to_string()).set(status.as_gauge());
}

pub fn record_breaker_opened(endpoint: &str) {
    counter!("rpc_failover_breaker_opened_total", "endpoint" => endpoint.to_string()).increment(1);
}

pub fn record_probe(endpoint: &str, outcome: &'static str) {
    counter!("rpc_failover_probes_total", "endpoint" => endpoint.to_string(), "outcome" => outcome)
        .increment(1);
}
