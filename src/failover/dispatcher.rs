//! Priority-ordered call dispatch.
//!
//! # Responsibilities
//! - Walk the registry in priority order, skipping ineligible endpoints
//! - Run the retry loop against one endpoint at a time
//! - Commit each endpoint's outcome to the health tracker
//!
//! # Design Decisions
//! - The tracker lock is taken for selection and bookkeeping only, never
//!   across a send or a backoff sleep
//! - An endpoint that exhausted its retries is not revisited within a call

use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;

use crate::failover::error::{FailoverError, FailoverResult};
use crate::health::tracker::{HealthTracker, Observation};
use crate::observability::metrics;
use crate::registry::{Endpoint, EndpointRegistry};
use crate::resilience::{with_deadline, RetryPolicy};
use crate::rpc::{RpcError, RpcRequest, RpcResult, RpcTransport};

pub struct Dispatcher {
    registry: Arc<EndpointRegistry>,
    tracker: Arc<HealthTracker>,
    transport: Arc<dyn RpcTransport>,
    retry: RetryPolicy,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<EndpointRegistry>,
        tracker: Arc<HealthTracker>,
        transport: Arc<dyn RpcTransport>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            registry,
            tracker,
            transport,
            retry,
        }
    }

    /// Execute `request` against the first endpoint that answers.
    pub async fn dispatch(&self, request: RpcRequest) -> FailoverResult<Value> {
        let span = tracing::info_span!("rpc_call", request_id = %request.id, method = %request.method);
        self.dispatch_inner(&request).instrument(span).await
    }

    async fn dispatch_inner(&self, request: &RpcRequest) -> FailoverResult<Value> {
        let start = Instant::now();
        let mut last_error: Option<RpcError> = None;

        for (index, endpoint) in self.registry.iter().enumerate() {
            let eligibility = self
                .tracker
                .eligibility(index, endpoint, self.registry.is_last(index));
            if !eligibility.is_eligible() {
                tracing::debug!(
                    endpoint = %endpoint.display_name(),
                    reason = ?eligibility,
                    "Skipping endpoint"
                );
                metrics::record_endpoint_skip(endpoint.display_name(), eligibility.as_str());
                continue;
            }

            match self.attempt(endpoint, request).await {
                Ok((value, latency)) => {
                    self.tracker
                        .record_success(index, endpoint, latency, Observation::Call);
                    metrics::record_endpoint_attempt(endpoint.display_name(), "success");
                    metrics::record_call(&request.method, "success", start);
                    tracing::debug!(
                        endpoint = %endpoint.display_name(),
                        latency_ms = latency.as_secs_f64() * 1000.0,
                        "Call succeeded"
                    );
                    return Ok(value);
                }
                Err(e) => {
                    tracing::warn!(
                        endpoint = %endpoint.display_name(),
                        error = %e,
                        "Endpoint failed, trying next"
                    );
                    self.tracker.record_failure(index, endpoint, Observation::Call);
                    metrics::record_endpoint_attempt(endpoint.display_name(), "failure");
                    last_error = Some(e);
                }
            }
        }

        match &last_error {
            Some(e) => tracing::error!(error = %e, "All RPC endpoints failed"),
            None => tracing::error!("No RPC endpoint was eligible"),
        }
        metrics::record_call(&request.method, "exhausted", start);
        Err(FailoverError::Exhausted {
            method: request.method.clone(),
            last_error,
        })
    }

    /// The per-endpoint retry loop. Returns the latency of the successful
    /// attempt.
    async fn attempt(&self, endpoint: &Endpoint, request: &RpcRequest) -> RpcResult<(Value, Duration)> {
        let transport = self.transport.as_ref();
        self.retry
            .for_endpoint(endpoint)
            .run(move |attempt| async move {
                tracing::trace!(endpoint = %endpoint.display_name(), attempt = attempt + 1, "Sending");
                let start = Instant::now();
                let value = with_deadline(endpoint.timeout, transport.send(endpoint, request)).await?;
                Ok((value, start.elapsed()))
            })
            .await
    }
}
