//! Active health checking.
//!
//! # Responsibilities
//! - Periodically probe every endpoint, whatever its breaker or health state
//! - Feed outcomes into the shared health tracker

use futures_util::future::join_all;
use futures_util::FutureExt;
use serde_json::Value;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use crate::health::tracker::{HealthTracker, Observation};
use crate::observability::metrics;
use crate::registry::{Endpoint, EndpointRegistry};
use crate::resilience::with_deadline;
use crate::rpc::{RpcError, RpcRequest, RpcTransport};

pub struct HealthProber {
    registry: Arc<EndpointRegistry>,
    tracker: Arc<HealthTracker>,
    transport: Arc<dyn RpcTransport>,
    interval: Duration,
    probe_method: String,
}

impl HealthProber {
    pub fn new(
        registry: Arc<EndpointRegistry>,
        tracker: Arc<HealthTracker>,
        transport: Arc<dyn RpcTransport>,
        interval: Duration,
        probe_method: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            tracker,
            transport,
            // tokio::time::interval panics on a zero period.
            interval: interval.max(Duration::from_millis(1)),
            probe_method: probe_method.into(),
        }
    }

    /// Probe on every tick until shutdown is signalled. The first cycle runs
    /// immediately.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            method = %self.probe_method,
            endpoints = self.registry.len(),
            "Health prober starting"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(panic) = AssertUnwindSafe(self.check_all()).catch_unwind().await {
                        tracing::error!(error = %panic_message(panic.as_ref()), "Health check cycle panicked");
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Health prober received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Run one probe cycle across all endpoints concurrently.
    pub async fn check_all(&self) {
        let probes = self
            .registry
            .iter()
            .enumerate()
            .map(|(index, endpoint)| self.probe(index, endpoint));
        join_all(probes).await;
    }

    async fn probe(&self, index: usize, endpoint: &Endpoint) {
        let request = RpcRequest::new(self.probe_method.clone(), Vec::new());
        let start = Instant::now();

        let outcome = with_deadline(endpoint.timeout, self.transport.send(endpoint, &request))
            .await
            .and_then(|value| match value {
                Value::Null => Err(RpcError::EmptyResult),
                other => Ok(other),
            });
        let latency = start.elapsed();

        match outcome {
            Ok(_) => {
                tracing::debug!(
                    endpoint = %endpoint.display_name(),
                    latency_ms = latency.as_secs_f64() * 1000.0,
                    "Health check OK"
                );
                self.tracker.record_success(index, endpoint, latency, Observation::Probe);
                metrics::record_probe(endpoint.display_name(), "success");
            }
            Err(e) => {
                tracing::warn!(endpoint = %endpoint.display_name(), error = %e, "Health check failed");
                self.tracker.record_failure(index, endpoint, Observation::Probe);
                metrics::record_probe(endpoint.display_name(), "failure");
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EndpointConfig;
    use crate::health::state::HealthStatus;
    use crate::lifecycle::Shutdown;
    use crate::rpc::RpcResult;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Answers probes for "http://up" and fails everything else.
    struct UpDownTransport {
        probes: AtomicUsize,
        panic_once: AtomicBool,
    }

    #[async_trait]
    impl RpcTransport for UpDownTransport {
        async fn send(&self, endpoint: &Endpoint, request: &RpcRequest) -> RpcResult<Value> {
            self.probes.fetch_add(1, Ordering::SeqCst);
            assert!(request.params.is_empty());
            if self.panic_once.swap(false, Ordering::SeqCst) {
                panic!("transport exploded");
            }
            match endpoint.url.as_str() {
                "http://up" => Ok(json!(840_000)),
                "http://null" => Ok(Value::Null),
                _ => Err(RpcError::Transport("connection refused".into())),
            }
        }
    }

    fn setup(urls: &[&str], panic_once: bool) -> (Arc<EndpointRegistry>, Arc<HealthTracker>, Arc<UpDownTransport>) {
        let configs: Vec<EndpointConfig> = urls
            .iter()
            .enumerate()
            .map(|(i, url)| EndpointConfig::new(*url).with_priority(i as i32))
            .collect();
        let registry = Arc::new(EndpointRegistry::new(&configs).unwrap());
        let tracker = Arc::new(HealthTracker::new(registry.len(), 2, Duration::from_secs(60)));
        let transport = Arc::new(UpDownTransport {
            probes: AtomicUsize::new(0),
            panic_once: AtomicBool::new(panic_once),
        });
        (registry, tracker, transport)
    }

    #[tokio::test]
    async fn test_cycle_updates_every_endpoint() {
        let (registry, tracker, transport) = setup(&["http://up", "http://down", "http://null"], false);
        let prober = HealthProber::new(
            registry.clone(),
            tracker.clone(),
            transport.clone(),
            Duration::from_secs(30),
            "getblockcount",
        );

        prober.check_all().await;
        assert_eq!(transport.probes.load(Ordering::SeqCst), 3);

        let up = tracker.record(0).unwrap();
        assert_eq!(up.status, HealthStatus::Healthy);
        assert!(up.avg_latency_ms >= 0.0);
        assert_eq!(up.total_requests, 0);

        assert_eq!(tracker.record(1).unwrap().status, HealthStatus::Degraded);
        assert_eq!(tracker.record(2).unwrap().status, HealthStatus::Degraded);

        prober.check_all().await;
        assert_eq!(tracker.record(1).unwrap().status, HealthStatus::Unhealthy);
        assert!(tracker.is_circuit_open(registry.get(1).unwrap()));
    }

    #[tokio::test]
    async fn test_probes_endpoints_with_open_breaker() {
        let (registry, tracker, transport) = setup(&["http://down"], false);
        let down = registry.get(0).unwrap();
        tracker.record_failure(0, down, Observation::Call);
        tracker.record_failure(0, down, Observation::Call);
        assert!(tracker.is_circuit_open(down));

        let prober = HealthProber::new(registry.clone(), tracker, transport.clone(), Duration::from_secs(30), "getblockcount");
        prober.check_all().await;
        assert_eq!(transport.probes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_interval_keeps_loop_alive() {
        let (registry, tracker, transport) = setup(&["http://up"], false);
        let prober = HealthProber::new(registry, tracker.clone(), transport.clone(), Duration::ZERO, "getblockcount");

        let shutdown = Shutdown::new();
        let handle = tokio::spawn(prober.run(shutdown.subscribe()));

        time::sleep(Duration::from_millis(30)).await;
        assert!(!handle.is_finished());
        shutdown.trigger();
        time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("prober did not stop")
            .expect("prober task failed");

        assert!(transport.probes.load(Ordering::SeqCst) >= 1);
        assert_eq!(tracker.record(0).unwrap().status, HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn test_loop_survives_panic_and_stops_on_shutdown() {
        let (registry, tracker, transport) = setup(&["http://up"], true);
        let prober = HealthProber::new(
            registry,
            tracker.clone(),
            transport.clone(),
            Duration::from_millis(10),
            "getblockcount",
        );

        let shutdown = Shutdown::new();
        let handle = tokio::spawn(prober.run(shutdown.subscribe()));

        time::sleep(Duration::from_millis(100)).await;
        shutdown.trigger();
        time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("prober did not stop")
            .expect("prober task failed");

        assert!(transport.probes.load(Ordering::SeqCst) >= 2);
        assert_eq!(tracker.record(0).unwrap().status, HealthStatus::Healthy);
    }
}
