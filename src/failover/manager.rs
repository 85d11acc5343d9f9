//! The failover manager: public entry point of the crate.

use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::config::{EndpointConfig, FailoverConfig};
use crate::failover::dispatcher::Dispatcher;
use crate::failover::error::{FailoverError, FailoverResult};
use crate::failover::status::StatusReport;
use crate::health::{HealthProber, HealthTracker};
use crate::lifecycle::Shutdown;
use crate::registry::EndpointRegistry;
use crate::resilience::RetryPolicy;
use crate::rpc::{HttpTransport, RpcRequest, RpcTransport};

/// Manager-wide tunables. Endpoint-level overrides live on [`EndpointConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct FailoverSettings {
    pub health_checks_enabled: bool,
    pub health_check_interval: Duration,
    pub probe_method: String,
    /// How long `stop` waits for the prober before aborting it.
    pub stop_timeout: Duration,
    pub max_retries: u32,
    pub backoff_unit: Duration,
    pub breaker_threshold: u32,
    pub breaker_timeout: Duration,
}

impl Default for FailoverSettings {
    fn default() -> Self {
        Self {
            health_checks_enabled: true,
            health_check_interval: Duration::from_secs(30),
            probe_method: "getblockcount".to_string(),
            stop_timeout: Duration::from_secs(5),
            max_retries: 3,
            backoff_unit: Duration::from_secs(1),
            breaker_threshold: 5,
            breaker_timeout: Duration::from_secs(60),
        }
    }
}

impl FailoverSettings {
    /// Reject settings the prober or dispatcher cannot run with. Mirrors the
    /// checks `validate_config` applies to file-based configuration.
    pub fn validate(&self) -> FailoverResult<()> {
        if self.health_checks_enabled {
            if self.health_check_interval.is_zero() {
                return Err(FailoverError::InvalidSettings("health check interval must be non-zero"));
            }
            if self.probe_method.trim().is_empty() {
                return Err(FailoverError::InvalidSettings("probe method must not be empty"));
            }
        }
        Ok(())
    }

    pub fn from_config(config: &FailoverConfig) -> Self {
        Self {
            health_checks_enabled: config.health_check.enabled,
            health_check_interval: Duration::from_millis(config.health_check.interval_ms),
            probe_method: config.health_check.probe_method.clone(),
            stop_timeout: Duration::from_millis(config.health_check.stop_timeout_ms),
            max_retries: config.retries.max_retries,
            backoff_unit: Duration::from_millis(config.retries.backoff_unit_ms),
            breaker_threshold: config.circuit_breaker.threshold,
            breaker_timeout: Duration::from_millis(config.circuit_breaker.timeout_ms),
        }
    }
}

struct ProberHandle {
    shutdown: Shutdown,
    join: JoinHandle<()>,
}

/// Client-side failover across a prioritized set of JSON-RPC endpoints.
///
/// Construct it once and share it (typically behind an `Arc`); every method
/// takes `&self`.
pub struct FailoverManager {
    registry: Arc<EndpointRegistry>,
    tracker: Arc<HealthTracker>,
    transport: Arc<dyn RpcTransport>,
    dispatcher: Dispatcher,
    settings: FailoverSettings,
    prober: Mutex<Option<ProberHandle>>,
}

impl FailoverManager {
    /// Build a manager talking HTTP to the given endpoints.
    pub fn new(endpoints: &[EndpointConfig], settings: FailoverSettings) -> FailoverResult<Self> {
        let transport = HttpTransport::new().map_err(FailoverError::Transport)?;
        Self::with_transport(endpoints, settings, Arc::new(transport))
    }

    /// Build a manager over a custom transport.
    pub fn with_transport(
        endpoints: &[EndpointConfig],
        settings: FailoverSettings,
        transport: Arc<dyn RpcTransport>,
    ) -> FailoverResult<Self> {
        settings.validate()?;
        let registry = Arc::new(EndpointRegistry::new(endpoints)?);
        let tracker = Arc::new(HealthTracker::new(
            registry.len(),
            settings.breaker_threshold,
            settings.breaker_timeout,
        ));
        let dispatcher = Dispatcher::new(
            registry.clone(),
            tracker.clone(),
            transport.clone(),
            RetryPolicy::new(settings.max_retries, settings.backoff_unit),
        );

        tracing::info!(
            endpoints = registry.len(),
            primary = %registry.get(0).map(|e| e.display_name()).unwrap_or_default(),
            "Failover manager initialized"
        );

        Ok(Self {
            registry,
            tracker,
            transport,
            dispatcher,
            settings,
            prober: Mutex::new(None),
        })
    }

    pub fn from_config(config: &FailoverConfig) -> FailoverResult<Self> {
        Self::new(&config.endpoints, FailoverSettings::from_config(config))
    }

    fn prober_slot(&self) -> MutexGuard<'_, Option<ProberHandle>> {
        self.prober.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn build_prober(&self) -> HealthProber {
        HealthProber::new(
            self.registry.clone(),
            self.tracker.clone(),
            self.transport.clone(),
            self.settings.health_check_interval,
            self.settings.probe_method.clone(),
        )
    }

    /// Spawn the background health prober. Must be called within a tokio
    /// runtime. Calling it while the prober runs only logs a warning.
    pub fn start(&self) {
        if !self.settings.health_checks_enabled {
            tracing::info!("Health checks disabled, prober not started");
            return;
        }

        let mut slot = self.prober_slot();
        if slot.is_some() {
            tracing::warn!("Health prober already running");
            return;
        }

        let shutdown = Shutdown::new();
        let join = tokio::spawn(self.build_prober().run(shutdown.subscribe()));
        *slot = Some(ProberHandle { shutdown, join });
    }

    /// Stop the prober, waiting at most `stop_timeout` before aborting it.
    pub async fn stop(&self) {
        let handle = self.prober_slot().take();
        let Some(ProberHandle { shutdown, mut join }) = handle else {
            return;
        };

        if shutdown.trigger() == 0 {
            tracing::debug!("Health prober already exited");
        }
        match tokio::time::timeout(self.settings.stop_timeout, &mut join).await {
            Ok(Ok(())) => tracing::info!("Health prober stopped"),
            Ok(Err(e)) => tracing::error!(error = %e, "Health prober task failed"),
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.settings.stop_timeout.as_millis() as u64,
                    "Health prober did not stop in time, aborting"
                );
                join.abort();
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.prober_slot()
            .as_ref()
            .map(|handle| !handle.join.is_finished())
            .unwrap_or(false)
    }

    /// Execute a JSON-RPC call with retries and failover.
    pub async fn call(&self, method: &str, params: Vec<Value>) -> FailoverResult<Value> {
        self.dispatcher.dispatch(RpcRequest::new(method, params)).await
    }

    /// Point-in-time health of every endpoint, in priority order.
    pub fn status(&self) -> StatusReport {
        self.tracker.snapshot(&self.registry)
    }

    /// Run one probe cycle now, independent of the background prober.
    pub async fn check_health(&self) {
        self.build_prober().check_all().await;
    }

    pub fn endpoint_count(&self) -> usize {
        self.registry.len()
    }
}

impl std::fmt::Debug for FailoverManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FailoverManager")
            .field("endpoints", &self.registry.len())
            .field("settings", &self.settings)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}
