//! Retry logic.
//!
//! # Responsibilities
//! - Execute up to `max_attempts` attempts against one endpoint
//! - Sleep with exponential backoff + jitter between attempts
//!
//! # Design Decisions
//! - Retries are per endpoint; failover to the next endpoint is the
//!   dispatcher's job, not this module's
//! - Every error kind is retried: transport, timeout, HTTP status, RPC error
//! - No backoff after the final attempt

use std::future::Future;
use std::time::Duration;

use crate::registry::Endpoint;
use crate::resilience::backoff::calculate_backoff;
use crate::rpc::RpcResult;

/// Attempt budget and backoff unit for one endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_unit: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_unit: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_unit,
        }
    }

    /// Apply the endpoint's retry override, if any.
    pub fn for_endpoint(&self, endpoint: &Endpoint) -> Self {
        match endpoint.max_retries {
            Some(max_attempts) => Self::new(max_attempts, self.backoff_unit),
            None => *self,
        }
    }

    /// Run `attempt_fn` until it succeeds or the budget is spent. The closure
    /// receives the zero-based attempt index.
    pub async fn run<T, F, Fut>(&self, mut attempt_fn: F) -> RpcResult<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = RpcResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match attempt_fn(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt + 1 < self.max_attempts => {
                    let delay = calculate_backoff(attempt, self.backoff_unit);
                    tracing::debug!(
                        attempt = attempt + 1,
                        max_attempts = self.max_attempts,
                        delay = ?delay,
                        error = %e,
                        "Retrying after backoff"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EndpointConfig;
    use crate::rpc::RpcError;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Instant;

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(3, Duration::from_millis(1));

        let result = policy
            .run(|_| {
                let seen = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if seen < 2 {
                        Err(RpcError::HttpStatus(503))
                    } else {
                        Ok("done")
                    }
                }
            })
            .await;

        assert_eq!(result, Ok("done"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausts_budget_and_returns_last_error() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(3, Duration::from_millis(1));

        let result: RpcResult<()> = policy
            .run(|attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move { Err(RpcError::Transport(format!("attempt {attempt}"))) }
            })
            .await;

        assert_eq!(result, Err(RpcError::Transport("attempt 2".into())));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_backoff_between_attempts() {
        let policy = RetryPolicy::new(3, Duration::from_millis(20));
        let start = Instant::now();

        let _: RpcResult<()> = policy.run(|_| async { Err(RpcError::EmptyResult) }).await;

        // 2^0 + 2^1 units at minimum.
        assert!(start.elapsed() >= Duration::from_millis(60));
    }

    #[test]
    fn test_endpoint_override() {
        let policy = RetryPolicy::new(3, Duration::from_secs(1));

        let plain = Endpoint::from_config(&EndpointConfig::new("http://a"));
        assert_eq!(policy.for_endpoint(&plain).max_attempts, 3);

        let single = Endpoint::from_config(&EndpointConfig::new("http://b").with_max_retries(1));
        assert_eq!(policy.for_endpoint(&single), RetryPolicy::new(1, Duration::from_secs(1)));
    }

    #[test]
    fn test_zero_attempts_clamped_to_one() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
    }
}
