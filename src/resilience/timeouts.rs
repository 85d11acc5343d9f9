//! Timeout enforcement.
//!
//! Every call against an endpoint, dispatched or probed, runs under the
//! endpoint's deadline. A hung node therefore costs at most
//! `timeout * attempts` plus backoff.

use std::future::Future;
use std::time::Duration;
use tokio::time;

use crate::rpc::{RpcError, RpcResult};

/// Run `fut` with a deadline, mapping expiry to [`RpcError::Timeout`].
pub async fn with_deadline<T, F>(deadline: Duration, fut: F) -> RpcResult<T>
where
    F: Future<Output = RpcResult<T>>,
{
    match time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(RpcError::Timeout(deadline)),
    }
}
