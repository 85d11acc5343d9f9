//! Failover error definitions.

use thiserror::Error;

use crate::rpc::RpcError;

/// Errors surfaced by the failover manager.
#[derive(Debug, Error)]
pub enum FailoverError {
    /// The manager was constructed without endpoints.
    #[error("at least one RPC endpoint is required")]
    NoEndpoints,

    /// Manager settings that cannot run, e.g. a zero probe interval.
    #[error("invalid failover settings: {0}")]
    InvalidSettings(&'static str),

    /// The default transport could not be built.
    #[error("failed to initialize RPC transport: {0}")]
    Transport(#[source] RpcError),

    /// Every endpoint was skipped or failed. The only error `call` returns.
    #[error("all RPC endpoints failed for method '{method}': {}", describe_last(.last_error))]
    Exhausted {
        method: String,
        last_error: Option<RpcError>,
    },
}

fn describe_last(last_error: &Option<RpcError>) -> String {
    match last_error {
        Some(e) => format!("last error: {e}"),
        None => "no endpoint was eligible".to_string(),
    }
}

impl FailoverError {
    /// True when the embedding service should answer with a
    /// service-unavailable style signal.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, FailoverError::Exhausted { .. })
    }

    /// The most recent underlying failure, for exhaustion errors.
    pub fn last_error(&self) -> Option<&RpcError> {
        match self {
            FailoverError::Exhausted { last_error, .. } => last_error.as_ref(),
            _ => None,
        }
    }
}

/// Result type for failover operations.
pub type FailoverResult<T> = Result<T, FailoverError>;
