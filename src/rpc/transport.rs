//! JSON-RPC transport.
//!
//! # Responsibilities
//! - POST the JSON-RPC envelope to one endpoint
//! - Apply basic auth, the endpoint's timeout and its TLS verification setting
//! - Classify failures (transport, timeout, HTTP status, RPC error field)

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::registry::Endpoint;
use crate::rpc::types::{RpcError, RpcRequest, RpcResponse, RpcResult};

/// Sends one request to one endpoint. Retries, failover and health tracking
/// are layered on top by the dispatcher.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn send(&self, endpoint: &Endpoint, request: &RpcRequest) -> RpcResult<Value>;
}

/// HTTP transport built on `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    verifying: reqwest::Client,
    insecure: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> RpcResult<Self> {
        let verifying = reqwest::Client::builder()
            .user_agent(concat!("rpc-failover/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RpcError::Transport(format!("failed to build HTTP client: {e}")))?;
        let insecure = reqwest::Client::builder()
            .user_agent(concat!("rpc-failover/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| RpcError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { verifying, insecure })
    }

    fn client_for(&self, endpoint: &Endpoint) -> &reqwest::Client {
        if endpoint.verify_tls {
            &self.verifying
        } else {
            &self.insecure
        }
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn send(&self, endpoint: &Endpoint, request: &RpcRequest) -> RpcResult<Value> {
        let mut builder = self
            .client_for(endpoint)
            .post(&endpoint.url)
            .timeout(endpoint.timeout)
            .json(request);
        if endpoint.has_credentials() {
            builder = builder.basic_auth(&endpoint.username, Some(endpoint.password()));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| classify(e, endpoint.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RpcError::HttpStatus(status.as_u16()));
        }

        let envelope: RpcResponse = response
            .json()
            .await
            .map_err(|e| classify(e, endpoint.timeout))?;

        envelope.into_result()
    }
}

fn classify(error: reqwest::Error, timeout: Duration) -> RpcError {
    if error.is_timeout() {
        RpcError::Timeout(timeout)
    } else if error.is_decode() {
        RpcError::Decode(error.to_string())
    } else {
        RpcError::Transport(error.to_string())
    }
}
