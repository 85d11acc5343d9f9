//! JSON-RPC envelope types and error definitions.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// A single JSON-RPC call: method name plus positional parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcRequest {
    pub jsonrpc: &'static str,
    /// Correlation id, also used as the request id in logs.
    pub id: String,
    pub method: String,
    pub params: Vec<Value>,
}

impl RpcRequest {
    /// Build a request with a fresh UUID v4 id.
    pub fn new(method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            id: uuid::Uuid::new_v4().to_string(),
            method: method.into(),
            params,
        }
    }
}

/// The response envelope returned by a node.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub id: Option<Value>,
}

impl RpcResponse {
    /// A non-null `error` is a failure even when the HTTP exchange succeeded.
    pub fn into_result(self) -> RpcResult<Value> {
        match self.error {
            Some(error) if !error.is_null() => Err(RpcError::from_error_value(&error)),
            _ => Ok(self.result),
        }
    }
}

/// Errors from a single call against a single endpoint.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RpcError {
    /// Connection refused, DNS failure, TLS failure and the like.
    #[error("transport error: {0}")]
    Transport(String),

    /// The call did not complete within the endpoint's deadline.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The node answered with a non-2xx HTTP status.
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// The response carried a non-null `error` field.
    #[error("RPC error: {}", describe_rpc_error(.code, .message))]
    Rpc { code: Option<i64>, message: String },

    /// The response body was not a JSON-RPC envelope.
    #[error("invalid response: {0}")]
    Decode(String),

    /// A probe returned a null result.
    #[error("empty result")]
    EmptyResult,
}

fn describe_rpc_error(code: &Option<i64>, message: &str) -> String {
    match code {
        Some(code) => format!("{message} (code {code})"),
        None => message.to_string(),
    }
}

impl RpcError {
    /// Interpret a JSON-RPC `error` value. Bitcoin Core sends `{code, message}`;
    /// anything else is kept verbatim.
    pub fn from_error_value(error: &Value) -> Self {
        let code = error.get("code").and_then(Value::as_i64);
        let message = match error.get("message").and_then(Value::as_str) {
            Some(message) => message.to_string(),
            None => error.to_string(),
        };
        RpcError::Rpc { code, message }
    }
}

/// Result type for single-endpoint RPC operations.
pub type RpcResult<T> = Result<T, RpcError>;
