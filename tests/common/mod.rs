//! Shared utilities for integration and load testing.

use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use rpc_failover::FailoverSettings;

/// `user:pass`, base64-encoded as sent by basic auth.
#[allow(dead_code)]
pub const BASIC_USER_PASS: &str = "Basic dXNlcjpwYXNz";

/// Start a mock JSON-RPC node on an ephemeral port. The handler receives the
/// request headers and the decoded envelope and returns an HTTP status plus
/// the response body.
pub async fn start_programmable_node<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(HeaderMap, Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, Value)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    let app = Router::new().route(
        "/",
        post(move |headers: HeaderMap, Json(request): Json<Value>| {
            let f = f.clone();
            async move {
                let (status, body) = f(headers, request).await;
                (StatusCode::from_u16(status).unwrap(), Json(body))
            }
        }),
    );

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// A node answering every call with `result`.
pub async fn start_mock_node(result: Value) -> SocketAddr {
    start_programmable_node(move |_, request| {
        let result = result.clone();
        async move { (200, ok_envelope(&request, result)) }
    })
    .await
}

/// A node that accepts connections and never answers.
#[allow(dead_code)]
pub async fn start_hung_node() -> SocketAddr {
    start_programmable_node(|_, _| async {
        tokio::time::sleep(Duration::from_secs(300)).await;
        (200, Value::Null)
    })
    .await
}

pub fn ok_envelope(request: &Value, result: Value) -> Value {
    json!({ "result": result, "error": null, "id": request["id"] })
}

#[allow(dead_code)]
pub fn error_envelope(request: &Value, code: i64, message: &str) -> Value {
    json!({
        "result": null,
        "error": { "code": code, "message": message },
        "id": request["id"],
    })
}

pub fn url(addr: SocketAddr) -> String {
    format!("http://{addr}")
}

/// Millisecond backoff, background probing effectively off.
pub fn test_settings() -> FailoverSettings {
    FailoverSettings {
        health_check_interval: Duration::from_secs(3600),
        backoff_unit: Duration::from_millis(1),
        ..FailoverSettings::default()
    }
}
