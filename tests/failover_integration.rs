//! End-to-end failover over real HTTP against mock JSON-RPC nodes.

use serde_json::{json, Value};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rpc_failover::config::loader::parse_config;
use rpc_failover::config::EndpointConfig;
use rpc_failover::{FailoverManager, FailoverSettings, HealthStatus, RpcError};

mod common;

#[tokio::test]
async fn test_envelope_reaches_node() {
    let addr = common::start_programmable_node(|_, request| async move {
        assert_eq!(request["jsonrpc"], "2.0");
        assert!(request["id"].is_string());
        let params = request["params"].clone();
        (200, common::ok_envelope(&request, json!({ "method": request["method"], "params": params })))
    })
    .await;

    let manager = FailoverManager::new(&[EndpointConfig::new(common::url(addr))], common::test_settings()).unwrap();
    let result = manager
        .call("getblockhash", vec![json!(840000), json!("verbose")])
        .await
        .unwrap();

    assert_eq!(result["method"], "getblockhash");
    assert_eq!(result["params"], json!([840000, "verbose"]));
}

#[tokio::test]
async fn test_server_error_fails_over_to_backup() {
    let primary_hits = Arc::new(AtomicU32::new(0));
    let hits = primary_hits.clone();
    let primary = common::start_programmable_node(move |_, _| {
        hits.fetch_add(1, Ordering::SeqCst);
        async { (500, json!({ "error": "internal" })) }
    })
    .await;
    let backup = common::start_mock_node(json!(840_000)).await;

    let endpoints = vec![
        EndpointConfig::new(common::url(primary)).with_name("primary"),
        EndpointConfig::new(common::url(backup)).with_name("backup").with_priority(1),
    ];
    let manager = FailoverManager::new(&endpoints, common::test_settings()).unwrap();

    assert_eq!(manager.call("getblockcount", vec![]).await.unwrap(), json!(840_000));
    assert_eq!(primary_hits.load(Ordering::SeqCst), 3);

    let status = manager.status();
    assert_eq!(status.endpoints[0].name, "primary");
    assert_eq!(status.endpoints[0].status, HealthStatus::Degraded);
    assert_eq!(status.endpoints[1].status, HealthStatus::Healthy);
    assert!(status.endpoints[1].avg_latency_ms > 0.0);
}

#[tokio::test]
async fn test_rpc_error_field_is_failure() {
    let node = common::start_programmable_node(|_, request| async move {
        (200, common::error_envelope(&request, -32601, "Method not found"))
    })
    .await;

    let settings = FailoverSettings {
        max_retries: 1,
        ..common::test_settings()
    };
    let manager = FailoverManager::new(&[EndpointConfig::new(common::url(node))], settings).unwrap();

    let err = manager.call("nosuchmethod", vec![]).await.unwrap_err();
    assert_eq!(
        err.last_error(),
        Some(&RpcError::Rpc {
            code: Some(-32601),
            message: "Method not found".into()
        })
    );
    assert_eq!(manager.status().endpoints[0].consecutive_failures, 1);
}

#[tokio::test]
async fn test_basic_auth_sent() {
    let node = common::start_programmable_node(|headers, request| async move {
        match headers.get("authorization").and_then(|v| v.to_str().ok()) {
            Some(common::BASIC_USER_PASS) => (200, common::ok_envelope(&request, json!("authorized"))),
            _ => (401, Value::Null),
        }
    })
    .await;

    let settings = FailoverSettings {
        max_retries: 1,
        ..common::test_settings()
    };

    let anonymous = FailoverManager::new(&[EndpointConfig::new(common::url(node))], settings.clone()).unwrap();
    let err = anonymous.call("getblockcount", vec![]).await.unwrap_err();
    assert_eq!(err.last_error(), Some(&RpcError::HttpStatus(401)));

    let endpoint = EndpointConfig::new(common::url(node)).with_credentials("user", "pass");
    let authorized = FailoverManager::new(&[endpoint], settings).unwrap();
    assert_eq!(authorized.call("getblockcount", vec![]).await.unwrap(), json!("authorized"));
}

#[tokio::test]
async fn test_hung_node_times_out() {
    let hung = common::start_hung_node().await;
    let backup = common::start_mock_node(json!("backup")).await;

    let endpoints = vec![
        EndpointConfig::new(common::url(hung)).with_timeout(Duration::from_millis(100)),
        EndpointConfig::new(common::url(backup)).with_priority(1),
    ];
    let settings = FailoverSettings {
        max_retries: 2,
        ..common::test_settings()
    };
    let manager = FailoverManager::new(&endpoints, settings).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), manager.call("getblockcount", vec![]))
        .await
        .expect("call not bounded by endpoint timeout");
    assert_eq!(result.unwrap(), json!("backup"));
    assert_eq!(manager.status().endpoints[0].status, HealthStatus::Degraded);
}

#[tokio::test]
async fn test_config_driven_manager_with_prober() {
    let primary = common::start_mock_node(json!(100)).await;
    let backup = common::start_mock_node(json!(99)).await;

    let toml = format!(
        r#"
[[endpoints]]
url = "{backup}"
name = "backup"
priority = 10

[[endpoints]]
url = "{primary}"
name = "primary"
priority = 1

[health_check]
interval_ms = 20
stop_timeout_ms = 1000

[retries]
backoff_unit_ms = 1
"#,
        primary = common::url(primary),
        backup = common::url(backup),
    );
    let config = parse_config(&toml).unwrap();
    let manager = FailoverManager::from_config(&config).unwrap();

    manager.start();
    tokio::time::sleep(Duration::from_millis(150)).await;

    let status = manager.status();
    assert_eq!(status.endpoints[0].name, "primary");
    assert_eq!(status.healthy_count(), 2);
    assert!(status.endpoints.iter().all(|e| e.total_requests == 0));

    assert_eq!(manager.call("getblockcount", vec![]).await.unwrap(), json!(100));
    manager.stop().await;
    assert!(!manager.is_running());
}
