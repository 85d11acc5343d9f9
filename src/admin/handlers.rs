use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::failover::{FailoverManager, StatusReport};

#[derive(Debug, Serialize)]
pub struct HealthSummary {
    pub version: &'static str,
    pub status: &'static str,
    pub usable_endpoints: usize,
    pub healthy_endpoints: usize,
    pub total_endpoints: usize,
}

pub async fn get_status(State(manager): State<Arc<FailoverManager>>) -> Json<StatusReport> {
    Json(manager.status())
}

/// 503 once no endpoint would be tried outside of the last-endpoint fallback.
pub async fn get_health(State(manager): State<Arc<FailoverManager>>) -> (StatusCode, Json<HealthSummary>) {
    let report = manager.status();
    let usable = report.usable_count();

    let (code, status) = if usable > 0 {
        (StatusCode::OK, "operational")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    };

    (
        code,
        Json(HealthSummary {
            version: env!("CARGO_PKG_VERSION"),
            status,
            usable_endpoints: usable,
            healthy_endpoints: report.healthy_count(),
            total_endpoints: report.endpoints.len(),
        }),
    )
}
