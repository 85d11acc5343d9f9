//! Read-only status surface over HTTP.
//!
//! - `GET /status`: full [`StatusReport`](crate::failover::StatusReport) as JSON
//! - `GET /health`: summary, 503 when no endpoint is usable

pub mod handlers;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use self::handlers::*;
use crate::failover::FailoverManager;

pub fn setup_admin_router(manager: Arc<FailoverManager>) -> Router {
    Router::new()
        .route("/status", get(get_status))
        .route("/health", get(get_health))
        .layer(TraceLayer::new_for_http())
        .with_state(manager)
}
