//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher, health tracker, prober produce:
//!     → logging.rs (structured log events, request id span per call)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//!     → admin /status (point-in-time health snapshot)
//! ```
//!
//! # Design Decisions
//! - Structured fields (endpoint, method, attempt, error) on every event
//! - Metrics are cheap and no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
