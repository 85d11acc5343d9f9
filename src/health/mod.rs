//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Active health checks (active.rs):
//!     Periodic timer
//!     → Probe each endpoint (no retries, endpoint deadline)
//!     → tracker.rs
//!
//! Passive health checks (dispatcher):
//!     Call outcome observed after retries
//!     → tracker.rs
//!
//! State machine (state.rs):
//!     Unknown/Healthy ←→ Degraded → Unhealthy (breaker opens)
//! ```
//!
//! # Design Decisions
//! - Active and passive observations share one transition function
//! - Health state is per-endpoint, guarded by a single manager-wide lock
//! - Probing never blocks callers

pub mod active;
pub mod state;
pub mod tracker;

pub use active::HealthProber;
pub use state::{HealthRecord, HealthStatus};
pub use tracker::{HealthTracker, Observation};
