//! Failover subsystem.
//!
//! # Data Flow
//! ```text
//! manager.call(method, params)
//!     → dispatcher.rs
//!         → for each endpoint in priority order:
//!             → registry::selection (skip open breaker / unhealthy)
//!             → resilience::retries (attempts + backoff, endpoint deadline)
//!             → health::tracker (commit outcome)
//!         → first success returned
//!     → error.rs (Exhausted when nothing answered)
//!
//! manager.status()
//!     → health::tracker snapshot → status.rs
//! ```
//!
//! # Design Decisions
//! - Explicitly constructed manager, no process-wide state
//! - Background probing starts and stops only on request
//! - A single error kind reaches callers of `call`

pub mod dispatcher;
pub mod error;
pub mod manager;
pub mod status;


pub use error::{FailoverError, FailoverResult};
pub use manager::{FailoverManager, FailoverSettings};
pub use status::{EndpointStatus, StatusReport};
