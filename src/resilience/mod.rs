//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call against one endpoint:
//!     → timeouts.rs (enforce the endpoint's deadline)
//!     → On failure: retries.rs (retry with backoff.rs delays)
//!     → On exhaustion: health tracker records the failure,
//!       circuit_breaker.rs opens once the threshold is reached
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Backoff sleeps happen outside any lock
//! - Circuit breaker prevents wasting retry budget on a dead endpoint

pub mod backoff;
pub mod circuit_breaker;
pub mod retries;
pub mod timeouts;

pub use circuit_breaker::CircuitBreakers;
pub use retries::RetryPolicy;
pub use timeouts::with_deadline;
