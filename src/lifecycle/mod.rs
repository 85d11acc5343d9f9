//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Build manager → start() prober → Serve status
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop serving → stop() prober (bounded join) → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Start and stop are explicit operations, never implicit on construction
//! - Shutdown has timeout: the prober is aborted after its deadline

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
