//! Client-side failover for JSON-RPC endpoints.
//!
//! # Architecture Overview
//!
//! ```text
//!   caller
//!     │  call(method, params)
//!     ▼
//!  ┌──────────────────────────────────────────────────────────────┐
//!  │                      FailoverManager                          │
//!  │                                                               │
//!  │  ┌──────────┐    ┌────────────┐    ┌───────────┐             │
//!  │  │ registry │───▶│ dispatcher │───▶│    rpc    │─────────────┼──▶ endpoint 1..n
//!  │  │ (sorted) │    │  + retries │    │ transport │             │
//!  │  └──────────┘    └─────┬──────┘    └─────▲─────┘             │
//!  │                        │                 │                    │
//!  │                        ▼                 │                    │
//!  │                 ┌─────────────┐    ┌─────┴─────┐             │
//!  │                 │   health    │◀───│  prober   │ (periodic)  │
//!  │                 │  tracker +  │    └───────────┘             │
//!  │                 │  breakers   │                               │
//!  │                 └──────┬──────┘                               │
//!  │                        ▼                                      │
//!  │                  status report ──▶ admin (/status, /health)   │
//!  └──────────────────────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod failover;
pub mod registry;
pub mod rpc;

// Health and resilience
pub mod health;
pub mod resilience;

// Cross-cutting concerns
pub mod admin;
pub mod lifecycle;
pub mod observability;

pub use config::FailoverConfig;
pub use failover::{EndpointStatus, FailoverError, FailoverManager, FailoverSettings, StatusReport};
pub use health::HealthStatus;
pub use lifecycle::Shutdown;
pub use rpc::{RpcError, RpcTransport};
