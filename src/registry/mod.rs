//! Endpoint registry.
//!
//! # Data Flow
//! ```text
//! Vec<EndpointConfig>
//!     → endpoint.rs (immutable Endpoint per config)
//!     → stable sort by priority (once, at construction)
//!     → dispatcher walks the registry in order
//!         → selection.rs (breaker / health filtering)
//! ```
//!
//! # Design Decisions
//! - Order is fixed at construction; health affects selection, never order
//! - Endpoints are addressed by index internally and by URL in status output
//! - An empty registry is a construction error, never a silent no-op

pub mod endpoint;
pub mod selection;

pub use endpoint::Endpoint;
pub use selection::{eligibility, Eligibility};

use crate::config::EndpointConfig;
use crate::failover::error::{FailoverError, FailoverResult};

/// Priority-ordered, immutable set of endpoints.
#[derive(Debug)]
pub struct EndpointRegistry {
    endpoints: Vec<Endpoint>,
}

impl EndpointRegistry {
    /// Build the registry, sorting by ascending priority. Ties keep their
    /// configured order.
    pub fn new(configs: &[EndpointConfig]) -> FailoverResult<Self> {
        if configs.is_empty() {
            return Err(FailoverError::NoEndpoints);
        }

        let mut endpoints: Vec<Endpoint> = configs.iter().map(Endpoint::from_config).collect();
        endpoints.sort_by_key(|e| e.priority);

        Ok(Self { endpoints })
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Always false for a constructed registry; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Endpoint> {
        self.endpoints.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.iter()
    }

    /// True for the lowest-priority endpoint.
    pub fn is_last(&self, index: usize) -> bool {
        index + 1 == self.endpoints.len()
    }
}
