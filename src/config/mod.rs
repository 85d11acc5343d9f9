//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse, deserialize, resolve credentials from env)
//!     → validation.rs (semantic checks)
//!     → FailoverConfig (validated, immutable)
//!     → FailoverManager::from_config
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; endpoints never change at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::AdminConfig;
pub use schema::CircuitBreakerConfig;
pub use schema::EndpointConfig;
pub use schema::FailoverConfig;
pub use schema::HealthCheckConfig;
pub use schema::LogFormat;
pub use schema::ObservabilityConfig;
pub use schema::RetryConfig;
