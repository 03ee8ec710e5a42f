//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → HealthcheckConfig::normalize (out-of-range values → defaults)
//!     → HealthcheckConfig (immutable once the service is built)
//! ```
//!
//! # Design Decisions
//! - Every field has a default so an empty config is valid
//! - Out-of-range values fall back to defaults instead of erroring,
//!   matching the builder surface on the service
//! - The resource list is runtime state, not part of the serialized schema

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::HealthcheckConfig;
