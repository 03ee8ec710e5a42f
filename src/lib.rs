//! Aggregated health endpoint with bounded-concurrency probing.
//!
//! Serves a single JSON endpoint that fans out one probe per registered
//! resource, gated by a concurrency limit, bounded by a per-check deadline,
//! and reports the set of failed resources:
//!
//! ```text
//! GET /health
//!     → one check cycle
//!         spawn probe per resource ──┐
//!         gate admission (≤ limit)   │  shared deadline
//!         probe downstream           │
//!         join every task ───────────┘
//!     → {"ok": bool, "erroredResources": [{"name", "error"}, ...]}
//! ```
//!
//! Resources implement the [`Resource`] trait; the service itself knows
//! nothing about what a resource is. Startup and shutdown are coordinated
//! through a [`Shutdown`] signal with a bounded grace period for in-flight
//! requests.

// Core subsystems
pub mod config;
pub mod gate;
pub mod probe;
pub mod server;

// Cross-cutting concerns
pub mod error;
pub mod shutdown;

pub use config::{load_config, ConfigError, HealthcheckConfig};
pub use error::{LifecycleError, MultiError};
pub use gate::{Gate, GatePermit};
pub use probe::checker::Checker;
pub use probe::{BoxError, CheckReport, Resource, ResourceError};
pub use server::Healthcheck;
pub use shutdown::Shutdown;
