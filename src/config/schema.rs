//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the health endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthcheckConfig {
    /// Port the endpoint listens on.
    pub port: u16,

    /// Path serving the aggregated health response.
    pub path: String,

    /// Budget for one check cycle, in seconds.
    pub check_timeout_secs: u64,

    /// Grace period for in-flight requests during shutdown, in seconds.
    pub shutdown_grace_secs: u64,

    /// Maximum number of concurrent probes. Non-positive means unlimited.
    pub concurrency: i64,
}

impl Default for HealthcheckConfig {
    fn default() -> Self {
        Self {
            port: 8082,
            path: "/health".to_string(),
            check_timeout_secs: 10,
            shutdown_grace_secs: 10,
            concurrency: -1,
        }
    }
}

impl HealthcheckConfig {
    /// Address the listener binds to.
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.check_timeout_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }

    /// Restore defaults for out-of-range values.
    ///
    /// Zero timeouts and an empty path fall back to their defaults; a path
    /// missing its leading slash gets one.
    pub fn normalize(&mut self) {
        let defaults = Self::default();

        if self.check_timeout_secs == 0 {
            self.check_timeout_secs = defaults.check_timeout_secs;
        }
        if self.shutdown_grace_secs == 0 {
            self.shutdown_grace_secs = defaults.shutdown_grace_secs;
        }
        if self.path.is_empty() {
            self.path = defaults.path;
        } else if !self.path.starts_with('/') {
            self.path.insert(0, '/');
        }
    }
}
