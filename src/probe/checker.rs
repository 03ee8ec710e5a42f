//! The probe aggregator.
//!
//! # Responsibilities
//! - Fan out one task per resource, admission-gated
//! - Enforce the per-check deadline
//! - Collect outcomes race-free into a single CheckReport

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::{self, Instant};

use super::{CheckReport, Resource, ResourceError};
use crate::gate::Gate;

/// Error text recorded when the deadline cuts a probe off, or expires
/// before the probe body ever runs.
const DEADLINE_ELAPSED: &str = "deadline has elapsed";

/// Runs check cycles over a fixed set of resources.
///
/// Constructed once at service startup; `check` may be called concurrently,
/// each call owns its own deadline and result accumulation.
pub struct Checker {
    resources: Vec<Arc<dyn Resource>>,
    timeout: Duration,
    gate: Gate,
}

impl Checker {
    /// Create a checker probing `resources` with `timeout` per cycle and at
    /// most `limit` probes in flight.
    ///
    /// A non-positive limit, or one at or above the resource count, means
    /// every probe is admitted immediately.
    pub fn new(resources: Vec<Arc<dyn Resource>>, timeout: Duration, limit: i64) -> Self {
        let gate = if limit > 0 && (limit as usize) < resources.len() {
            Gate::new(limit)
        } else {
            Gate::new(0)
        };

        Self {
            resources,
            timeout,
            gate,
        }
    }

    /// Run one check cycle.
    ///
    /// Every resource is probed exactly once. The call returns only after
    /// every spawned task has been joined, so no probe task outlives the
    /// cycle; a probe cut off by the deadline is reported as failed rather
    /// than abandoned.
    pub async fn check(&self) -> CheckReport {
        let deadline = Instant::now() + self.timeout;
        let mut tasks = JoinSet::new();
        let mut names = HashMap::new();

        for resource in &self.resources {
            let resource = Arc::clone(resource);
            let gate = self.gate.clone();
            let name = resource.name().to_string();

            let handle = tasks.spawn(async move {
                let _slot = gate.acquire().await;
                probe_one(resource.as_ref(), deadline).await
            });
            names.insert(handle.id(), name);
        }

        // Merging is owned by this frame; worker tasks hand results back
        // through the JoinSet instead of writing shared state.
        let mut report = CheckReport::passing();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Some(failure)) => {
                    tracing::warn!(
                        resource = %failure.name,
                        error = %failure.error,
                        "Probe failed"
                    );
                    report.record(failure);
                }
                Ok(None) => {}
                Err(e) => {
                    // A panicking probe must not take the cycle down with it.
                    let name = names
                        .remove(&e.id())
                        .unwrap_or_else(|| "unknown".to_string());
                    tracing::error!(
                        resource = %name,
                        error = %e,
                        "Probe task did not complete"
                    );
                    report.record(ResourceError::new(name, e.to_string()));
                }
            }
        }

        report
    }
}

/// Probe a single resource against the shared deadline.
///
/// The gate wait may have consumed the whole budget; in that case the
/// resource is reported as failed without invoking its probe at all.
async fn probe_one(resource: &dyn Resource, deadline: Instant) -> Option<ResourceError> {
    if Instant::now() >= deadline {
        return Some(ResourceError::new(resource.name(), DEADLINE_ELAPSED));
    }

    match time::timeout_at(deadline, resource.probe()).await {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(ResourceError::new(resource.name(), e.to_string())),
        Err(_) => Some(ResourceError::new(resource.name(), DEADLINE_ELAPSED)),
    }
}
