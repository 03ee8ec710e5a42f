//! Probe subsystem.
//!
//! # Data Flow
//! ```text
//! Check cycle (checker.rs):
//!     One task per registered resource
//!     → gate admission (gate.rs)
//!     → probe under the shared deadline
//!     → outcomes merged into a CheckReport
//! ```
//!
//! # Design Decisions
//! - Success is implicit: only failed probes appear in the report
//! - Failure order is task completion order, not registration order
//! - Resources are shared read-only trait objects, probed exactly once
//!   per cycle

pub mod checker;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

/// Error type a probe is allowed to return.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A downstream dependency exposing a single health-probe capability.
///
/// Implementations are shared across concurrent check cycles and must be
/// safe to probe concurrently. The checker abandons the probe future once
/// the per-check deadline fires, so a probe that never yields to the
/// runtime cannot be preempted at this layer.
pub trait Resource: Send + Sync {
    /// Stable identifier reported for this resource in the health response.
    fn name(&self) -> &str;

    /// Probe the dependency once.
    fn probe(&self) -> BoxFuture<'_, Result<(), BoxError>>;
}

/// One failed probe, as rendered in the health response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceError {
    /// Name of the resource whose probe failed.
    pub name: String,

    /// Error text from the probe, or from the deadline.
    pub error: String,
}

impl ResourceError {
    pub fn new(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            error: error.into(),
        }
    }
}

/// Aggregate outcome of one check cycle.
///
/// Serializes to `{"ok": bool, "erroredResources": [...]}` where the array
/// is always present, possibly empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    /// True iff no probe failed this cycle.
    pub ok: bool,

    /// Failed probes, in completion order.
    pub errored_resources: Vec<ResourceError>,
}

impl CheckReport {
    /// A report with no failures recorded yet.
    pub(crate) fn passing() -> Self {
        Self {
            ok: true,
            errored_resources: Vec::new(),
        }
    }

    /// Record one failed probe. `ok` flips to false and stays false.
    pub(crate) fn record(&mut self, failure: ResourceError) {
        self.ok = false;
        self.errored_resources.push(failure);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn report_serializes_with_camel_case_field() {
        let mut report = CheckReport::passing();
        report.record(ResourceError::new("db", "connection refused"));

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains(r#""erroredResources""#), "got: {json}");
        assert!(json.contains(r#""ok":false"#), "got: {json}");
    }

    #[test]
    fn passing_report_keeps_empty_array() {
        let report = CheckReport::passing();
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(json, r#"{"ok":true,"erroredResources":[]}"#);
    }

    #[test]
    fn report_round_trips_through_json() {
        let mut report = CheckReport::passing();
        report.record(ResourceError::new("db", "connection refused"));
        report.record(ResourceError::new("queue", "deadline has elapsed"));

        let json = serde_json::to_vec(&report).unwrap();
        let parsed: CheckReport = serde_json::from_slice(&json).unwrap();

        assert_eq!(parsed.ok, report.ok);
        // Entry order is completion order and carries no meaning.
        let expected: HashSet<_> = report.errored_resources.iter().cloned().collect();
        let actual: HashSet<_> = parsed.errored_resources.into_iter().collect();
        assert_eq!(actual, expected);
    }
}
