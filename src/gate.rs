//! Bounded admission for concurrent probes.
//!
//! # Responsibilities
//! - Limit how many probes run inside their body at once
//! - Hand out RAII slots that release on every exit path
//!
//! # Design Decisions
//! - Non-positive limits mean unlimited (no semaphore allocated)
//! - The gate holds no state between check cycles; slots are only held
//!   while a permit is alive

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Bounded-admission gate for probe tasks.
///
/// Uses a semaphore to enforce the configured limit. When the limit is
/// reached, callers wait in [`Gate::acquire`] until a slot frees up. A gate
/// built with a non-positive limit admits every caller immediately.
#[derive(Clone)]
pub struct Gate {
    slots: Option<Arc<Semaphore>>,
}

impl Gate {
    /// Create a gate admitting at most `limit` concurrent holders.
    ///
    /// Non-positive limits produce an unlimited gate.
    pub fn new(limit: i64) -> Self {
        let slots = if limit > 0 {
            Some(Arc::new(Semaphore::new(limit as usize)))
        } else {
            None
        };

        Self { slots }
    }

    /// Acquire a slot, waiting if the gate is full.
    ///
    /// The slot is held until the returned permit is dropped, which happens
    /// on every exit path of the holder, including cancellation.
    pub async fn acquire(&self) -> GatePermit {
        let permit = match &self.slots {
            Some(slots) => Some(
                slots
                    .clone()
                    .acquire_owned()
                    .await
                    .expect("gate semaphore closed unexpectedly"),
            ),
            None => None,
        };

        GatePermit { _permit: permit }
    }

    /// Current number of free slots, or `None` for an unlimited gate.
    pub fn available_slots(&self) -> Option<usize> {
        self.slots.as_ref().map(|slots| slots.available_permits())
    }
}

/// A held admission slot. Dropping it returns the slot to the gate.
pub struct GatePermit {
    _permit: Option<OwnedSemaphorePermit>,
}
