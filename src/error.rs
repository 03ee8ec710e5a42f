//! Lifecycle errors and combined-error reporting.
//!
//! # Design Decisions
//! - Probe failures are data in the response, never errors here
//! - Serving and shutting down can fail independently; both failures are
//!   reported, neither masks the other

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Errors from running the health endpoint server.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The listener could not be bound.
    #[error("failed to bind listener: {0}")]
    Bind(std::io::Error),

    /// The server failed while accepting or serving connections.
    #[error("server error: {0}")]
    Serve(std::io::Error),

    /// Graceful shutdown did not finish within the grace period.
    #[error("shutdown grace period of {0:?} elapsed with requests still in flight")]
    GraceElapsed(Duration),
}

/// Zero or more errors collected into one value.
///
/// Rendering is deterministic: the count first, then each error in the
/// order it was collected.
#[derive(Debug, Default)]
pub struct MultiError<E> {
    errors: Vec<E>,
}

impl<E> MultiError<E> {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn push(&mut self, error: E) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[E] {
        &self.errors
    }

    /// `Ok(())` when nothing was collected, `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), Self> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl<E: fmt::Display> fmt::Display for MultiError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error(s) occurred", self.errors.len())?;
        for error in &self.errors {
            write!(f, "; {error}")?;
        }
        Ok(())
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for MultiError<E> {}
