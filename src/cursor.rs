//! Pagination and cancellation contracts consumed by long-running traversals.
//!
//! A [`Cursor`] lets a caller page through `scan`, `within`, `intersects`,
//! and `nearby` results across multiple calls; a [`Deadline`] bounds how long
//! a single traversal may run. Both are caller-owned: the collection only
//! consumes them at its yield points.

use crate::error::{CollectionError, Result};
use std::time::{Duration, Instant};

/// Caller-owned pagination token.
///
/// `offset()` is read once at the start of an operation and that many
/// candidates are skipped; `step(count)` records additional candidates
/// examined. Progress accumulates across calls, so resuming with the
/// reported offset continues where the previous call stopped (assuming a
/// quiescent collection in between).
pub trait Cursor {
    /// Number of candidates to skip before visiting.
    fn offset(&self) -> u64;

    /// Record `count` additional candidates examined.
    fn step(&mut self, count: u64);
}

/// A point in time after which a traversal must stop.
///
/// The collection calls [`Deadline::check`] at its cooperative yield points;
/// once the clock passes the configured instant the current operation
/// unwinds with [`CollectionError::DeadlineExceeded`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Deadline {
    when: Option<Instant>,
}

impl Deadline {
    /// A deadline that fires once the clock passes `when`.
    pub fn new(when: Instant) -> Self {
        Self { when: Some(when) }
    }

    /// A deadline `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Self::new(Instant::now() + timeout)
    }

    /// A deadline that never fires.
    pub fn none() -> Self {
        Self { when: None }
    }

    /// Fails with [`CollectionError::DeadlineExceeded`] when the deadline
    /// has passed.
    pub fn check(&self) -> Result<()> {
        match self.when {
            Some(when) if Instant::now() > when => Err(CollectionError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_none_never_fires() {
        let deadline = Deadline::none();
        assert!(deadline.check().is_ok());
    }

    #[test]
    fn test_deadline_future_ok() {
        let deadline = Deadline::after(Duration::from_secs(60));
        assert!(deadline.check().is_ok());
    }

    #[test]
    fn test_deadline_past_fails() {
        let deadline = Deadline::new(Instant::now() - Duration::from_millis(1));
        assert_eq!(deadline.check(), Err(CollectionError::DeadlineExceeded));
    }
}
