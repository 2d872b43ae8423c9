//! Record-and-continue collection of failures.

use std::future::Future;

use crate::error::{AggregateFailure, Failure};

/// Collects failures from a sequence of fallible operations without stopping
/// the sequence.
///
/// A child aggregator starts seeded with a copy of the parent's recorded
/// failures, so it reports "has failures" if either it or the seeding parent
/// did; failures recorded on the child afterwards never flow back.
///
/// # Examples
///
/// ```
/// use stepwise::ErrorAggregator;
///
/// let mut aggregator = ErrorAggregator::new();
/// aggregator.run(|| Err("first".into()));
/// aggregator.run(|| Ok(()));
/// aggregator.run(|| Err("second".into()));
/// assert!(aggregator.has_failures());
/// assert_eq!(aggregator.failures().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct ErrorAggregator {
    failures: Vec<Failure>,
}

impl ErrorAggregator {
    /// Creates an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a child seeded with this aggregator's recorded failures.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            failures: self.failures.clone(),
        }
    }

    /// Records a failure directly.
    pub fn record(&mut self, failure: Failure) {
        self.failures.push(failure);
    }

    /// Runs `op`, recording an `Err` instead of propagating it.
    pub fn run(&mut self, op: impl FnOnce() -> Result<(), Failure>) {
        if let Err(failure) = op() {
            self.record(failure);
        }
    }

    /// Awaits `op`, recording an `Err` instead of propagating it.
    pub async fn run_async<F>(&mut self, op: F)
    where
        F: Future<Output = Result<(), Failure>>,
    {
        if let Err(failure) = op.await {
            self.record(failure);
        }
    }

    /// Returns `true` once at least one failure has been recorded.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Returns the recorded failures in recording order.
    #[must_use]
    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    /// Combines the recorded failures into one reportable failure.
    ///
    /// Returns `None` when nothing was recorded, the lone failure when exactly
    /// one was, and an [`AggregateFailure`] otherwise.
    #[must_use]
    pub fn to_failure(&self) -> Option<Failure> {
        match self.failures.as_slice() {
            [] => None,
            [single] => Some(single.clone()),
            many => Some(Failure::new(AggregateFailure::new(many.to_vec()))),
        }
    }
}
