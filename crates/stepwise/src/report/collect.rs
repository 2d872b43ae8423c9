//! In-memory collection of reported results.

use std::sync::{Mutex, MutexGuard};

use super::{Delivery, ResultSink, TestResult};

/// Sink that stores every delivered result in memory.
///
/// Safe for delivery from many concurrently running scenarios. This is also
/// the observation point the test suites use.
///
/// # Examples
///
/// ```
/// use stepwise::{CollectingSink, ResultSink};
///
/// let sink = CollectingSink::new();
/// assert!(sink.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct CollectingSink {
    results: Mutex<Vec<TestResult>>,
}

impl CollectingSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<TestResult>> {
        match self.results.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Returns a copy of every result delivered so far, in delivery order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<TestResult> {
        self.lock().clone()
    }

    /// Removes and returns every result delivered so far.
    pub fn drain(&self) -> Vec<TestResult> {
        std::mem::take(&mut *self.lock())
    }

    /// Number of results delivered so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` when nothing has been delivered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl ResultSink for CollectingSink {
    fn report(&self, result: &TestResult) -> Delivery {
        self.lock().push(result.clone());
        Delivery::Continue
    }
}
