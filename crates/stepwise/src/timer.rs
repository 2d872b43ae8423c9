//! Wall-clock accumulation across measured operations.

use std::future::Future;
use std::time::{Duration, Instant};

/// Accumulates elapsed wall-clock time across any number of measured
/// operations.
///
/// The measured value is returned unchanged, so a fallible operation's `Err`
/// propagates to the caller with its elapsed time already added to the total.
///
/// # Examples
///
/// ```
/// use stepwise::ExecutionTimer;
///
/// let mut timer = ExecutionTimer::new();
/// let value = timer.measure(|| 21 * 2);
/// assert_eq!(value, 42);
///
/// let failed: Result<(), &str> = timer.measure(|| Err("broken"));
/// assert_eq!(failed, Err("broken"));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ExecutionTimer {
    total: Duration,
}

impl ExecutionTimer {
    /// Creates a timer with an empty total.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            total: Duration::ZERO,
        }
    }

    /// Returns the accumulated elapsed time.
    #[must_use]
    pub const fn total(&self) -> Duration {
        self.total
    }

    /// Runs `op`, adds its elapsed time to the total, and returns its value.
    pub fn measure<T>(&mut self, op: impl FnOnce() -> T) -> T {
        let started = Instant::now();
        let value = op();
        self.total += started.elapsed();
        value
    }

    /// Awaits `op`, adds its elapsed time to the total, and returns its value.
    pub async fn measure_async<T>(&mut self, op: impl Future<Output = T>) -> T {
        let started = Instant::now();
        let value = op.await;
        self.total += started.elapsed();
        value
    }
}
