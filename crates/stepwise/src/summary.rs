//! Aggregate counts for one scenario invocation.

use std::time::Duration;

/// Totals accumulated across discovery, each step, and teardown.
///
/// Counts only ever grow; [`aggregate`](Self::aggregate) folds the totals of a
/// sub-phase into the running summary.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use stepwise::RunSummary;
///
/// let mut summary = RunSummary::default();
/// summary.aggregate(&RunSummary {
///     total: 2,
///     failed: 1,
///     skipped: 0,
///     time: Duration::from_millis(5),
/// });
/// assert_eq!(summary.total, 2);
/// assert_eq!(summary.failed, 1);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of results reported.
    pub total: usize,
    /// Number of failed results reported.
    pub failed: usize,
    /// Number of skipped results reported.
    pub skipped: usize,
    /// Elapsed wall-clock time across every counted phase.
    pub time: Duration,
}

impl RunSummary {
    /// Folds another summary into this one.
    pub fn aggregate(&mut self, other: &Self) {
        self.total += other.total;
        self.failed += other.failed;
        self.skipped += other.skipped;
        self.time += other.time;
    }
}
