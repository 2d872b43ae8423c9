//! Harness adapter trait for scenario execution.

use crate::runner::ScenarioRunRequest;

/// Drives scenario futures to completion inside a harness-specific
/// environment.
pub trait HarnessAdapter {
    /// Executes one scenario request and returns the runner result.
    fn run<T>(&self, request: ScenarioRunRequest<'_, T>) -> T;
}
