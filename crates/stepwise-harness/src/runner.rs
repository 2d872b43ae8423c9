//! Shared scenario runner request and metadata types.

use std::future::Future;
use std::pin::Pin;

/// Boxed future produced by a scenario runner.
pub type HarnessFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Scenario metadata provided to harness adapters.
///
/// # Examples
///
/// ```
/// use stepwise_harness::ScenarioMetadata;
///
/// let metadata = ScenarioMetadata::new("Stack::push_pop", 3);
/// assert_eq!(metadata.display_name(), "Stack::push_pop");
/// assert_eq!(metadata.ordinal(), 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScenarioMetadata {
    display_name: String,
    ordinal: u32,
}

impl ScenarioMetadata {
    /// Creates metadata for one scenario run.
    #[must_use]
    pub fn new(display_name: impl Into<String>, ordinal: u32) -> Self {
        Self {
            display_name: display_name.into(),
            ordinal,
        }
    }

    /// Returns the scenario display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the one-based scenario ordinal.
    #[must_use]
    pub const fn ordinal(&self) -> u32 {
        self.ordinal
    }
}

impl Default for ScenarioMetadata {
    fn default() -> Self {
        Self::new("<unknown>", 1)
    }
}

/// A future-producing scenario runner owned by a harness.
///
/// # Examples
///
/// ```
/// use stepwise_harness::ScenarioRunner;
///
/// let runner = ScenarioRunner::new(|| Box::pin(std::future::ready(41 + 1)));
/// let future = runner.into_future();
/// # let _ = future;
/// ```
pub struct ScenarioRunner<'a, T> {
    inner: Box<dyn FnOnce() -> HarnessFuture<'a, T> + 'a>,
}

impl<'a, T> ScenarioRunner<'a, T> {
    /// Wraps a closure producing the scenario future.
    #[must_use]
    pub fn new(inner: impl FnOnce() -> HarnessFuture<'a, T> + 'a) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }

    /// Produces the scenario future for the harness to drive.
    #[must_use]
    pub fn into_future(self) -> HarnessFuture<'a, T> {
        (self.inner)()
    }
}

/// A harness execution request for one scenario.
pub struct ScenarioRunRequest<'a, T> {
    metadata: ScenarioMetadata,
    runner: ScenarioRunner<'a, T>,
}

impl<'a, T> ScenarioRunRequest<'a, T> {
    /// Creates a request from metadata and a runner.
    #[must_use]
    pub fn new(metadata: ScenarioMetadata, runner: ScenarioRunner<'a, T>) -> Self {
        Self { metadata, runner }
    }

    /// Returns immutable metadata for diagnostics or harness setup.
    #[must_use]
    pub fn metadata(&self) -> &ScenarioMetadata {
        &self.metadata
    }

    /// Consumes the request and returns metadata and runner separately.
    #[must_use]
    pub fn into_parts(self) -> (ScenarioMetadata, ScenarioRunner<'a, T>) {
        (self.metadata, self.runner)
    }

    /// Produces the scenario future directly.
    #[must_use]
    pub fn into_future(self) -> HarnessFuture<'a, T> {
        self.runner.into_future()
    }
}
