//! Tokio current-thread harness adapter.

use stepwise_harness::{HarnessAdapter, ScenarioRunRequest};

/// Drives scenario futures inside a Tokio current-thread runtime with a
/// [`LocalSet`](tokio::task::LocalSet).
///
/// `TokioHarness` builds a new single-threaded Tokio runtime and a `LocalSet`
/// per scenario invocation, then blocks on the scenario future. Scenario
/// futures need not be `Send`, and `tokio::task::spawn_local` is available to
/// step bodies while the future runs.
///
/// After the future resolves, the harness performs a single
/// `tokio::task::yield_now().await` tick so tasks queued via `spawn_local`
/// that complete in one poll can make progress; it is not a full drain of the
/// `LocalSet` queue. Prefer explicit `.await`-based coordination inside step
/// bodies when completion is required.
///
/// # Examples
///
/// ```
/// use stepwise_harness::{
///     HarnessAdapter, ScenarioMetadata, ScenarioRunRequest, ScenarioRunner,
/// };
/// use stepwise_harness_tokio::TokioHarness;
///
/// let request = ScenarioRunRequest::new(
///     ScenarioMetadata::new("Stack::push_pop", 5),
///     ScenarioRunner::new(|| Box::pin(std::future::ready(2 + 2))),
/// );
/// let harness = TokioHarness::new();
/// assert_eq!(harness.run(request), 4);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioHarness;

impl TokioHarness {
    /// Creates a new Tokio harness instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl HarnessAdapter for TokioHarness {
    fn run<T>(&self, request: ScenarioRunRequest<'_, T>) -> T {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap_or_else(|err| {
                panic!("stepwise-harness-tokio: failed to build Tokio runtime: {err}")
            });
        let local_set = tokio::task::LocalSet::new();
        local_set.block_on(&runtime, async {
            let result = request.into_future().await;
            // One cooperative tick so tasks queued via `spawn_local` can make
            // progress; intentionally not a full drain.
            tokio::task::yield_now().await;
            result
        })
    }
}
