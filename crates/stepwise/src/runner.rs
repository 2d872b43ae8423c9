//! Execution of one step as an independently reported result.

use tokio_util::sync::CancellationToken;

use crate::aggregator::ErrorAggregator;
use crate::error::Failure;
use crate::hooks::ScenarioHook;
use crate::panic::catch_failure_call;
use crate::report::{ResultSink, TestIdentity, TestOutcome, TestResult, deliver};
use crate::step::{StepDefinition, StepScope};
use crate::subject::SubjectLifecycle;
use crate::summary::RunSummary;
use crate::timer::ExecutionTimer;

/// Runs exactly one [`StepDefinition`] as a self-contained unit of work.
///
/// The runner constructs or reuses the subject, wraps the body in the
/// scenario-level hooks, captures teardown registrations back onto the
/// definition, and delivers a pass/fail/skip result to the sink. It never
/// runs the teardowns itself.
pub struct StepRunner<'a, L: SubjectLifecycle> {
    definition: &'a mut StepDefinition<L::Subject>,
    identity: TestIdentity,
    lifecycle: &'a L,
    shared: Option<&'a mut L::Subject>,
    hooks: &'a [Box<dyn ScenarioHook>],
    aggregator: ErrorAggregator,
    token: CancellationToken,
}

impl<'a, L: SubjectLifecycle> StepRunner<'a, L> {
    /// Assembles a runner for one step.
    pub fn new(
        definition: &'a mut StepDefinition<L::Subject>,
        identity: TestIdentity,
        lifecycle: &'a L,
        shared: Option<&'a mut L::Subject>,
        hooks: &'a [Box<dyn ScenarioHook>],
        aggregator: ErrorAggregator,
        token: CancellationToken,
    ) -> Self {
        Self {
            definition,
            identity,
            lifecycle,
            shared,
            hooks,
            aggregator,
            token,
        }
    }

    /// Executes the step and reports its result.
    ///
    /// Returns the summary fragment for aggregation and whether the step
    /// failed.
    pub async fn run(mut self, sink: &dyn ResultSink) -> (RunSummary, bool) {
        let mut summary = RunSummary {
            total: 1,
            ..RunSummary::default()
        };

        if let Some(reason) = self.definition.skip_reason().map(ToOwned::to_owned) {
            summary.skipped = 1;
            let result = TestResult::new(self.identity.clone(), TestOutcome::Skipped { reason });
            deliver(sink, &result, &self.token);
            return (summary, false);
        }

        let mut timer = ExecutionTimer::new();
        let mut fresh: Option<L::Subject> = None;
        if self.definition.is_isolated() || self.shared.is_none() {
            match timer.measure(|| self.lifecycle.construct()) {
                Ok(subject) => fresh = Some(subject),
                Err(failure) => self.aggregator.record(failure),
            }
        }

        if !self.aggregator.has_failures() {
            let hooks_run = self.run_before_hooks(&mut timer).await;
            if !self.aggregator.has_failures() {
                self.run_body(&mut timer, fresh.as_mut()).await;
            }
            self.run_after_hooks(&mut timer, &hooks_run).await;
        }

        if let Some(subject) = fresh.take() {
            let disposed = timer.measure(|| self.lifecycle.dispose(subject));
            if let Err(failure) = disposed {
                self.aggregator.record(failure);
            }
        }

        let failed = self.aggregator.has_failures();
        summary.time = timer.total();
        let outcome = if failed {
            summary.failed = 1;
            let failure = self
                .aggregator
                .to_failure()
                .unwrap_or_else(|| Failure::message("step failed without a recorded cause"));
            TestOutcome::Failed {
                duration: timer.total(),
                failure,
            }
        } else {
            TestOutcome::Passed {
                duration: timer.total(),
            }
        };
        deliver(sink, &TestResult::new(self.identity.clone(), outcome), &self.token);
        (summary, failed)
    }

    async fn run_before_hooks(&mut self, timer: &mut ExecutionTimer) -> Vec<usize> {
        let mut hooks_run = Vec::new();
        for (index, hook) in self.hooks.iter().enumerate() {
            let scenario = self.identity.scenario_name();
            let result = timer
                .measure_async(catch_failure_call(|| hook.before(scenario)))
                .await;
            match result {
                Ok(()) => hooks_run.push(index),
                Err(failure) => {
                    self.aggregator.record(failure);
                    break;
                }
            }
        }
        hooks_run
    }

    async fn run_body(&mut self, timer: &mut ExecutionTimer, fresh: Option<&mut L::Subject>) {
        let Some(subject) = fresh.or_else(|| self.shared.as_deref_mut()) else {
            return;
        };
        let mut scope = StepScope::new();
        let outcome = timer
            .measure_async(catch_failure_call(|| self.definition.invoke(subject, &mut scope)))
            .await;
        if let Err(failure) = outcome {
            self.aggregator.record(failure);
        }
        self.definition.append_teardowns(scope.drain());
    }

    async fn run_after_hooks(&mut self, timer: &mut ExecutionTimer, hooks_run: &[usize]) {
        for index in hooks_run.iter().rev() {
            if let Some(hook) = self.hooks.get(*index) {
                let scenario = self.identity.scenario_name();
                let result = timer
                    .measure_async(catch_failure_call(|| hook.after(scenario)))
                    .await;
                if let Err(failure) = result {
                    self.aggregator.record(failure);
                }
            }
        }
    }
}
