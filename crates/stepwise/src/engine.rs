//! The scenario execution engine.
//!
//! One [`Scenario`] describes a user-authored test body together with its
//! subject lifecycle, hooks, and backgrounds. A [`ScenarioInvoker`] drives one
//! invocation: it discovers the step sequence by running the body once, then
//! executes each discovered step as an independently reported result with
//! cascading-failure semantics, and finally runs the accumulated teardowns in
//! reverse.

use std::time::Duration;

use log::{debug, warn};
use tokio_util::sync::CancellationToken;

use crate::aggregator::ErrorAggregator;
use crate::background::{BackgroundList, BackgroundSource};
use crate::error::{Failure, PrecedingStepFailed};
use crate::hooks::ScenarioHook;
use crate::naming;
use crate::panic::{catch_failure, catch_failure_call};
use crate::recorder::{DiscoveryBody, StepRecorder};
use crate::report::{ResultSink, TestIdentity, TestOutcome, TestResult, deliver};
use crate::runner::StepRunner;
use crate::step::Teardown;
use crate::subject::SubjectLifecycle;
use crate::summary::RunSummary;
use crate::timer::ExecutionTimer;

/// One user-authored scenario plus everything needed to execute it.
pub struct Scenario<L: SubjectLifecycle> {
    method_name: String,
    params: Vec<String>,
    args: Vec<String>,
    ordinal: u32,
    lifecycle: L,
    body: DiscoveryBody<L::Subject>,
    backgrounds: Box<dyn BackgroundSource<L::Subject>>,
    hooks: Vec<Box<dyn ScenarioHook>>,
}

impl<L: SubjectLifecycle> Scenario<L> {
    /// Describes a scenario from its method name, 1-based ordinal, subject
    /// lifecycle, and discovery body.
    pub fn new(
        method_name: impl Into<String>,
        ordinal: u32,
        lifecycle: L,
        body: DiscoveryBody<L::Subject>,
    ) -> Self {
        Self {
            method_name: method_name.into(),
            params: Vec::new(),
            args: Vec::new(),
            ordinal,
            lifecycle,
            body,
            backgrounds: Box::new(BackgroundList::new()),
            hooks: Vec::new(),
        }
    }

    /// Attaches the resolved arguments used when naming the scenario.
    #[must_use]
    pub fn with_args(mut self, params: Vec<String>, args: Vec<String>) -> Self {
        self.params = params;
        self.args = args;
        self
    }

    /// Attaches the background source replayed ahead of the body.
    #[must_use]
    pub fn with_backgrounds(
        mut self,
        backgrounds: impl BackgroundSource<L::Subject> + 'static,
    ) -> Self {
        self.backgrounds = Box::new(backgrounds);
        self
    }

    /// Appends a before/after hook pair.
    #[must_use]
    pub fn with_hook(mut self, hook: Box<dyn ScenarioHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// 1-based ordinal used when naming step results.
    #[must_use]
    pub const fn ordinal(&self) -> u32 {
        self.ordinal
    }

    /// Display name including the rendered argument list.
    #[must_use]
    pub fn display_name(&self) -> String {
        naming::scenario_display_name(&self.method_name, &self.params, &self.args)
    }

    /// The scenario-level hook pairs in declaration order.
    #[must_use]
    pub fn hooks(&self) -> &[Box<dyn ScenarioHook>] {
        &self.hooks
    }

    /// The subject lifecycle collaborator.
    pub fn lifecycle(&self) -> &L {
        &self.lifecycle
    }

    fn body(&self) -> &DiscoveryBody<L::Subject> {
        &self.body
    }

    fn background_source(&self) -> &dyn BackgroundSource<L::Subject> {
        self.backgrounds.as_ref()
    }
}

/// Drives one scenario invocation through discovery, step execution,
/// teardown, and cleanup.
///
/// Failures that produce no per-result payload (construction, hook, and
/// disposal failures) stay readable on [`aggregator`](Self::aggregator) so the
/// host framework can surface them.
pub struct ScenarioInvoker<'a, L: SubjectLifecycle> {
    scenario: &'a Scenario<L>,
    sink: &'a dyn ResultSink,
    aggregator: ErrorAggregator,
    token: CancellationToken,
    timer: ExecutionTimer,
    display_name: String,
}

impl<'a, L: SubjectLifecycle> ScenarioInvoker<'a, L> {
    /// Prepares an invoker for one run of `scenario`.
    pub fn new(
        scenario: &'a Scenario<L>,
        sink: &'a dyn ResultSink,
        aggregator: ErrorAggregator,
        token: CancellationToken,
    ) -> Self {
        let display_name = scenario.display_name();
        Self {
            scenario,
            sink,
            aggregator,
            token,
            timer: ExecutionTimer::new(),
            display_name,
        }
    }

    /// Scenario-level failures recorded outside any reported result.
    #[must_use]
    pub fn aggregator(&self) -> &ErrorAggregator {
        &self.aggregator
    }

    /// Runs the scenario to completion and returns the accumulated summary.
    pub async fn run(&mut self) -> RunSummary {
        let mut summary = RunSummary::default();
        if self.token.is_cancelled() {
            return summary;
        }
        debug!("running scenario {}", self.display_name);

        let mut shared = self.construct_subject();
        if !self.token.is_cancelled() {
            let hooks_run = if self.aggregator.has_failures() {
                Vec::new()
            } else {
                self.run_before_hooks().await
            };

            if !self.token.is_cancelled() && !self.aggregator.has_failures() {
                if let Some(subject) = shared.as_mut() {
                    summary.aggregate(&self.invoke_scenario_body(subject).await);
                }
            }

            self.run_after_hooks(&hooks_run).await;
        }
        self.dispose_subject(shared);

        summary.time += self.timer.total();
        if self.aggregator.has_failures() {
            warn!(
                "scenario {} recorded {} failure(s) outside step results",
                self.display_name,
                self.aggregator.failures().len()
            );
        }
        summary
    }

    fn construct_subject(&mut self) -> Option<L::Subject> {
        if self.aggregator.has_failures() {
            return None;
        }
        match self.timer.measure(|| self.scenario.lifecycle().construct()) {
            Ok(subject) => Some(subject),
            Err(failure) => {
                self.aggregator.record(failure);
                None
            }
        }
    }

    async fn run_before_hooks(&mut self) -> Vec<usize> {
        let mut hooks_run = Vec::new();
        for (index, hook) in self.scenario.hooks().iter().enumerate() {
            let result = self
                .timer
                .measure_async(catch_failure_call(|| hook.before(&self.display_name)))
                .await;
            match result {
                Ok(()) => hooks_run.push(index),
                Err(failure) => {
                    self.aggregator.record(failure);
                    break;
                }
            }
            if self.token.is_cancelled() {
                break;
            }
        }
        hooks_run
    }

    async fn run_after_hooks(&mut self, hooks_run: &[usize]) {
        for index in hooks_run.iter().rev() {
            if let Some(hook) = self.scenario.hooks().get(*index) {
                let result = self
                    .timer
                    .measure_async(catch_failure_call(|| hook.after(&self.display_name)))
                    .await;
                if let Err(failure) = result {
                    self.aggregator.record(failure);
                }
            }
        }
    }

    async fn invoke_scenario_body(&mut self, subject: &mut L::Subject) -> RunSummary {
        let mut discovery_timer = ExecutionTimer::new();
        let mut recorder = StepRecorder::new();

        if let Err(failure) = self
            .discover(subject, &mut recorder, &mut discovery_timer)
            .await
        {
            let _ = recorder.extract();
            let identity = TestIdentity::scenario(self.display_name.clone());
            let outcome = TestOutcome::Failed {
                duration: discovery_timer.total(),
                failure,
            };
            deliver(self.sink, &TestResult::new(identity, outcome), &self.token);
            return RunSummary {
                total: 1,
                failed: 1,
                skipped: 0,
                time: discovery_timer.total(),
            };
        }

        let mut steps = recorder.extract();
        debug!(
            "discovered {} step(s) for {}",
            steps.len(),
            self.display_name
        );
        if steps.is_empty() {
            let identity = TestIdentity::scenario(self.display_name.clone());
            let outcome = TestOutcome::Passed {
                duration: discovery_timer.total(),
            };
            deliver(self.sink, &TestResult::new(identity, outcome), &self.token);
            return RunSummary {
                total: 1,
                failed: 0,
                skipped: 0,
                time: discovery_timer.total(),
            };
        }

        let step_count = steps.len();
        let mut summary = RunSummary {
            time: discovery_timer.total(),
            ..RunSummary::default()
        };
        let mut failed_step_name: Option<String> = None;
        let mut teardowns: Vec<Teardown> = Vec::new();

        for (index, step) in steps.iter_mut().enumerate() {
            let identity = TestIdentity::step(
                &self.display_name,
                self.scenario.ordinal(),
                index + 1,
                step.text(),
            );

            if let Some(name) = &failed_step_name {
                summary.total += 1;
                summary.failed += 1;
                let failure = Failure::new(PrecedingStepFailed { name: name.clone() });
                let outcome = TestOutcome::Failed {
                    duration: Duration::ZERO,
                    failure,
                };
                deliver(self.sink, &TestResult::new(identity, outcome), &self.token);
                continue;
            }

            let runner = StepRunner::new(
                step,
                identity,
                self.scenario.lifecycle(),
                Some(&mut *subject),
                self.scenario.hooks(),
                self.aggregator.child(),
                self.token.clone(),
            );
            let (fragment, failed) = runner.run(self.sink).await;
            summary.aggregate(&fragment);
            teardowns.extend(step.take_teardowns());
            if failed && failed_step_name.is_none() {
                failed_step_name = Some(step.text().to_owned());
            }
        }

        summary.aggregate(&self.run_teardowns(teardowns, step_count));
        summary
    }

    async fn discover(
        &self,
        subject: &mut L::Subject,
        recorder: &mut StepRecorder<L::Subject>,
        timer: &mut ExecutionTimer,
    ) -> Result<(), Failure> {
        recorder.set_replaying_background(true);
        let replayed = self.replay_backgrounds(subject, recorder, timer).await;
        recorder.set_replaying_background(false);
        replayed?;

        timer
            .measure_async(catch_failure_call(|| (self.scenario.body())(subject, recorder)))
            .await
    }

    async fn replay_backgrounds(
        &self,
        subject: &mut L::Subject,
        recorder: &mut StepRecorder<L::Subject>,
        timer: &mut ExecutionTimer,
    ) -> Result<(), Failure> {
        for background in self.scenario.background_source().backgrounds() {
            timer
                .measure_async(catch_failure_call(|| background(&mut *subject, &mut *recorder)))
                .await?;
        }
        Ok(())
    }

    fn run_teardowns(&self, teardowns: Vec<Teardown>, step_count: usize) -> RunSummary {
        let mut summary = RunSummary::default();
        if teardowns.is_empty() {
            return summary;
        }
        debug!(
            "running {} teardown(s) for {}",
            teardowns.len(),
            self.display_name
        );

        let mut teardown_timer = ExecutionTimer::new();
        let mut teardown_aggregator = ErrorAggregator::new();
        for teardown in teardowns.into_iter().rev() {
            teardown_timer.measure(|| teardown_aggregator.run(|| catch_failure(teardown)));
        }
        summary.time += teardown_timer.total();

        if teardown_aggregator.has_failures() {
            summary.total += 1;
            summary.failed += 1;
            let identity = TestIdentity::step(
                &self.display_name,
                self.scenario.ordinal(),
                step_count + 1,
                naming::TEARDOWN_STEP_NAME,
            );
            let failure = teardown_aggregator
                .to_failure()
                .unwrap_or_else(|| Failure::message("teardown failed without a recorded cause"));
            let outcome = TestOutcome::Failed {
                duration: teardown_timer.total(),
                failure,
            };
            deliver(self.sink, &TestResult::new(identity, outcome), &self.token);
        }
        summary
    }

    fn dispose_subject(&mut self, shared: Option<L::Subject>) {
        if let Some(subject) = shared {
            let disposed = self
                .timer
                .measure(|| self.scenario.lifecycle().dispose(subject));
            if let Err(failure) = disposed {
                self.aggregator.record(failure);
            }
        }
    }
}
