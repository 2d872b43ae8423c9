//! Shared fixtures for the behaviour tests.

use std::sync::{Arc, Mutex, MutexGuard};

use stepwise::{
    CollectingSink, Delivery, ErrorAggregator, Failure, FactoryFn, ResultSink, RunSummary,
    Scenario, ScenarioInvoker, SubjectLifecycle, TestResult,
};
use tokio_util::sync::CancellationToken;

/// Ordered event log shared between step bodies, lifecycles, and sinks.
pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn new_journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

fn lock(journal: &Journal) -> MutexGuard<'_, Vec<String>> {
    match journal.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

pub fn note(journal: &Journal, entry: impl Into<String>) {
    lock(journal).push(entry.into());
}

pub fn entries(journal: &Journal) -> Vec<String> {
    lock(journal).clone()
}

/// Lifecycle whose subject is the journal itself, logging construction and
/// disposal.
pub struct JournalLifecycle {
    journal: Journal,
}

impl JournalLifecycle {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: Arc::clone(journal),
        }
    }
}

impl SubjectLifecycle for JournalLifecycle {
    type Subject = Journal;

    fn construct(&self) -> Result<Journal, Failure> {
        note(&self.journal, "construct");
        Ok(Arc::clone(&self.journal))
    }

    fn dispose(&self, subject: Journal) -> Result<(), Failure> {
        note(&self.journal, "dispose");
        drop(subject);
        Ok(())
    }
}

/// Lifecycle producing the journal without logging, for tests that only care
/// about step-level events.
pub fn quiet_lifecycle(journal: &Journal) -> FactoryFn<impl Fn() -> Result<Journal, Failure>> {
    let journal = Arc::clone(journal);
    FactoryFn::new(move || Ok(Arc::clone(&journal)))
}

/// Sink that appends every delivery to the journal, so tests can interleave
/// reporting order with step-level events.
pub struct JournalSink {
    journal: Journal,
}

impl JournalSink {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: Arc::clone(journal),
        }
    }
}

impl ResultSink for JournalSink {
    fn report(&self, result: &TestResult) -> Delivery {
        note(
            &self.journal,
            format!("report {} {}", result.outcome().label(), result.display_name()),
        );
        Delivery::Continue
    }
}

/// Runs one scenario against a fresh collecting sink.
pub async fn run_collecting<L: SubjectLifecycle>(
    scenario: &Scenario<L>,
) -> (RunSummary, Vec<TestResult>) {
    let sink = CollectingSink::new();
    let mut invoker = ScenarioInvoker::new(
        scenario,
        &sink,
        ErrorAggregator::new(),
        CancellationToken::new(),
    );
    let summary = invoker.run().await;
    (summary, sink.drain())
}

/// Runs one scenario against the supplied sink.
pub async fn run_with_sink<L: SubjectLifecycle>(
    scenario: &Scenario<L>,
    sink: &dyn ResultSink,
) -> RunSummary {
    let mut invoker =
        ScenarioInvoker::new(scenario, sink, ErrorAggregator::new(), CancellationToken::new());
    invoker.run().await
}

/// Display name plus outcome label for every result, in delivery order.
pub fn labelled(results: &[TestResult]) -> Vec<(String, String)> {
    results
        .iter()
        .map(|result| {
            (
                result.display_name().to_owned(),
                result.outcome().label().to_owned(),
            )
        })
        .collect()
}

/// The failure or skip message carried by a result, when any.
pub fn message_of(result: &TestResult) -> Option<String> {
    match result.outcome() {
        stepwise::TestOutcome::Failed { failure, .. } => Some(failure.to_string()),
        stepwise::TestOutcome::Skipped { reason } => Some(reason.clone()),
        stepwise::TestOutcome::Passed { .. } => None,
    }
}
