//! Step definitions, the declaration builder, and the execution scope.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::error::Failure;

/// Future returned by a step body, borrowing the subject and scope it was
/// invoked with.
pub type StepFuture<'a> = Pin<Box<dyn Future<Output = Result<(), Failure>> + 'a>>;

/// Canonical asynchronous step body.
///
/// Synchronous bodies are adapters over this signature; see [`sync_body`].
pub type StepBody<S> = Box<dyn for<'a> FnMut(&'a mut S, &'a mut StepScope) -> StepFuture<'a>>;

/// A deferred cleanup action registered by a step, run exactly once after
/// every step of the scenario has run.
pub type Teardown = Box<dyn FnOnce() -> Result<(), Failure>>;

/// Lifts a synchronous step body into the canonical asynchronous form.
///
/// # Examples
///
/// ```
/// use stepwise::{StepBody, sync_body};
///
/// let _body: StepBody<Vec<u32>> = sync_body(|items: &mut Vec<u32>, _scope| {
///     items.push(1);
///     Ok(())
/// });
/// ```
pub fn sync_body<S, F>(mut body: F) -> StepBody<S>
where
    S: 'static,
    F: FnMut(&mut S, &mut StepScope) -> Result<(), Failure> + 'static,
{
    Box::new(move |subject, scope| Box::pin(std::future::ready(body(subject, scope))))
}

/// Registrar handed to a step body while it runs.
///
/// Teardowns registered here are moved onto the owning [`StepDefinition`] once
/// the body completes; the orchestrator runs them after all steps, in reverse
/// registration order across the whole scenario.
#[derive(Default)]
pub struct StepScope {
    teardowns: Vec<Teardown>,
}

impl StepScope {
    /// Creates an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fallible cleanup action.
    pub fn defer(&mut self, action: impl FnOnce() -> Result<(), Failure> + 'static) {
        self.teardowns.push(Box::new(action));
    }

    /// Keeps `resource` alive until the teardown phase, then drops it.
    pub fn defer_drop<T: 'static>(&mut self, resource: T) {
        self.defer(move || {
            drop(resource);
            Ok(())
        });
    }

    /// Number of registered teardowns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.teardowns.len()
    }

    /// Returns `true` when no teardowns are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.teardowns.is_empty()
    }

    pub(crate) fn drain(&mut self) -> Vec<Teardown> {
        std::mem::take(&mut self.teardowns)
    }
}

impl fmt::Debug for StepScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepScope")
            .field("teardowns", &self.teardowns.len())
            .finish()
    }
}

/// One discovered unit of behaviour within a scenario.
///
/// Produced during the discovery pass and immutable afterwards, except for
/// teardown accumulation during the step's own execution.
pub struct StepDefinition<S: 'static> {
    text: String,
    body: StepBody<S>,
    skip_reason: Option<String>,
    isolated: bool,
    background: bool,
    teardowns: Vec<Teardown>,
}

impl<S: 'static> StepDefinition<S> {
    pub(crate) fn new(text: String, body: StepBody<S>, background: bool) -> Self {
        Self {
            text,
            body,
            skip_reason: None,
            isolated: false,
            background,
            teardowns: Vec::new(),
        }
    }

    /// Display text of the step.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Reason the step should be skipped, when set.
    #[must_use]
    pub fn skip_reason(&self) -> Option<&str> {
        self.skip_reason.as_deref()
    }

    /// Whether the step runs against a freshly constructed subject.
    #[must_use]
    pub const fn is_isolated(&self) -> bool {
        self.isolated
    }

    /// Whether the step was declared while background steps were replaying.
    #[must_use]
    pub const fn is_background(&self) -> bool {
        self.background
    }

    /// Number of teardowns accumulated so far.
    #[must_use]
    pub fn teardown_count(&self) -> usize {
        self.teardowns.len()
    }

    pub(crate) fn invoke<'a>(
        &'a mut self,
        subject: &'a mut S,
        scope: &'a mut StepScope,
    ) -> StepFuture<'a> {
        (self.body)(subject, scope)
    }

    pub(crate) fn append_teardowns(&mut self, teardowns: Vec<Teardown>) {
        self.teardowns.extend(teardowns);
    }

    pub(crate) fn take_teardowns(&mut self) -> Vec<Teardown> {
        std::mem::take(&mut self.teardowns)
    }

    fn set_skip_reason(&mut self, reason: String) {
        self.skip_reason = Some(reason);
    }

    fn set_isolated(&mut self) {
        self.isolated = true;
    }

    fn push_teardown(&mut self, teardown: Teardown) {
        self.teardowns.push(teardown);
    }
}

impl<S: 'static> fmt::Debug for StepDefinition<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDefinition")
            .field("text", &self.text)
            .field("skip_reason", &self.skip_reason)
            .field("isolated", &self.isolated)
            .field("background", &self.background)
            .field("teardowns", &self.teardowns.len())
            .finish()
    }
}

/// Chainable configuration handle over a just-declared step.
///
/// # Examples
///
/// ```
/// use stepwise::{StepRecorder, sync_body};
///
/// let mut recorder = StepRecorder::<Vec<u32>>::new();
/// recorder
///     .declare("then the stack pops 1", sync_body(|_, _| Ok(())))
///     .in_isolation()
///     .skip("pending hardware");
/// ```
#[derive(Debug)]
pub struct StepBuilder<'a, S: 'static> {
    definition: &'a mut StepDefinition<S>,
}

impl<'a, S: 'static> StepBuilder<'a, S> {
    pub(crate) fn new(definition: &'a mut StepDefinition<S>) -> Self {
        Self { definition }
    }

    /// Runs this step against a freshly constructed subject.
    pub fn in_isolation(self) -> Self {
        self.definition.set_isolated();
        self
    }

    /// Marks this step to be reported as skipped instead of executed.
    pub fn skip(self, reason: impl Into<String>) -> Self {
        self.definition.set_skip_reason(reason.into());
        self
    }

    /// Registers a teardown at declaration time.
    pub fn teardown(self, action: impl FnOnce() -> Result<(), Failure> + 'static) -> Self {
        self.definition.push_teardown(Box::new(action));
        self
    }
}
