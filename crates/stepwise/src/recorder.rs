//! The discovery-scope recorder that step declarations append to.
//!
//! Exactly one recorder exists per discovery pass. It is passed by reference
//! into the scenario body and every background body, which register steps as a
//! side effect of running; the orchestrator then extracts the accumulated list
//! exactly once. Step bodies never see a recorder, so a step cannot declare
//! further steps.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::error::Failure;
use crate::step::{StepBody, StepBuilder, StepDefinition};

/// Future returned by a discovery body (a scenario or background body).
pub type DiscoveryFuture<'a> = Pin<Box<dyn Future<Output = Result<(), Failure>> + 'a>>;

/// Canonical asynchronous discovery body: runs against the subject and
/// declares steps into the recorder.
pub type DiscoveryBody<S> =
    Box<dyn for<'a> Fn(&'a mut S, &'a mut StepRecorder<S>) -> DiscoveryFuture<'a>>;

/// Lifts a synchronous discovery body into the canonical asynchronous form.
///
/// # Examples
///
/// ```
/// use stepwise::{DiscoveryBody, sync_body, sync_discovery};
///
/// let _body: DiscoveryBody<Vec<u32>> = sync_discovery(|_, recorder| {
///     recorder.declare("a first step", sync_body(|_, _| Ok(())));
///     Ok(())
/// });
/// ```
pub fn sync_discovery<S, F>(body: F) -> DiscoveryBody<S>
where
    S: 'static,
    F: Fn(&mut S, &mut StepRecorder<S>) -> Result<(), Failure> + 'static,
{
    Box::new(move |subject, recorder| Box::pin(std::future::ready(body(subject, recorder))))
}

/// Ordered collection of steps declared so far in one discovery pass.
pub struct StepRecorder<S: 'static> {
    steps: Vec<StepDefinition<S>>,
    replaying_background: bool,
}

impl<S: 'static> StepRecorder<S> {
    /// Creates an empty recorder for a new discovery pass.
    #[must_use]
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            replaying_background: false,
        }
    }

    /// Declares a step, appending it to the recorded sequence.
    ///
    /// Returns a builder over the appended definition so the call site can
    /// chain configuration before discovery moves on.
    pub fn declare(&mut self, text: impl Into<String>, body: StepBody<S>) -> StepBuilder<'_, S> {
        let definition = StepDefinition::new(text.into(), body, self.replaying_background);
        self.steps.push(definition);
        let definition = self
            .steps
            .last_mut()
            .unwrap_or_else(|| unreachable!("a definition was pushed immediately above"));
        StepBuilder::new(definition)
    }

    /// Flags whether declarations are currently replaying background bodies.
    ///
    /// The flag only tags declared steps as background-originated for
    /// diagnostics; appending behaviour is identical either way.
    pub fn set_replaying_background(&mut self, replaying: bool) {
        self.replaying_background = replaying;
    }

    /// Whether background bodies are currently replaying.
    #[must_use]
    pub const fn is_replaying_background(&self) -> bool {
        self.replaying_background
    }

    /// Number of steps recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` when no steps have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Drains the recorded steps, leaving the recorder empty.
    ///
    /// Called exactly once per discovery pass; the returned order is the
    /// authoritative step sequence.
    #[must_use]
    pub fn extract(&mut self) -> Vec<StepDefinition<S>> {
        std::mem::take(&mut self.steps)
    }
}

impl<S: 'static> Default for StepRecorder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static> fmt::Debug for StepRecorder<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepRecorder")
            .field("steps", &self.steps.len())
            .field("replaying_background", &self.replaying_background)
            .finish()
    }
}
