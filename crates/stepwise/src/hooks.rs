//! Before/after hook pairs scoped to a scenario and its steps.

use std::future::Future;
use std::pin::Pin;

use crate::error::Failure;

/// Future returned by one side of a hook.
pub type HookFuture<'a> = Pin<Box<dyn Future<Output = Result<(), Failure>> + 'a>>;

/// A before/after pair invoked around the scenario and around each step.
///
/// Both sides receive the scenario display name as context. The orchestrator
/// only runs `after` for hooks whose `before` succeeded, in reverse order.
pub trait ScenarioHook {
    /// Runs before the scenario (and before each step).
    fn before<'a>(&'a self, scenario: &'a str) -> HookFuture<'a>;

    /// Runs after the scenario (and after each step).
    fn after<'a>(&'a self, scenario: &'a str) -> HookFuture<'a>;
}

/// Builds a hook from a pair of synchronous closures.
///
/// # Examples
///
/// ```
/// use stepwise::hooks;
///
/// let hook = hooks::from_fns(
///     |scenario| {
///         log::debug!("entering {scenario}");
///         Ok(())
///     },
///     |_| Ok(()),
/// );
/// let _ = hook;
/// ```
pub fn from_fns<B, A>(before: B, after: A) -> Box<dyn ScenarioHook>
where
    B: Fn(&str) -> Result<(), Failure> + 'static,
    A: Fn(&str) -> Result<(), Failure> + 'static,
{
    Box::new(FnHook { before, after })
}

struct FnHook<B, A> {
    before: B,
    after: A,
}

impl<B, A> ScenarioHook for FnHook<B, A>
where
    B: Fn(&str) -> Result<(), Failure> + 'static,
    A: Fn(&str) -> Result<(), Failure> + 'static,
{
    fn before<'a>(&'a self, scenario: &'a str) -> HookFuture<'a> {
        Box::pin(std::future::ready((self.before)(scenario)))
    }

    fn after<'a>(&'a self, scenario: &'a str) -> HookFuture<'a> {
        Box::pin(std::future::ready((self.after)(scenario)))
    }
}
