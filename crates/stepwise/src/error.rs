//! Failure values threaded through every execution phase.
//!
//! Failures are explicit values rather than unwound panics: each fallible
//! phase returns a [`Failure`] which callers record and keep going. The value
//! is cheap to clone so one failure can back several reported results.

use std::any::Any;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use thiserror::Error as ThisError;

use crate::panic::panic_message;

/// A single recorded failure.
///
/// Wraps the originating error without adding any layer of its own, so the
/// payload a sink receives displays as the innermost cause.
///
/// # Examples
///
/// ```
/// use stepwise::Failure;
///
/// let failure = Failure::message("subject refused to boot");
/// assert_eq!(failure.to_string(), "subject refused to boot");
/// ```
#[derive(Clone)]
pub struct Failure {
    inner: Arc<dyn Error + Send + Sync + 'static>,
}

impl Failure {
    /// Wraps a concrete error value.
    pub fn new<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(error),
        }
    }

    /// Creates a failure carrying only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(MessageError(message.into()))
    }

    /// Converts a captured panic payload into a failure.
    #[must_use]
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        Self::new(PanicError(panic_message(payload)))
    }

    /// Attempts to view the wrapped error as a concrete type.
    #[must_use]
    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Self::message(message)
    }
}

impl From<&str> for Failure {
    fn from(message: &str) -> Self {
        Self::message(message)
    }
}

#[derive(Debug, ThisError)]
#[error("{0}")]
struct MessageError(String);

#[derive(Debug, ThisError)]
#[error("{0}")]
struct PanicError(String);

/// Synthetic error reported for a step that never ran because an earlier step
/// failed.
///
/// The display text names the first failed step so every cascaded result
/// points back at the original culprit.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Failed to execute preceding step \"{name}\".")]
pub struct PrecedingStepFailed {
    /// Text of the first step that failed.
    pub name: String,
}

/// Combined error produced when several operations failed in one phase.
///
/// Constituents keep their recording order; nested aggregates are flattened on
/// construction so the display never shows aggregation scaffolding.
#[derive(Clone, Debug)]
pub struct AggregateFailure {
    failures: Vec<Failure>,
}

impl AggregateFailure {
    /// Builds an aggregate from recorded failures, flattening nested
    /// aggregates.
    #[must_use]
    pub fn new(failures: Vec<Failure>) -> Self {
        let mut flattened = Vec::with_capacity(failures.len());
        for failure in failures {
            match failure.downcast_ref::<Self>() {
                Some(nested) => flattened.extend(nested.failures.iter().cloned()),
                None => flattened.push(failure),
            }
        }
        Self {
            failures: flattened,
        }
    }

    /// Returns the constituent failures in recording order.
    #[must_use]
    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }
}

impl fmt::Display for AggregateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failures occurred:", self.failures.len())?;
        for (index, failure) in self.failures.iter().enumerate() {
            write!(f, "\n  {}: {failure}", index + 1)?;
        }
        Ok(())
    }
}

impl Error for AggregateFailure {}
