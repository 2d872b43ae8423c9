//! Result values and the sink collaborator they are delivered to.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::Failure;
use crate::naming;

/// Thread-safe collector sink.
pub mod collect;
/// JSON writer for collected results.
#[cfg(feature = "diagnostics")]
pub mod json;

/// Identity of one reportable result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestIdentity {
    scenario: String,
    display_name: String,
}

impl TestIdentity {
    /// Identity for a scenario-level result (discovery failure or zero-step
    /// pass).
    #[must_use]
    pub fn scenario(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            scenario: name,
        }
    }

    /// Identity for one step's result.
    #[must_use]
    pub fn step(scenario: &str, scenario_ordinal: u32, step_ordinal: usize, text: &str) -> Self {
        Self {
            scenario: scenario.to_owned(),
            display_name: naming::step_display_name(scenario, scenario_ordinal, step_ordinal, text),
        }
    }

    /// Display name of the owning scenario.
    #[must_use]
    pub fn scenario_name(&self) -> &str {
        &self.scenario
    }

    /// Full display name of this result.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

/// Outcome of one reported result.
#[derive(Clone, Debug)]
pub enum TestOutcome {
    /// The unit of work completed without failure.
    Passed {
        /// Elapsed time attributed to this result.
        duration: Duration,
    },
    /// The unit of work failed.
    Failed {
        /// Elapsed time attributed to this result.
        duration: Duration,
        /// The failure carried by this result.
        failure: Failure,
    },
    /// The unit of work was skipped without executing.
    Skipped {
        /// Reason the work was skipped.
        reason: String,
    },
}

impl TestOutcome {
    /// Lowercase label for the outcome.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Passed { .. } => "passed",
            Self::Failed { .. } => "failed",
            Self::Skipped { .. } => "skipped",
        }
    }

    /// Elapsed time attributed to the result; zero for skipped results.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        match self {
            Self::Passed { duration } | Self::Failed { duration, .. } => *duration,
            Self::Skipped { .. } => Duration::ZERO,
        }
    }

    /// Whether the outcome is a failure.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// One reported result: an identity plus its outcome.
#[derive(Clone, Debug)]
pub struct TestResult {
    identity: TestIdentity,
    outcome: TestOutcome,
}

impl TestResult {
    /// Couples an identity with its outcome.
    #[must_use]
    pub fn new(identity: TestIdentity, outcome: TestOutcome) -> Self {
        Self { identity, outcome }
    }

    /// Identity of the result.
    #[must_use]
    pub fn identity(&self) -> &TestIdentity {
        &self.identity
    }

    /// Full display name of the result.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.identity.display_name()
    }

    /// Outcome of the result.
    #[must_use]
    pub fn outcome(&self) -> &TestOutcome {
        &self.outcome
    }
}

/// Whether the sink wants further results.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Keep delivering results.
    Continue,
    /// Stop the run as soon as possible.
    Halt,
}

/// Destination for reported results.
///
/// One sink may receive results from many concurrently running scenarios, so
/// implementations must be safe for concurrent delivery.
pub trait ResultSink: Send + Sync {
    /// Accepts one result, indicating whether the run should continue.
    fn report(&self, result: &TestResult) -> Delivery;
}

/// Delivers a result, cancelling the token when the sink asks for a halt.
pub(crate) fn deliver(sink: &dyn ResultSink, result: &TestResult, token: &CancellationToken) {
    log::debug!("{} {}", result.outcome().label(), result.display_name());
    if sink.report(result) == Delivery::Halt {
        token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::{Delivery, ResultSink, TestIdentity, TestOutcome, TestResult, deliver};
    use crate::error::Failure;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    #[test]
    fn scenario_identity_uses_one_name_for_both_fields() {
        let identity = TestIdentity::scenario("Pump::starts");
        assert_eq!(identity.scenario_name(), "Pump::starts");
        assert_eq!(identity.display_name(), "Pump::starts");
    }

    #[test]
    fn step_identity_embeds_the_ordinal_pair() {
        let identity = TestIdentity::step("Pump::starts", 1, 2, "the valve opens");
        assert_eq!(identity.display_name(), "Pump::starts [01.02] the valve opens");
        assert_eq!(identity.scenario_name(), "Pump::starts");
    }

    #[test]
    fn skipped_outcomes_have_zero_duration() {
        let outcome = TestOutcome::Skipped {
            reason: String::from("pending"),
        };
        assert_eq!(outcome.duration(), Duration::ZERO);
        assert_eq!(outcome.label(), "skipped");
        assert!(!outcome.is_failed());
    }

    #[test]
    fn failed_outcomes_carry_duration_and_failure() {
        let outcome = TestOutcome::Failed {
            duration: Duration::from_millis(4),
            failure: Failure::message("broken"),
        };
        assert_eq!(outcome.duration(), Duration::from_millis(4));
        assert!(outcome.is_failed());
    }

    struct HaltingSink;

    impl ResultSink for HaltingSink {
        fn report(&self, _result: &TestResult) -> Delivery {
            Delivery::Halt
        }
    }

    #[test]
    fn halt_from_the_sink_cancels_the_token() {
        let token = CancellationToken::new();
        let result = TestResult::new(
            TestIdentity::scenario("any"),
            TestOutcome::Passed {
                duration: Duration::ZERO,
            },
        );
        deliver(&HaltingSink, &result, &token);
        assert!(token.is_cancelled());
    }
}
