//! Scenario execution engine for step-discovery behaviour tests.
//!
//! A scenario is a user-authored test body. Running it once *discovers* an
//! ordered sequence of named steps: the body declares each step into a
//! [`StepRecorder`] as a side effect of executing. The engine then re-executes
//! every discovered step as an independently reported result, enforcing
//! subject isolation, cascading-failure semantics, and deferred teardown in
//! reverse registration order.
//!
//! The crate deliberately stops at the engine boundary: host-framework
//! discovery and reporting are abstracted behind [`ResultSink`], subject
//! construction behind [`SubjectLifecycle`], and background resolution behind
//! [`BackgroundSource`].
//!
//! # Examples
//!
//! ```
//! use stepwise::{
//!     CollectingSink, ErrorAggregator, FactoryFn, Scenario, ScenarioInvoker, sync_body,
//!     sync_discovery,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! let scenario = Scenario::new(
//!     "Stack::push_pop",
//!     1,
//!     FactoryFn::new(|| Ok(Vec::<u32>::new())),
//!     sync_discovery(|_, recorder| {
//!         recorder.declare(
//!             "when pushing 1 onto the stack",
//!             sync_body(|stack: &mut Vec<u32>, _| {
//!                 stack.push(1);
//!                 Ok(())
//!             }),
//!         );
//!         recorder.declare(
//!             "then the stack holds one item",
//!             sync_body(|stack: &mut Vec<u32>, _| {
//!                 if stack.len() == 1 { Ok(()) } else { Err("wrong size".into()) }
//!             }),
//!         );
//!         Ok(())
//!     }),
//! );
//!
//! let sink = CollectingSink::new();
//! let mut invoker = ScenarioInvoker::new(
//!     &scenario,
//!     &sink,
//!     ErrorAggregator::new(),
//!     CancellationToken::new(),
//! );
//! let summary = futures_executor(invoker.run());
//! assert_eq!(summary.total, 2);
//! assert_eq!(summary.failed, 0);
//!
//! // Any executor works; the engine only needs to be polled to completion.
//! fn futures_executor<T>(fut: impl Future<Output = T>) -> T {
//!     let runtime = tokio::runtime::Builder::new_current_thread()
//!         .build()
//!         .unwrap();
//!     runtime.block_on(fut)
//! }
//! ```

pub mod aggregator;
pub mod background;
pub mod config;
pub mod engine;
pub mod error;
pub mod hooks;
pub mod naming;
pub mod panic;
pub mod recorder;
pub mod report;
pub mod runner;
pub mod step;
pub mod subject;
pub mod summary;
pub mod timer;

pub use aggregator::ErrorAggregator;
pub use background::{BackgroundList, BackgroundSource};
pub use engine::{Scenario, ScenarioInvoker};
pub use error::{AggregateFailure, Failure, PrecedingStepFailed};
pub use hooks::{HookFuture, ScenarioHook};
pub use panic::panic_message;
pub use recorder::{DiscoveryBody, DiscoveryFuture, StepRecorder, sync_discovery};
pub use report::collect::CollectingSink;
pub use report::{Delivery, ResultSink, TestIdentity, TestOutcome, TestResult};
pub use runner::StepRunner;
pub use step::{StepBody, StepBuilder, StepDefinition, StepFuture, StepScope, Teardown, sync_body};
pub use subject::{FactoryFn, Stateless, SubjectLifecycle};
pub use summary::RunSummary;
pub use timer::ExecutionTimer;
