//! Harness adapter contracts for `stepwise`.
//!
//! The engine's entry point is asynchronous and its futures need not be
//! `Send`. Harness adapters bridge that gap: a plain test function hands a
//! future-producing runner to an adapter, which drives it to completion in a
//! runtime of its choosing.

mod adapter;
mod runner;

pub use adapter::HarnessAdapter;
pub use runner::{HarnessFuture, ScenarioMetadata, ScenarioRunRequest, ScenarioRunner};
