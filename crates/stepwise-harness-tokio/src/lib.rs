//! Tokio current-thread harness adapter for scenario execution.

mod tokio_harness;

pub use tokio_harness::TokioHarness;
