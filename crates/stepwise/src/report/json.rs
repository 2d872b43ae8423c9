//! JSON writer for reported results.
//!
//! Serializes a snapshot of results into a predictable, machine-readable
//! shape with lowercase status labels.

use std::io::Write;

use serde::Serialize;

use super::{TestOutcome, TestResult};

#[derive(Serialize)]
struct JsonReport<'a> {
    results: Vec<JsonResult<'a>>,
}

#[derive(Serialize)]
struct JsonResult<'a> {
    display_name: &'a str,
    status: &'static str,
    duration_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl<'a> From<&'a TestResult> for JsonResult<'a> {
    fn from(result: &'a TestResult) -> Self {
        let message = match result.outcome() {
            TestOutcome::Passed { .. } => None,
            TestOutcome::Failed { failure, .. } => Some(failure.to_string()),
            TestOutcome::Skipped { reason } => Some(reason.clone()),
        };
        Self {
            display_name: result.display_name(),
            status: result.outcome().label(),
            duration_ms: result.outcome().duration().as_millis(),
            message,
        }
    }
}

/// Serializes the provided results into the supplied writer.
///
/// # Errors
///
/// Returns any serialization or I/O error raised while writing.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use stepwise::report::json;
/// use stepwise::{TestIdentity, TestOutcome, TestResult};
///
/// let results = vec![TestResult::new(
///     TestIdentity::scenario("Pump::starts"),
///     TestOutcome::Passed { duration: Duration::from_millis(3) },
/// )];
/// let mut buffer = Vec::new();
/// json::write(&mut buffer, &results)?;
/// let rendered = String::from_utf8_lossy(&buffer);
/// assert!(rendered.contains("\"status\":\"passed\""));
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn write(writer: &mut impl Write, results: &[TestResult]) -> std::io::Result<()> {
    let report = JsonReport {
        results: results.iter().map(JsonResult::from).collect(),
    };
    serde_json::to_writer(writer, &report).map_err(std::io::Error::from)
}
