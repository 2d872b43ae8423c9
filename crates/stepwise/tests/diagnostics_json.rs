//! JSON rendering of an engine run's collected results.

#![cfg(feature = "diagnostics")]

mod common;

use common::{Journal, new_journal, note, quiet_lifecycle};
use stepwise::report::json;
use stepwise::{
    CollectingSink, ErrorAggregator, Scenario, ScenarioInvoker, sync_body, sync_discovery,
};
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn a_mixed_run_serializes_with_lowercase_statuses() {
    let journal = new_journal();
    let scenario = Scenario::new(
        "Pump::starts",
        1,
        quiet_lifecycle(&journal),
        sync_discovery(|_, recorder| {
            recorder.declare(
                "given pressure",
                sync_body(|journal: &mut Journal, _| {
                    note(journal, "given");
                    Ok(())
                }),
            );
            recorder
                .declare("a pending step", sync_body(|_, _| Ok(())))
                .skip("awaiting parts");
            recorder.declare("a failing step", sync_body(|_, _| Err("gauge broken".into())));
            Ok(())
        }),
    );
    let sink = CollectingSink::new();
    let mut invoker = ScenarioInvoker::new(
        &scenario,
        &sink,
        ErrorAggregator::new(),
        CancellationToken::new(),
    );
    let _ = invoker.run().await;

    let mut buffer = Vec::new();
    let written = json::write(&mut buffer, &sink.snapshot());
    assert!(written.is_ok());
    let rendered = String::from_utf8_lossy(&buffer);

    assert!(rendered.contains("\"status\":\"passed\""));
    assert!(rendered.contains("\"status\":\"skipped\""));
    assert!(rendered.contains("\"status\":\"failed\""));
    assert!(rendered.contains("awaiting parts"));
    assert!(rendered.contains("gauge broken"));
    assert!(rendered.contains("[01.01] given pressure"));
}
