//! Subject isolation and skip-reason behaviour.

mod common;

use common::{
    Journal, JournalLifecycle, entries, labelled, message_of, new_journal, note, run_collecting,
};
use std::sync::{Arc, Mutex, MutexGuard};
use stepwise::{Failure, Scenario, SubjectLifecycle, sync_body, sync_discovery};

/// A stack-like subject shared by non-isolated steps: isolated pops must not
/// disturb what later shared steps observe.
#[derive(Default)]
struct StackSubject {
    items: Vec<u32>,
}

struct StackLifecycle {
    constructed: Arc<Mutex<u32>>,
}

impl StackLifecycle {
    fn new() -> Self {
        Self {
            constructed: Arc::new(Mutex::new(0)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, u32> {
        match self.constructed.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn constructed(&self) -> u32 {
        *self.lock()
    }
}

impl SubjectLifecycle for StackLifecycle {
    type Subject = StackSubject;

    fn construct(&self) -> Result<StackSubject, Failure> {
        *self.lock() += 1;
        Ok(StackSubject::default())
    }
}

fn stack_scenario() -> Scenario<StackLifecycle> {
    Scenario::new(
        "Stack::single_item",
        1,
        StackLifecycle::new(),
        sync_discovery(|_, recorder| {
            recorder.declare(
                "given one pushed item",
                sync_body(|stack: &mut StackSubject, _| {
                    stack.items.push(1);
                    Ok(())
                }),
            );
            recorder
                .declare(
                    "then popping yields 1",
                    sync_body(|stack: &mut StackSubject, _| match stack.items.pop() {
                        Some(1) => Ok(()),
                        other => Err(Failure::message(format!("popped {other:?}"))),
                    }),
                )
                .in_isolation();
            recorder.declare(
                "and the shared stack still holds its item",
                sync_body(|stack: &mut StackSubject, _| {
                    if stack.items.len() == 1 {
                        Ok(())
                    } else {
                        Err(Failure::message("shared stack was disturbed"))
                    }
                }),
            );
            Ok(())
        }),
    )
}

#[tokio::test]
async fn isolated_steps_run_against_a_fresh_subject() {
    let scenario = stack_scenario();

    let (summary, results) = run_collecting(&scenario).await;

    // The isolated pop sees an empty fresh stack and fails, while the shared
    // subject keeps its item for the final step, which then cascades.
    assert_eq!(summary.total, 3);
    let outcome_labels: Vec<_> = labelled(&results)
        .into_iter()
        .map(|(_, label)| label)
        .collect();
    assert_eq!(outcome_labels, ["passed", "failed", "failed"]);
    assert_eq!(
        results.get(1).and_then(message_of),
        Some(String::from("popped None"))
    );
    assert_eq!(scenario.lifecycle().constructed(), 2);
}

#[tokio::test]
async fn isolation_does_not_leak_into_the_shared_subject() {
    let journal = new_journal();
    let scenario = Scenario::new(
        "Pump::starts",
        1,
        JournalLifecycle::new(&journal),
        sync_discovery(|_, recorder| {
            recorder
                .declare(
                    "an isolated step",
                    sync_body(|journal: &mut Journal, _| {
                        note(journal, "isolated ran");
                        Ok(())
                    }),
                )
                .in_isolation();
            recorder.declare(
                "a shared step",
                sync_body(|journal: &mut Journal, _| {
                    note(journal, "shared ran");
                    Ok(())
                }),
            );
            Ok(())
        }),
    );

    let (summary, _) = run_collecting(&scenario).await;

    assert_eq!(summary.failed, 0);
    // The isolated step constructs and disposes its own subject around the
    // body; the shared subject is disposed at the end of the scenario.
    assert_eq!(
        entries(&journal),
        [
            "construct",
            "construct",
            "isolated ran",
            "dispose",
            "shared ran",
            "dispose",
        ]
    );
}

#[tokio::test]
async fn skipped_steps_report_their_reason_and_do_not_cascade() {
    let journal = new_journal();
    let scenario = Scenario::new(
        "Pump::starts",
        1,
        JournalLifecycle::new(&journal),
        sync_discovery(|_, recorder| {
            recorder
                .declare(
                    "a pending step",
                    sync_body(|journal: &mut Journal, _| {
                        note(journal, "pending ran");
                        Ok(())
                    }),
                )
                .skip("hardware on order");
            recorder.declare(
                "a live step",
                sync_body(|journal: &mut Journal, _| {
                    note(journal, "live ran");
                    Ok(())
                }),
            );
            Ok(())
        }),
    );

    let (summary, results) = run_collecting(&scenario).await;

    assert_eq!(summary.total, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(
        results.first().and_then(message_of),
        Some(String::from("hardware on order"))
    );
    assert_eq!(
        results.first().map(|result| result.outcome().duration()),
        Some(std::time::Duration::ZERO)
    );
    assert!(!entries(&journal).contains(&String::from("pending ran")));
    assert!(entries(&journal).contains(&String::from("live ran")));
}

#[tokio::test]
async fn construction_failure_for_an_isolated_step_fails_that_step() {
    struct FlakyLifecycle {
        calls: Arc<Mutex<u32>>,
    }

    impl SubjectLifecycle for FlakyLifecycle {
        type Subject = u32;

        fn construct(&self) -> Result<u32, Failure> {
            let mut calls = match self.calls.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            *calls += 1;
            if *calls == 1 {
                Ok(0)
            } else {
                Err(Failure::message("second construction refused"))
            }
        }
    }

    let scenario = Scenario::new(
        "Pump::starts",
        1,
        FlakyLifecycle {
            calls: Arc::new(Mutex::new(0)),
        },
        sync_discovery(|_, recorder| {
            recorder
                .declare("needs a fresh subject", sync_body(|_, _| Ok(())))
                .in_isolation();
            Ok(())
        }),
    );

    let (summary, results) = run_collecting(&scenario).await;

    assert_eq!(summary.failed, 1);
    assert_eq!(
        results.first().and_then(message_of),
        Some(String::from("second construction refused"))
    );
}
