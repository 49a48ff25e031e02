use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use windlass_runner::prelude::{
    AwaitError, ClientError, RunAwaiter, DEFAULT_MAX_WAIT, DEFAULT_POLL_INTERVAL,
};

#[tokio::test(start_paused = true)]
async fn completes_when_the_predicate_turns_true_before_the_deadline() {
    let awaiter = RunAwaiter::new(DEFAULT_POLL_INTERVAL, DEFAULT_MAX_WAIT);
    let polls = Arc::new(AtomicU32::new(0));
    let polls_in_predicate = Arc::clone(&polls);

    let started = tokio::time::Instant::now();
    let result = awaiter
        .await_completion(
            move || {
                let polls = Arc::clone(&polls_in_predicate);
                async move { Ok(polls.fetch_add(1, Ordering::SeqCst) + 1 >= 10) }
            },
            || async { panic!("diagnostic must not run when the run completes") },
        )
        .await;

    assert!(result.is_ok());
    assert_eq!(polls.load(Ordering::SeqCst), 10);
    // Nine sleeps between the ten polls, measured from call entry.
    assert_eq!(started.elapsed(), Duration::from_secs(45));
}

#[tokio::test(start_paused = true)]
async fn deadline_expiry_runs_the_diagnostic_exactly_once() {
    let awaiter = RunAwaiter::new(DEFAULT_POLL_INTERVAL, DEFAULT_MAX_WAIT);
    let diagnostics = Arc::new(AtomicU32::new(0));
    let diagnostics_in_callback = Arc::clone(&diagnostics);

    let result = awaiter
        .await_completion(
            || async { Ok(false) },
            move || async move {
                diagnostics_in_callback.fetch_add(1, Ordering::SeqCst);
            },
        )
        .await;

    assert!(matches!(
        result,
        Err(AwaitError::Timeout { waited }) if waited == Duration::from_secs(4 * 60 * 60)
    ));
    assert_eq!(diagnostics.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn predicate_error_propagates_instead_of_being_polled_again() {
    let awaiter = RunAwaiter::new(DEFAULT_POLL_INTERVAL, DEFAULT_MAX_WAIT);
    let polls = Arc::new(AtomicU32::new(0));
    let polls_in_predicate = Arc::clone(&polls);

    let started = tokio::time::Instant::now();
    let result = awaiter
        .await_completion(
            move || {
                let polls = Arc::clone(&polls_in_predicate);
                async move {
                    if polls.fetch_add(1, Ordering::SeqCst) + 1 == 3 {
                        Err(ClientError::UnknownRun {
                            run_id: "stale".to_string(),
                        })
                    } else {
                        Ok(false)
                    }
                }
            },
            || async { panic!("diagnostic only runs on timeout") },
        )
        .await;

    assert!(matches!(
        result,
        Err(AwaitError::Client(ClientError::UnknownRun { .. }))
    ));
    assert_eq!(polls.load(Ordering::SeqCst), 3);
    // The failure surfaced on the third poll, not at the deadline.
    assert_eq!(started.elapsed(), Duration::from_secs(10));
}
