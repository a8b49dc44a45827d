mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cadence::interaction::{InteractionHandle, InteractionResponseContext};
use cadence::model::application::ResponseFlags as F;
use cadence::Error;
use parking_lot::Mutex;

fn handle() -> Arc<InteractionHandle> {
    Arc::new(InteractionHandle::new(common::command(1, "ping", serde_json::json!([]))))
}

fn failure() -> Error {
    Error::Timeout(Duration::ZERO)
}

#[tokio::test]
async fn deferral_then_ephemeral_response() {
    let handle = handle();

    let mut defer = InteractionResponseContext::new(Arc::clone(&handle), true, false);
    defer.enter().await;
    assert_eq!(handle.response_flags(), F::DEFERRING);
    defer.exit(true);
    assert_eq!(handle.response_flags(), F::DEFERRED);

    let mut respond = InteractionResponseContext::new(Arc::clone(&handle), false, true);
    respond.enter().await;
    assert_eq!(handle.response_flags(), F::DEFERRED | F::RESPONDING);
    respond.exit(true);
    assert_eq!(handle.response_flags(), F::RESPONDED | F::EPHEMERAL);
}

#[tokio::test]
async fn failed_response_rolls_back() {
    let handle = handle();
    let mut respond = InteractionResponseContext::new(Arc::clone(&handle), false, false);

    let result: Result<(), _> = respond
        .scope(async {
            assert_eq!(handle.response_flags(), F::RESPONDING);
            Err(failure())
        })
        .await;

    assert!(matches!(result, Err(Error::Timeout(_))));
    assert_eq!(handle.response_flags(), F::empty());
}

#[tokio::test]
async fn failed_deferral_rolls_back() {
    let handle = handle();
    let mut defer = InteractionResponseContext::new(Arc::clone(&handle), true, true);

    let result: Result<(), _> = defer.scope(async { Err(failure()) }).await;

    assert!(result.is_err());
    assert!(!handle.response_flags().intersects(F::DEFERRING_OR_DEFERRED));
    assert!(!handle.is_ephemeral());
}

#[tokio::test]
async fn deferring_twice_is_a_no_op() {
    let handle = handle();

    let mut first = InteractionResponseContext::new(Arc::clone(&handle), true, false);
    first.enter().await;
    first.exit(true);

    let mut second = InteractionResponseContext::new(Arc::clone(&handle), true, true);
    second.enter().await;
    assert!(!second.acquired());
    assert_eq!(handle.response_flags(), F::DEFERRED);

    second.exit(true);
    assert_eq!(handle.response_flags(), F::DEFERRED);
}

#[tokio::test]
async fn response_is_not_entered_during_deferral() {
    let handle = handle();

    let mut defer = InteractionResponseContext::new(Arc::clone(&handle), true, false);
    defer.enter().await;

    let mut respond = InteractionResponseContext::new(Arc::clone(&handle), false, false);
    respond.enter().await;
    assert!(!respond.acquired());
    assert_eq!(handle.response_flags(), F::DEFERRING);
}

#[tokio::test]
async fn ensured_bodies_run_in_order() {
    let handle = handle();
    let events = Arc::new(Mutex::new(Vec::new()));

    let first_events = Arc::clone(&events);
    let first_handle = Arc::clone(&handle);
    InteractionResponseContext::new(Arc::clone(&handle), true, false)
        .ensure(async move {
            first_events.lock().push(("a-entered", first_handle.response_flags()));
            for _ in 0..5 {
                tokio::task::yield_now().await;
            }
            first_events.lock().push(("a-done", first_handle.response_flags()));
            Ok(())
        })
        .await;

    let second_events = Arc::clone(&events);
    let second_handle = Arc::clone(&handle);
    InteractionResponseContext::new(Arc::clone(&handle), false, false)
        .ensure(async move {
            second_events.lock().push(("b-entered", second_handle.response_flags()));
            tokio::task::yield_now().await;
            Ok(())
        })
        .await;

    handle.guard().wait_for_completion().await;

    assert_eq!(*events.lock(), [
        ("a-entered", F::DEFERRING),
        ("a-done", F::DEFERRING),
        // The first body's exit applied before the second one entered.
        ("b-entered", F::DEFERRED | F::RESPONDING),
    ]);
    assert_eq!(handle.response_flags(), F::RESPONDED);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_attempts_answer_once() {
    let handle = handle();
    let responses = Arc::new(AtomicUsize::new(0));
    let overlaps = Arc::new(AtomicUsize::new(0));

    let tasks = (0..16)
        .map(|i| {
            let handle = Arc::clone(&handle);
            let responses = Arc::clone(&responses);
            let overlaps = Arc::clone(&overlaps);

            tokio::spawn(async move {
                let deferring = i % 3 == 0;
                let mut context =
                    InteractionResponseContext::new(Arc::clone(&handle), deferring, false);

                let inner = Arc::clone(&handle);
                let sent = context
                    .acquire(async move {
                        for _ in 0..3 {
                            if inner.response_flags().contains(F::ACKNOWLEDGING) {
                                overlaps.fetch_add(1, Ordering::SeqCst);
                            }
                            tokio::task::yield_now().await;
                        }
                        Ok::<_, Error>(())
                    })
                    .await
                    .unwrap();

                if sent.is_some() && !deferring {
                    responses.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect::<Vec<_>>();

    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(overlaps.load(Ordering::SeqCst), 0);
    assert!(responses.load(Ordering::SeqCst) <= 1);
    assert!(!handle.response_flags().contains(F::ACKNOWLEDGING));
    assert!(handle.is_acknowledged());
}
