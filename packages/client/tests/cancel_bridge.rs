//! Cancellation bridge: responsive cancellation independent of the wrapped
//! operation, exact forwarding of the operation's own outcome.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use courier_client::cancel::race_cancellation;
use courier_client::{Error, Outcome, Result};

#[tokio::test]
async fn cancellation_wins_in_bounded_time() {
    let token = CancellationToken::new();
    let slow = async {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(1u32)
    };

    let signal = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        signal.cancel();
    });

    let outcome = tokio::time::timeout(Duration::from_secs(1), race_cancellation(slow, token))
        .await
        .expect("bridge must unblock well before the operation settles");
    assert!(outcome.is_canceled());
}

#[tokio::test]
async fn operation_success_is_forwarded_exactly() {
    let token = CancellationToken::new();
    let outcome = race_cancellation(async { Ok("payload".to_string()) }, token).await;
    assert_eq!(outcome.success(), Some("payload".to_string()));
}

#[tokio::test]
async fn operation_error_is_forwarded_exactly() {
    let token = CancellationToken::new();
    let operation = async { Err::<u32, _>(Error::request("connection reset by peer")) };

    let error = race_cancellation(operation, token)
        .await
        .failure()
        .expect("error must come through as a failure");
    assert!(error.is_request());
    assert_eq!(error.to_string(), "connection reset by peer");
}

#[tokio::test]
async fn cancelled_operation_is_not_force_aborted() {
    let finished = Arc::new(AtomicBool::new(false));
    let flag = finished.clone();
    // the operation lives on its own task; the bridge only stops awaiting it
    let work = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        flag.store(true, Ordering::SeqCst);
    });

    let token = CancellationToken::new();
    token.cancel();

    let operation = async move {
        work.await
            .map_err(|e| Error::request("worker vanished").with(e))?;
        Ok::<u32, Error>(0)
    };
    let outcome = race_cancellation(operation, token).await;
    assert!(outcome.is_canceled());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(finished.load(Ordering::SeqCst));
}

#[tokio::test]
async fn settled_operation_beats_a_simultaneous_cancel() {
    // when the operation is already complete at the race point its outcome
    // is forwarded rather than dropped
    let token = CancellationToken::new();
    let ready: Result<u32> = Ok(9);
    let outcome = race_cancellation(std::future::ready(ready), token).await;
    assert_eq!(outcome.success(), Some(9));
}

#[tokio::test]
async fn pre_cancelled_token_cancels_a_pending_operation() {
    let token = CancellationToken::new();
    token.cancel();
    let outcome = race_cancellation(
        async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(1u32)
        },
        token,
    )
    .await;
    assert!(matches!(outcome, Outcome::Canceled));
}
