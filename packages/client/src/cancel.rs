//! Cancellation bridge.
//!
//! Races an in-flight operation against a cancellation signal and resolves
//! deterministically to whichever happens first. The wrapped operation is
//! not force-aborted when cancellation wins; it is simply no longer
//! awaited here, which keeps the cancellation boundary responsive even
//! when the underlying send cannot be interrupted promptly.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::handler::Outcome;

/// Resolve to the operation's exact outcome, or to [`Outcome::Canceled`]
/// as soon as `token` fires while the operation is still pending.
pub async fn race_cancellation<T, F>(operation: F, token: CancellationToken) -> Outcome<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        result = operation => match result {
            Ok(value) => Outcome::Success(value),
            Err(error) => Outcome::Failure(error),
        },
        () = token.cancelled() => Outcome::Canceled,
    }
}
