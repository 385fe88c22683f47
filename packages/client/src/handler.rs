//! The request/response continuation chain.
//!
//! A [`RequestHandler<T>`] wraps exactly one pending-or-resolved value and
//! lets callers attach type-changing asynchronous transformations. Each
//! chaining operation consumes the handler and produces a new one; a
//! handler is immutable from the moment it exists. Within one chain, stage
//! *n+1* never begins before stage *n* settles; failure and cancellation
//! skip every remaining stage body (and its observer hooks) and propagate
//! untouched.

use std::fmt;
use std::future::IntoFuture;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use http::Method;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWrite;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::{Error, Result};
use crate::observer::RequestObserver;
use crate::http::response::HttpResponse;
use crate::streaming::{self, ProgressOptions};

/// How a chain settled: with a value, a failure, or cancellation.
///
/// Cancellation is its own variant rather than an error so that no stage
/// (or caller) can mistake a cancelled chain for a failed one.
#[derive(Debug)]
pub enum Outcome<T> {
    Success(T),
    Failure(Error),
    Canceled,
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, Outcome::Canceled)
    }

    pub fn success(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(self) -> Option<Error> {
        match self {
            Outcome::Failure(error) => Some(error),
            _ => None,
        }
    }
}

/// Immutable identity of one dispatched request, shared by every stage of
/// its chain and every observer notification.
#[derive(Debug, Clone)]
pub struct RequestInfo {
    /// Sequential id drawn from the client context at dispatch.
    pub id: u64,
    pub method: Method,
    pub url: Url,
}

impl RequestInfo {
    pub fn new(id: u64, method: Method, url: Url) -> Self {
        Self { id, method, url }
    }
}

impl fmt::Display for RequestInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} (request #{})", self.method, self.url, self.id)
    }
}

/// One stage of a lazily-composed asynchronous transformation pipeline
/// over a single eventual value.
pub struct RequestHandler<T> {
    request: Arc<RequestInfo>,
    observer: Arc<dyn RequestObserver>,
    cancel: CancellationToken,
    future: BoxFuture<'static, Outcome<T>>,
}

impl<T: Send + 'static> RequestHandler<T> {
    /// Wrap an already-scheduled computation. Dispatch uses this for the
    /// initial stage; tests and custom stages may too.
    pub fn from_future(
        request: Arc<RequestInfo>,
        observer: Arc<dyn RequestObserver>,
        cancel: CancellationToken,
        future: BoxFuture<'static, Outcome<T>>,
    ) -> Self {
        Self {
            request,
            observer,
            cancel,
            future,
        }
    }

    pub fn request(&self) -> &Arc<RequestInfo> {
        &self.request
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Explicit unwrap to the underlying future of the chain's outcome.
    #[must_use]
    pub fn into_inner(self) -> BoxFuture<'static, Outcome<T>> {
        self.future
    }

    /// Chain a synchronous transformation.
    ///
    /// On success the observer sees `on_before_continue` with the incoming
    /// value and `on_after_continue` with the converted one. A prior
    /// failure or cancellation skips `f` and both hooks.
    #[must_use]
    pub fn continue_with<U, F>(self, f: F) -> RequestHandler<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> Result<U> + Send + 'static,
    {
        let Self {
            request,
            observer,
            cancel,
            future,
        } = self;
        let req = request.clone();
        let obs = observer.clone();
        let next = async move {
            match future.await {
                Outcome::Success(value) => {
                    obs.on_before_continue(&req, &value);
                    match f(value) {
                        Ok(converted) => {
                            obs.on_after_continue(&req, &converted);
                            Outcome::Success(converted)
                        }
                        Err(error) => Outcome::Failure(error),
                    }
                }
                Outcome::Failure(error) => Outcome::Failure(error),
                Outcome::Canceled => Outcome::Canceled,
            }
        }
        .boxed();
        RequestHandler {
            request,
            observer,
            cancel,
            future: next,
        }
    }

    /// Chain an asynchronous transformation; the inner future is awaited
    /// before the converted value propagates.
    #[must_use]
    pub fn continue_with_future<U, F, Fut>(self, f: F) -> RequestHandler<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<U>> + Send + 'static,
    {
        let Self {
            request,
            observer,
            cancel,
            future,
        } = self;
        let req = request.clone();
        let obs = observer.clone();
        let next = async move {
            match future.await {
                Outcome::Success(value) => {
                    obs.on_before_continue(&req, &value);
                    match f(value).await {
                        Ok(converted) => {
                            obs.on_after_continue(&req, &converted);
                            Outcome::Success(converted)
                        }
                        Err(error) => Outcome::Failure(error),
                    }
                }
                Outcome::Failure(error) => Outcome::Failure(error),
                Outcome::Canceled => Outcome::Canceled,
            }
        }
        .boxed();
        RequestHandler {
            request,
            observer,
            cancel,
            future: next,
        }
    }

    /// Chain a same-type validation stage.
    ///
    /// A failed check notifies `on_validation_failed` with a closure that
    /// re-runs the identical check, then propagates the failure; the
    /// observer cannot swallow it. A passing check forwards the value
    /// unchanged.
    #[must_use]
    pub fn validate<F>(self, check: F) -> RequestHandler<T>
    where
        F: Fn(&T) -> Result<()> + Send + Sync + 'static,
    {
        let Self {
            request,
            observer,
            cancel,
            future,
        } = self;
        let req = request.clone();
        let obs = observer.clone();
        let next = async move {
            match future.await {
                Outcome::Success(value) => match check(&value) {
                    Ok(()) => Outcome::Success(value),
                    Err(error) => {
                        let retry = || check(&value);
                        obs.on_validation_failed(&req, &value, &error, &retry);
                        Outcome::Failure(error)
                    }
                },
                Outcome::Failure(error) => Outcome::Failure(error),
                Outcome::Canceled => Outcome::Canceled,
            }
        }
        .boxed();
        RequestHandler {
            request,
            observer,
            cancel,
            future: next,
        }
    }
}

impl RequestHandler<HttpResponse> {
    /// Validation specialization for HTTP status: a non-2xx response
    /// becomes a status failure whose message comes from the observer's
    /// [`build_error_message`](RequestObserver::build_error_message) hook.
    #[must_use]
    pub fn ensure_success(self) -> RequestHandler<HttpResponse> {
        let Self {
            request,
            observer,
            cancel,
            future,
        } = self;
        let req = request.clone();
        let obs = observer.clone();
        let next = async move {
            match future.await {
                Outcome::Success(response) => {
                    let status = response.status();
                    if status.is_success() {
                        Outcome::Success(response)
                    } else {
                        log::debug!("{req} answered {status}");
                        let message = obs.build_error_message(&req, Some(&response), None);
                        let error = Error::status_code(status)
                            .with_message(message)
                            .with_url(req.url.clone());
                        let retry = || {
                            if response.status().is_success() {
                                Ok(())
                            } else {
                                Err(Error::status_code(response.status()))
                            }
                        };
                        obs.on_validation_failed(&req, &response, &error, &retry);
                        Outcome::Failure(error)
                    }
                }
                Outcome::Failure(error) => Outcome::Failure(error),
                Outcome::Canceled => Outcome::Canceled,
            }
        }
        .boxed();
        RequestHandler {
            request,
            observer,
            cancel,
            future: next,
        }
    }

    /// Deserialize the full response body as JSON.
    #[must_use]
    pub fn as_json<U>(self) -> RequestHandler<U>
    where
        U: DeserializeOwned + Send + 'static,
    {
        self.continue_with_future(|response| async move {
            let bytes = response.into_body().bytes().await?;
            serde_json::from_slice(&bytes)
                .map_err(|e| Error::decode("failed to deserialize response body").with(e))
        })
    }

    /// Stream the response body into `sink` with progress callbacks,
    /// resolving to the sink for further chaining. The copy is cancellable
    /// at every buffer iteration via the chain's cancellation token.
    #[must_use]
    pub fn write_to<W, F>(
        self,
        sink: W,
        options: ProgressOptions,
        progress: F,
    ) -> RequestHandler<W>
    where
        W: AsyncWrite + Unpin + Send + 'static,
        F: Fn(Option<u64>, u64, f32) + Send + Sync + 'static,
    {
        let Self {
            request,
            observer,
            cancel,
            future,
        } = self;
        let req = request.clone();
        let obs = observer.clone();
        let token = cancel.clone();
        let next = async move {
            match future.await {
                Outcome::Success(response) => {
                    obs.on_before_continue(&req, &response);
                    let total_bytes = response.content_length();
                    let reader = response.into_body().into_reader();
                    match streaming::copy_with_progress(
                        reader,
                        sink,
                        total_bytes,
                        options,
                        &token,
                        &progress,
                    )
                    .await
                    {
                        Outcome::Success(sink) => {
                            obs.on_after_continue(&req, &sink);
                            Outcome::Success(sink)
                        }
                        Outcome::Failure(error) => Outcome::Failure(error),
                        Outcome::Canceled => Outcome::Canceled,
                    }
                }
                Outcome::Failure(error) => Outcome::Failure(error),
                Outcome::Canceled => Outcome::Canceled,
            }
        }
        .boxed();
        RequestHandler {
            request,
            observer,
            cancel,
            future: next,
        }
    }
}

impl<T> IntoFuture for RequestHandler<T> {
    type Output = Outcome<T>;
    type IntoFuture = BoxFuture<'static, Outcome<T>>;

    fn into_future(self) -> Self::IntoFuture {
        self.future
    }
}

impl<T> fmt::Debug for RequestHandler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestHandler")
            .field("request", &self.request)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}
