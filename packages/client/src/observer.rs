//! Lifecycle observer contract.
//!
//! A single capability interface the pipeline calls back into at every
//! lifecycle point. Every method defaults to a no-op (or identity), so
//! [`NoopObserver`] is a valid minimal implementation. Hooks run
//! synchronously on whichever task drives the stage; implementations must
//! not assume a particular thread.

use std::any::Any;

use futures_util::future::BoxFuture;

use crate::error::{Error, Result};
use crate::handler::{RequestHandler, RequestInfo};
use crate::http::request::HttpRequest;
use crate::http::response::HttpResponse;

/// The deferred send operation handed to [`RequestObserver::transform_send_task`].
pub type SendTask = Box<dyn FnOnce() -> BoxFuture<'static, Result<HttpResponse>> + Send>;

/// Re-runs the exact check that just failed, for observers that implement
/// their own retry policy.
pub type RetryCheck<'a> = &'a dyn Fn() -> Result<()>;

pub trait RequestObserver: Send + Sync {
    /// The request has been finalized but not yet sent.
    fn on_request_created(&self, _request: &HttpRequest) {}

    /// Wrap the send operation. The default is identity; an override MUST
    /// invoke `send` (directly or within its own future) or the request
    /// never fires.
    fn transform_send_task(&self, send: SendTask) -> BoxFuture<'static, Result<HttpResponse>> {
        send()
    }

    /// The send has been issued and the initial handler exists.
    fn on_request_started(&self, _handler: &RequestHandler<HttpResponse>) {}

    /// The dispatched future settled: success, failure, or cancellation.
    fn on_request_finished(&self, _request: &RequestInfo) {}

    /// A chain stage is about to transform `value`.
    fn on_before_continue(&self, _request: &RequestInfo, _value: &dyn Any) {}

    /// A chain stage produced `value`.
    fn on_after_continue(&self, _request: &RequestInfo, _value: &dyn Any) {}

    /// A validation check signalled. The failure propagates afterwards
    /// regardless; `retry` re-runs the same check.
    fn on_validation_failed(
        &self,
        _request: &RequestInfo,
        _value: &dyn Any,
        _error: &Error,
        _retry: RetryCheck<'_>,
    ) {
    }

    /// Build the display text for a transport or status failure.
    fn build_error_message(
        &self,
        request: &RequestInfo,
        response: Option<&HttpResponse>,
        error: Option<&Error>,
    ) -> String {
        match (response, error) {
            (Some(response), _) => format!(
                "{} {} answered {}",
                request.method,
                request.url,
                response.status()
            ),
            (None, Some(error)) => {
                format!("{} {} failed: {error}", request.method, request.url)
            }
            (None, None) => format!("{} {} failed", request.method, request.url),
        }
    }
}

/// Observer that keeps every default.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RequestObserver for NoopObserver {}
