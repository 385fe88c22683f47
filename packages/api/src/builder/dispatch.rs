//! Dispatch: turn an accumulated builder into an in-flight request.
//!
//! The sequence is fixed: finalize the URI, announce creation, run
//! pre-dispatch hooks, draw the request id and raise the in-flight count,
//! hand the (possibly observer-wrapped) send to the runtime, race it
//! against cancellation, then settle in a detached task that lowers the
//! count and announces completion no matter how the send ended.

use std::sync::Arc;

use futures_util::FutureExt;
use http::Method;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use url::Url;

use courier_client::cancel::race_cancellation;
use courier_client::http::request::{HttpRequest, PreparedBody};
use courier_client::{
    CompletionOption, Error, HttpResponse, Outcome, RequestHandler, RequestInfo, Result, SendTask,
};

use crate::builder::RequestBuilder;

impl<S> RequestBuilder<S> {
    /// Dispatch with the default completion option (fully buffered body).
    #[must_use]
    pub fn dispatch(self, cancel: CancellationToken) -> RequestHandler<HttpResponse> {
        self.dispatch_with(cancel, CompletionOption::default())
    }

    /// Dispatch, choosing when the send future resolves.
    ///
    /// Configuration errors (no URL, bad path, a deferred body error)
    /// resolve the returned handler immediately as a failure; the transport
    /// is never touched and the counters never move for such a request.
    #[must_use]
    pub fn dispatch_with(
        mut self,
        cancel: CancellationToken,
        completion: CompletionOption,
    ) -> RequestHandler<HttpResponse> {
        let observer = self.client.observer().clone();
        let context = self.client.context().clone();
        let transport = self.client.transport().clone();

        let mut request = match self.finalize_request() {
            Ok(request) => request,
            Err(error) => {
                let info = Arc::new(RequestInfo::new(
                    0,
                    self.method.clone(),
                    fallback_url(self.base_url.as_ref()),
                ));
                let settled = std::future::ready(Outcome::Failure(error)).boxed();
                return RequestHandler::from_future(info, observer, cancel, settled);
            }
        };

        observer.on_request_created(&request);
        for hook in &self.before_hooks {
            hook(&mut request);
        }

        let id = context.next_id();
        context.begin_request();
        let info = Arc::new(RequestInfo::new(
            id,
            request.method().clone(),
            request.url().clone(),
        ));

        if self.debug_enabled {
            log::debug!("dispatching {info}");
        }

        let send: SendTask = if *request.method() == Method::POST {
            let url = request.url().clone();
            match prepare_post_body(&request) {
                Ok(body) => Box::new(move || transport.send_post(url, body)),
                Err(error) => Box::new(move || std::future::ready(Err(error)).boxed()),
            }
        } else {
            Box::new(move || transport.send(request, completion))
        };

        let send_future = observer.transform_send_task(send);
        let send_task = tokio::spawn(send_future);

        // Settlement runs detached so the counter drops and the observer
        // hears on_request_finished even when nobody awaits the handler.
        let (settled_tx, settled_rx) = oneshot::channel();
        {
            let observer = observer.clone();
            let info = info.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                let operation = async move {
                    match send_task.await {
                        Ok(result) => result,
                        Err(join_error) => {
                            Err(Error::request("send task did not complete").with(join_error))
                        }
                    }
                };
                let outcome = match race_cancellation(operation, cancel).await {
                    Outcome::Failure(error) => {
                        // wrap, keeping the original reachable through source()
                        let message = observer.build_error_message(&info, None, Some(&error));
                        Outcome::Failure(
                            Error::request(message).with(error).with_url(info.url.clone()),
                        )
                    }
                    other => other,
                };
                context.end_request();
                observer.on_request_finished(&info);
                // the handler side may have been dropped without awaiting
                let _ = settled_tx.send(outcome);
            });
        }

        let settled = async move {
            match settled_rx.await {
                Ok(outcome) => outcome,
                Err(_) => Outcome::Failure(Error::request("request settled without an outcome")),
            }
        }
        .boxed();

        let handler = RequestHandler::from_future(info.clone(), observer.clone(), cancel, settled);
        observer.on_request_started(&handler);
        for hook in &self.after_hooks {
            hook(&info);
        }
        handler
    }

    /// Snapshot the accumulated configuration into an immutable request.
    fn finalize_request(&mut self) -> Result<HttpRequest> {
        if let Some(error) = self.deferred_error.take() {
            return Err(error);
        }
        let url = self.finalize_url()?;
        Ok(HttpRequest::new(
            self.method.clone(),
            url,
            self.headers.clone(),
            self.body.clone(),
        ))
    }

    /// Compose the final URI: base joined with path, structured parameters
    /// urlencoded, then the raw fragment appended with `&` only when both
    /// sides are non-empty.
    fn finalize_url(&self) -> Result<Url> {
        let base = self
            .base_url
            .clone()
            .ok_or_else(|| Error::builder("no request URL configured"))?;
        let mut url = if self.path.is_empty() {
            base
        } else {
            base.join(&self.path)
                .map_err(|e| Error::builder(format!("invalid request path {:?}", self.path)).with(e))?
        };

        let structured = if self.params.is_empty() {
            String::new()
        } else {
            let pairs: Vec<(&str, &str)> = self
                .params
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_str()))
                .collect();
            serde_urlencoded::to_string(pairs)
                .map_err(|e| Error::builder("failed to encode query parameters").with(e))?
        };
        let raw = self.raw_query.as_deref().filter(|fragment| !fragment.is_empty());

        let query = match (structured.is_empty(), raw) {
            (true, None) => None,
            (true, Some(fragment)) => Some(fragment.to_string()),
            (false, None) => Some(structured),
            (false, Some(fragment)) => Some(format!("{structured}&{fragment}")),
        };
        if let Some(query) = query {
            url.set_query(Some(&query));
        }
        Ok(url)
    }
}

/// Encode the body and merge request-level headers onto the body-level
/// set. Request headers win: any name present on the request replaces all
/// body values for that name.
fn prepare_post_body(request: &HttpRequest) -> Result<PreparedBody> {
    let mut prepared = match request.body() {
        Some(body) => body.prepare()?,
        None => PreparedBody::empty(),
    };
    let names: Vec<_> = request.headers().keys().cloned().collect();
    for name in names {
        if prepared.headers.remove(&name).is_some() {
            tracing::debug!("request header {name} overrides body header");
        }
    }
    for (name, value) in request.headers() {
        prepared.headers.append(name.clone(), value.clone());
    }
    Ok(prepared)
}

/// Identity URL for a request that failed before a URI existed.
fn fallback_url(base: Option<&Url>) -> Url {
    match base {
        Some(url) => url.clone(),
        None => Url::parse("http://invalid.localhost/").expect("static fallback URL must parse"),
    }
}
