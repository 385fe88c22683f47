//! # Courier
//!
//! A fluent HTTP request-building and response-processing pipeline.
//!
//! Requests are assembled with a chainable [`RequestBuilder`], dispatched
//! against an injected transport, and consumed through a
//! [`RequestHandler`] continuation chain that carries success, failure,
//! and cancellation as distinct outcomes.
//!
//! ```no_run
//! use std::sync::Arc;
//! use courier::{CancellationToken, Client, Courier, HttpTransport};
//!
//! # async fn example(transport: Arc<dyn HttpTransport>) -> courier::Outcome<serde_json::Value> {
//! let client = Client::new(transport);
//! Courier::json(&client)
//!     .url("https://api.example.com")
//!     .path("/v1/users")
//!     .query_param("page", Some("2"))
//!     .bearer_auth("token")
//!     .dispatch(CancellationToken::new())
//!     .ensure_success()
//!     .as_json::<serde_json::Value>()
//!     .await
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod builder;

pub use builder::{
    AcceptValue, BodyNotSet, BodySet, ContentType, PostDispatchHook, PreDispatchHook,
    RequestBuilder,
};

pub use courier_client::{
    Body, CancellationToken, Client, ClientContext, CompletionOption, Error, HttpRequest,
    HttpResponse, HttpTransport, Kind, MultipartField, NoopObserver, Outcome, PreparedBody,
    ProgressOptions, RequestBody, RequestHandler, RequestInfo, RequestObserver, Result,
    RetryCheck, SendFuture, SendTask,
};

/// Entry points for the fluent API.
///
/// `Courier::request` starts a bare builder; `json` and `form_urlencoded`
/// pre-set the matching Content-Type header.
#[derive(Debug, Clone, Copy)]
pub struct Courier;

impl Courier {
    /// Start building a request with no preset headers
    #[must_use]
    pub fn request(client: &Client) -> RequestBuilder {
        RequestBuilder::new(client)
    }

    /// Start building a JSON request
    #[must_use]
    pub fn json(client: &Client) -> RequestBuilder {
        RequestBuilder::new(client).content_type(ContentType::ApplicationJson)
    }

    /// Start building a form-urlencoded request
    #[must_use]
    pub fn form_urlencoded(client: &Client) -> RequestBuilder {
        RequestBuilder::new(client).content_type(ContentType::ApplicationFormUrlEncoded)
    }
}
