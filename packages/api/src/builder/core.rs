//! Core `RequestBuilder` structures and base functionality
//!
//! Contains the main `RequestBuilder` struct, body-state markers, and
//! foundational methods for accumulating request configuration before
//! dispatch.

use std::fmt;

use http::{HeaderMap, Method};
use url::Url;

use courier_client::http::request::{HttpRequest, RequestBody};
use courier_client::{Client, Error, RequestInfo};

/// Hook run synchronously just before the network call is issued; may
/// stamp late headers onto the finalized request.
pub type PreDispatchHook = Box<dyn Fn(&mut HttpRequest) + Send + Sync>;

/// Hook run after the send has been handed to the transport.
pub type PostDispatchHook = Box<dyn Fn(&RequestInfo) + Send + Sync>;

/// Content type enumeration for elegant API
#[derive(Debug, Clone, Copy)]
pub enum ContentType {
    /// application/json content type
    ApplicationJson,
    /// application/x-www-form-urlencoded content type
    ApplicationFormUrlEncoded,
    /// application/octet-stream content type
    ApplicationOctetStream,
    /// text/plain content type
    TextPlain,
    /// text/html content type
    TextHtml,
    /// multipart/form-data content type
    MultipartFormData,
}

impl ContentType {
    /// Convert content type to string representation
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::ApplicationJson => "application/json",
            ContentType::ApplicationFormUrlEncoded => "application/x-www-form-urlencoded",
            ContentType::ApplicationOctetStream => "application/octet-stream",
            ContentType::TextPlain => "text/plain",
            ContentType::TextHtml => "text/html",
            ContentType::MultipartFormData => "multipart/form-data",
        }
    }
}

impl From<&str> for ContentType {
    fn from(s: &str) -> Self {
        match s {
            "application/x-www-form-urlencoded" => ContentType::ApplicationFormUrlEncoded,
            "application/octet-stream" => ContentType::ApplicationOctetStream,
            "text/plain" => ContentType::TextPlain,
            "text/html" => ContentType::TextHtml,
            "multipart/form-data" => ContentType::MultipartFormData,
            _ => ContentType::ApplicationJson,
        }
    }
}

/// State marker indicating no body has been set
#[derive(Debug, Clone, Copy)]
pub struct BodyNotSet;

/// State marker indicating a body has been set
#[derive(Debug, Clone, Copy)]
pub struct BodySet;

/// Fluent request builder.
///
/// Accumulates method, URL, query parameters, headers, and body, then
/// produces the initial [`RequestHandler`](courier_client::RequestHandler)
/// on [`dispatch`](RequestBuilder::dispatch). Type parameter `S` tracks the
/// body state:
/// - `BodyNotSet`: default state, body methods available
/// - `BodySet`: a body has been set
///
/// The builder is owned exclusively by the caller until dispatch; dispatch
/// snapshots it, so concurrent dispatches and later mutation are
/// independent.
pub struct RequestBuilder<S = BodyNotSet> {
    pub(crate) client: Client,
    pub(crate) method: Method,
    pub(crate) base_url: Option<Url>,
    pub(crate) path: String,
    pub(crate) params: hashbrown::HashMap<String, String>,
    pub(crate) raw_query: Option<String>,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Option<RequestBody>,
    pub(crate) before_hooks: Vec<PreDispatchHook>,
    pub(crate) after_hooks: Vec<PostDispatchHook>,
    /// First error hit while accumulating configuration; surfaced at
    /// dispatch instead of panicking mid-chain.
    pub(crate) deferred_error: Option<Error>,
    pub(crate) state: S,
    pub(crate) debug_enabled: bool,
}

impl RequestBuilder<BodyNotSet> {
    /// Start building a new request against a shared client instance.
    #[must_use]
    pub fn new(client: &Client) -> Self {
        Self {
            client: client.clone(),
            method: Method::GET,
            base_url: None,
            path: String::new(),
            params: hashbrown::HashMap::new(),
            raw_query: None,
            headers: HeaderMap::new(),
            body: None,
            before_hooks: Vec::new(),
            after_hooks: Vec::new(),
            deferred_error: None,
            state: BodyNotSet,
            debug_enabled: false,
        }
    }
}

impl<S> RequestBuilder<S> {
    /// Transition to another body state, carrying all configuration.
    pub(crate) fn with_state<S2>(self, state: S2, body: Option<RequestBody>) -> RequestBuilder<S2> {
        RequestBuilder {
            client: self.client,
            method: self.method,
            base_url: self.base_url,
            path: self.path,
            params: self.params,
            raw_query: self.raw_query,
            headers: self.headers,
            body,
            before_hooks: self.before_hooks,
            after_hooks: self.after_hooks,
            deferred_error: self.deferred_error,
            state,
            debug_enabled: self.debug_enabled,
        }
    }

    pub(crate) fn defer_error(&mut self, error: Error) {
        if self.deferred_error.is_none() {
            self.deferred_error = Some(error);
        }
    }

    /// Enable debug logging for this request
    #[must_use]
    pub fn debug(mut self) -> Self {
        self.debug_enabled = true;
        self
    }

    /// Set the HTTP method for the request
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Set the target URL for the request
    ///
    /// An unparseable URL is logged and ignored, keeping any previously
    /// configured URL.
    #[must_use]
    pub fn url(mut self, url: &str) -> Self {
        match url.parse::<Url>() {
            Ok(parsed) => self.base_url = Some(parsed),
            Err(parse_error) => {
                log::warn!("invalid URL '{url}': {parse_error}. Keeping existing URL.");
            }
        }
        self
    }

    /// Set the base URL from an already-parsed [`Url`]
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Set the request path, joined onto the base URL at dispatch
    #[must_use]
    pub fn path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// Upsert a structured query parameter. Last write wins per key;
    /// `None` is a no-op and never clears an existing value.
    #[must_use]
    pub fn query_param(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.params.insert(key.to_string(), value.to_string());
        }
        self
    }

    /// Set a raw query fragment appended after the structured parameters.
    ///
    /// When both are non-empty the final query is
    /// `structured + "&" + fragment`; with no structured parameters the
    /// fragment stands alone.
    #[must_use]
    pub fn raw_query(mut self, fragment: &str) -> Self {
        self.raw_query = Some(fragment.to_string());
        self
    }

    /// Register a hook run synchronously before the network call is issued.
    /// Hooks run in registration order.
    #[must_use]
    pub fn before_dispatch(mut self, hook: impl Fn(&mut HttpRequest) + Send + Sync + 'static) -> Self {
        self.before_hooks.push(Box::new(hook));
        self
    }

    /// Register a hook run after the send has been handed to the
    /// transport. Hooks run in registration order.
    #[must_use]
    pub fn after_dispatch(mut self, hook: impl Fn(&RequestInfo) + Send + Sync + 'static) -> Self {
        self.after_hooks.push(Box::new(hook));
        self
    }
}

impl<S> fmt::Debug for RequestBuilder<S>
where
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("client", &self.client)
            .field("method", &self.method)
            .field("base_url", &self.base_url)
            .field("path", &self.path)
            .field("params", &self.params)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("state", &self.state)
            .field("before_hooks", &self.before_hooks.len())
            .field("after_hooks", &self.after_hooks.len())
            .field("debug_enabled", &self.debug_enabled)
            .finish()
    }
}
