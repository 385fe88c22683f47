//! The transport collaborator seam.
//!
//! The pipeline never opens connections itself; it hands finalized requests
//! to an injected [`HttpTransport`], which owns connection, TLS, pooling,
//! and retry concerns.

use futures_util::future::BoxFuture;
use url::Url;

use crate::error::Result;
use crate::http::request::{HttpRequest, PreparedBody};
use crate::http::response::HttpResponse;

pub type SendFuture = BoxFuture<'static, Result<HttpResponse>>;

/// When the send future should resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompletionOption {
    /// Resolve once the full response body has been buffered.
    #[default]
    ResponseBuffered,
    /// Resolve as soon as status and headers arrive; the body stays a
    /// reader for streaming stages.
    HeadersReceived,
}

pub trait HttpTransport: Send + Sync {
    /// Send a finalized request.
    fn send(&self, request: HttpRequest, completion: CompletionOption) -> SendFuture;

    /// POST convenience path: the body carries its own header set, already
    /// merged with the request-level headers by dispatch.
    fn send_post(&self, url: Url, body: PreparedBody) -> SendFuture;
}
