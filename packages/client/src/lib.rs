//! # Courier pipeline machinery
//!
//! The request/response continuation pipeline underneath the `courier`
//! fluent API: the [`RequestHandler`](handler::RequestHandler) chain, the
//! cancellation bridge, the progress-reporting stream copy, and the
//! [`RequestObserver`](observer::RequestObserver) lifecycle contract.
//!
//! The HTTP transport itself (connections, TLS, pooling, retries) is an
//! injected collaborator behind [`HttpTransport`](transport::HttpTransport);
//! nothing in this crate opens a socket.

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod cancel;
pub mod client;
pub mod context;
pub mod error;
pub mod handler;
pub mod http;
pub mod observer;
pub mod prelude;
pub mod streaming;
pub mod transport;

pub use client::Client;
pub use context::ClientContext;
pub use error::{Error, Kind, Result};
pub use handler::{Outcome, RequestHandler, RequestInfo};
pub use http::request::{HttpRequest, MultipartField, PreparedBody, RequestBody};
pub use http::response::{Body, HttpResponse};
pub use observer::{NoopObserver, RequestObserver, RetryCheck, SendTask};
pub use streaming::ProgressOptions;
pub use transport::{CompletionOption, HttpTransport, SendFuture};

pub use tokio_util::sync::CancellationToken;
