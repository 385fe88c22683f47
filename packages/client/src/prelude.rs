//! Common imports for pipeline users.

pub use crate::client::Client;
pub use crate::context::ClientContext;
pub use crate::error::{Error, Kind, Result};
pub use crate::handler::{Outcome, RequestHandler, RequestInfo};
pub use crate::http::request::{HttpRequest, MultipartField, PreparedBody, RequestBody};
pub use crate::http::response::{Body, HttpResponse};
pub use crate::observer::{NoopObserver, RequestObserver, RetryCheck, SendTask};
pub use crate::streaming::ProgressOptions;
pub use crate::transport::{CompletionOption, HttpTransport, SendFuture};

pub use tokio_util::sync::CancellationToken;
