use std::error::Error as StdError;
use std::fmt;

use http::StatusCode;

/// A Result alias where the Err case is `courier_client::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents errors raised while building, dispatching, or transforming a
/// request.
///
/// Cancellation is deliberately absent from this type: a cancelled chain
/// resolves to [`Outcome::Canceled`](crate::handler::Outcome) instead of an
/// error.
pub struct Error {
    inner: Box<Inner>,
}

struct Inner {
    kind: Kind,
    message: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync>>,
    url: Option<url::Url>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    /// Request could not be assembled (missing URL, malformed header, body
    /// serialization failure)
    Builder,
    /// Transport-level failure while sending
    Request,
    /// Non-success HTTP status surfaced by `ensure_success`
    Status(StatusCode),
    /// A `validate` check signalled
    Validation,
    /// Response body could not be deserialized
    Decode,
    /// Request or response body error
    Body,
}

impl Error {
    pub(crate) fn new(kind: Kind) -> Error {
        Error {
            inner: Box::new(Inner {
                kind,
                message: None,
                source: None,
                url: None,
            }),
        }
    }

    /// Attach the originating error. It is preserved for inspection via
    /// [`std::error::Error::source`]; the display text stays with this error.
    #[must_use = "Error builder methods return a new Error and should be used"]
    pub fn with<E: Into<Box<dyn StdError + Send + Sync>>>(mut self, source: E) -> Error {
        self.inner.source = Some(source.into());
        self
    }

    /// Replace the display text, typically with an observer-built message.
    #[must_use]
    pub fn with_message<M: Into<String>>(mut self, message: M) -> Error {
        self.inner.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: url::Url) -> Error {
        self.inner.url = Some(url);
        self
    }

    pub fn kind(&self) -> &Kind {
        &self.inner.kind
    }

    /// Get the URL associated with this error, if any
    #[must_use]
    pub fn url(&self) -> Option<&url::Url> {
        self.inner.url.as_ref()
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.inner.message.as_deref()
    }

    /// The HTTP status carried by a `Kind::Status` error.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self.inner.kind {
            Kind::Status(code) => Some(code),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_status(&self) -> bool {
        matches!(self.inner.kind, Kind::Status(_))
    }

    #[must_use]
    pub fn is_builder(&self) -> bool {
        matches!(self.inner.kind, Kind::Builder)
    }

    #[must_use]
    pub fn is_request(&self) -> bool {
        matches!(self.inner.kind, Kind::Request)
    }

    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self.inner.kind, Kind::Decode)
    }

    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self.inner.kind, Kind::Validation)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_struct("courier::Error");

        f.field("kind", &self.inner.kind);

        if let Some(ref message) = self.inner.message {
            f.field("message", message);
        }

        if let Some(ref source) = self.inner.source {
            f.field("source", source);
        }

        if let Some(ref url) = self.inner.url {
            f.field("url", url);
        }

        f.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref message) = self.inner.message {
            return f.write_str(message);
        }
        match &self.inner.kind {
            Kind::Builder => f.write_str("builder error"),
            Kind::Request => f.write_str("error sending request"),
            Kind::Status(code) => {
                let prefix = if code.is_client_error() {
                    "HTTP status client error"
                } else if code.is_server_error() {
                    "HTTP status server error"
                } else {
                    "HTTP status error"
                };
                write!(f, "{prefix} ({code})")
            }
            Kind::Validation => f.write_str("response validation failed"),
            Kind::Decode => f.write_str("error decoding response body"),
            Kind::Body => f.write_str("request or response body error"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source.as_ref().map(|e| &**e as _)
    }
}
