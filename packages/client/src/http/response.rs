//! HTTP response types.
//!
//! [`HttpResponse`] pairs status/headers with a [`Body`] that is either
//! fully buffered or an async reader; the streaming-copy stage consumes the
//! reader form without ever buffering the whole payload.

use std::fmt;

use bytes::Bytes;
use http::{header, HeaderMap, HeaderValue, StatusCode, Version};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{Error, Result};

pub struct HttpResponse {
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    body: Body,
}

impl HttpResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Body) -> Self {
        Self {
            status,
            version: Version::HTTP_11,
            headers,
            body,
        }
    }

    /// Buffered response from raw bytes; sets Content-Length accordingly.
    pub fn from_bytes(status: StatusCode, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));
        Self::new(status, headers, Body::Full(body))
    }

    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Total body size as declared by the Content-Length header, if any.
    pub fn content_length(&self) -> Option<u64> {
        self.headers
            .get(header::CONTENT_LENGTH)?
            .to_str()
            .ok()?
            .parse()
            .ok()
    }

    pub fn into_body(self) -> Body {
        self.body
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("version", &self.version)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .finish()
    }
}

/// Response body: empty, fully buffered, or an async reader.
pub enum Body {
    Empty,
    Full(Bytes),
    Reader(Box<dyn AsyncRead + Send + Unpin>),
}

impl Body {
    pub fn reader(reader: impl AsyncRead + Send + Unpin + 'static) -> Body {
        Body::Reader(Box::new(reader))
    }

    /// View this body as an async reader regardless of its form.
    #[must_use]
    pub fn into_reader(self) -> Box<dyn AsyncRead + Send + Unpin> {
        match self {
            Body::Empty => Box::new(std::io::Cursor::new(Bytes::new())),
            Body::Full(bytes) => Box::new(std::io::Cursor::new(bytes)),
            Body::Reader(reader) => reader,
        }
    }

    /// Collect the entire body into memory.
    pub async fn bytes(self) -> Result<Bytes> {
        match self {
            Body::Empty => Ok(Bytes::new()),
            Body::Full(bytes) => Ok(bytes),
            Body::Reader(mut reader) => {
                let mut buf = Vec::new();
                reader
                    .read_to_end(&mut buf)
                    .await
                    .map_err(|e| Error::body("failed to read response body").with(e))?;
                Ok(buf.into())
            }
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Empty => f.write_str("Empty"),
            Body::Full(bytes) => f
                .debug_tuple("Full")
                .field(&format!("{} bytes", bytes.len()))
                .finish(),
            Body::Reader(_) => f.debug_tuple("Reader").field(&"<AsyncRead>").finish(),
        }
    }
}
