//! HTTP request types.
//!
//! [`HttpRequest`] is the finalized, immutable snapshot a dispatch hands to
//! the transport; [`RequestBody`] covers raw, JSON, form, and multipart
//! payloads and knows how to encode itself into a [`PreparedBody`] carrying
//! its own header set.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::{BufMut, Bytes, BytesMut};
use http::{header, HeaderMap, HeaderValue, Method};
use url::Url;

use crate::error::{Error, Result};
use crate::http::mime;

/// A finalized request: method, URL, headers, and an optional body.
///
/// Builders snapshot into this type at dispatch; mutating the builder
/// afterwards never affects a request already in flight.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<RequestBody>,
}

impl HttpRequest {
    pub fn new(method: Method, url: Url, headers: HeaderMap, body: Option<RequestBody>) -> Self {
        Self {
            method,
            url,
            headers,
            body,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable header access, used by pre-dispatch hooks to stamp late
    /// headers before the send is issued.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }
}

/// Request body types
#[derive(Clone)]
pub enum RequestBody {
    /// Raw bytes with an explicit content type
    Raw {
        bytes: Bytes,
        content_type: String,
    },
    /// JSON value, serialized when the body is prepared
    Json(serde_json::Value),
    /// Form data, urlencoded when the body is prepared
    Form(HashMap<String, String>),
    /// Multipart form data
    Multipart(Vec<MultipartField>),
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestBody::Raw { bytes, content_type } => f
                .debug_struct("Raw")
                .field("bytes", &format!("{} bytes", bytes.len()))
                .field("content_type", content_type)
                .finish(),
            RequestBody::Json(value) => f.debug_tuple("Json").field(value).finish(),
            RequestBody::Form(form) => f.debug_tuple("Form").field(form).finish(),
            RequestBody::Multipart(fields) => f
                .debug_tuple("Multipart")
                .field(&format!("{} fields", fields.len()))
                .finish(),
        }
    }
}

/// One part of a multipart form body.
#[derive(Debug, Clone)]
pub struct MultipartField {
    pub name: String,
    pub filename: Option<String>,
    pub content_type: String,
    pub data: Bytes,
}

impl MultipartField {
    /// Build a file part, inferring the MIME type from the last
    /// dot-delimited segment of `filename`.
    pub fn new(name: &str, filename: &str, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.to_string(),
            filename: Some(filename.to_string()),
            content_type: mime::from_filename(filename).to_string(),
            data: data.into(),
        }
    }

    /// Build a plain text part with no filename.
    pub fn text(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            filename: None,
            content_type: "text/plain".to_string(),
            data: Bytes::copy_from_slice(value.as_bytes()),
        }
    }
}

/// An encoded body plus the header set that describes it.
///
/// The transport's POST path manages body headers separately from request
/// headers, so dispatch merges the request-level headers onto this set
/// before sending.
#[derive(Debug, Clone)]
pub struct PreparedBody {
    pub headers: HeaderMap,
    pub payload: Bytes,
}

impl PreparedBody {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            headers: HeaderMap::new(),
            payload: Bytes::new(),
        }
    }
}

impl RequestBody {
    /// Encode this body into its wire payload and body-level headers.
    pub fn prepare(&self) -> Result<PreparedBody> {
        match self {
            RequestBody::Raw { bytes, content_type } => {
                let mut headers = HeaderMap::new();
                headers.insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_str(content_type)
                        .map_err(|e| Error::body("invalid body content type").with(e))?,
                );
                headers.insert(header::CONTENT_LENGTH, HeaderValue::from(bytes.len()));
                Ok(PreparedBody {
                    headers,
                    payload: bytes.clone(),
                })
            }
            RequestBody::Json(value) => {
                let payload = serde_json::to_vec(value)
                    .map_err(|e| Error::body("failed to serialize JSON body").with(e))?;
                let mut headers = HeaderMap::new();
                headers.insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                );
                headers.insert(header::CONTENT_LENGTH, HeaderValue::from(payload.len()));
                Ok(PreparedBody {
                    headers,
                    payload: payload.into(),
                })
            }
            RequestBody::Form(form) => {
                let encoded = serde_urlencoded::to_string(form)
                    .map_err(|e| Error::body("failed to urlencode form body").with(e))?;
                let mut headers = HeaderMap::new();
                headers.insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/x-www-form-urlencoded"),
                );
                headers.insert(header::CONTENT_LENGTH, HeaderValue::from(encoded.len()));
                Ok(PreparedBody {
                    headers,
                    payload: encoded.into_bytes().into(),
                })
            }
            RequestBody::Multipart(fields) => encode_multipart(fields),
        }
    }
}

fn next_boundary() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let count = COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    format!("----courier-{nanos:08x}{count:08x}")
}

fn encode_multipart(fields: &[MultipartField]) -> Result<PreparedBody> {
    let boundary = next_boundary();
    let mut payload = BytesMut::new();

    for field in fields {
        payload.put_slice(format!("--{boundary}\r\n").as_bytes());
        match &field.filename {
            Some(filename) => payload.put_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    field.name, filename
                )
                .as_bytes(),
            ),
            None => payload.put_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n", field.name).as_bytes(),
            ),
        }
        payload.put_slice(format!("Content-Type: {}\r\n", field.content_type).as_bytes());
        // each part declares its length explicitly from the buffer
        payload.put_slice(format!("Content-Length: {}\r\n\r\n", field.data.len()).as_bytes());
        payload.put_slice(&field.data);
        payload.put_slice(b"\r\n");
    }
    payload.put_slice(format!("--{boundary}--\r\n").as_bytes());

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&format!("multipart/form-data; boundary={boundary}"))
            .map_err(|e| Error::body("invalid multipart boundary").with(e))?,
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(payload.len()));

    Ok(PreparedBody {
        headers,
        payload: payload.freeze(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipart_parts_carry_explicit_lengths() {
        let fields = vec![
            MultipartField::new("file", "report.json", &b"{\"a\":1}"[..]),
            MultipartField::text("label", "quarterly"),
        ];
        let prepared = RequestBody::Multipart(fields).prepare().unwrap();
        let text = String::from_utf8(prepared.payload.to_vec()).unwrap();

        assert!(text.contains("name=\"file\"; filename=\"report.json\""));
        assert!(text.contains("Content-Type: application/json"));
        assert!(text.contains("Content-Length: 7"));
        assert!(text.contains("name=\"label\""));
        assert!(text.contains("Content-Type: text/plain"));
        assert!(text.ends_with("--\r\n"));

        let content_type = prepared.headers[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));
    }

    #[test]
    fn unknown_extension_gets_octet_stream() {
        let field = MultipartField::new("blob", "dump.weird", &b"\x00\x01"[..]);
        assert_eq!(field.content_type, mime::DEFAULT);
    }

    #[test]
    fn json_body_prepares_with_headers() {
        let body = RequestBody::Json(serde_json::json!({"k": "v"}));
        let prepared = body.prepare().unwrap();
        assert_eq!(prepared.headers[header::CONTENT_TYPE], "application/json");
        assert_eq!(
            prepared.headers[header::CONTENT_LENGTH],
            HeaderValue::from(prepared.payload.len())
        );
    }

    #[test]
    fn boundaries_are_unique() {
        assert_ne!(next_boundary(), next_boundary());
    }
}
