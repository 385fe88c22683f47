//! Body-setting methods for `RequestBuilder`
//!
//! Every body method transitions the builder from `BodyNotSet` to
//! `BodySet`; multipart parts may keep accumulating afterwards.
//! Serialization failures are deferred and surface as a builder failure at
//! dispatch rather than panicking mid-chain.

use bytes::Bytes;
use http::header;
use serde::Serialize;

use courier_client::http::request::{MultipartField, RequestBody};
use courier_client::Error;

use crate::builder::core::{BodyNotSet, BodySet, ContentType, RequestBuilder};

impl RequestBuilder<BodyNotSet> {
    /// Set a serializable body, encoded according to the configured
    /// Content-Type header. `application/x-www-form-urlencoded` encodes as
    /// a form; everything else (including no header) encodes as JSON.
    #[must_use]
    pub fn body<T: Serialize>(self, body: &T) -> RequestBuilder<BodySet> {
        let content_type = self
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map_or(ContentType::ApplicationJson, ContentType::from);

        match content_type {
            ContentType::ApplicationFormUrlEncoded => match serde_urlencoded::to_string(body) {
                Ok(encoded) => self.with_state(
                    BodySet,
                    Some(RequestBody::Raw {
                        bytes: Bytes::from(encoded.into_bytes()),
                        content_type: ContentType::ApplicationFormUrlEncoded.as_str().to_string(),
                    }),
                ),
                Err(serialize_error) => {
                    let mut next = self.with_state(BodySet, None);
                    next.defer_error(
                        Error::builder("failed to urlencode request body").with(serialize_error),
                    );
                    next
                }
            },
            _ => match serde_json::to_value(body) {
                Ok(value) => self.with_state(BodySet, Some(RequestBody::Json(value))),
                Err(serialize_error) => {
                    let mut next = self.with_state(BodySet, None);
                    next.defer_error(
                        Error::builder("failed to serialize request body").with(serialize_error),
                    );
                    next
                }
            },
        }
    }

    /// Set a raw byte body. The content type comes from the Content-Type
    /// header if set, octet-stream otherwise.
    #[must_use]
    pub fn raw_body(self, bytes: impl Into<Bytes>) -> RequestBuilder<BodySet> {
        let content_type = self
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(ContentType::ApplicationOctetStream.as_str())
            .to_string();
        let bytes = bytes.into();
        self.with_state(BodySet, Some(RequestBody::Raw { bytes, content_type }))
    }

    /// Set a plain text body
    #[must_use]
    pub fn text_body(self, text: &str) -> RequestBuilder<BodySet> {
        let bytes = Bytes::copy_from_slice(text.as_bytes());
        self.header_if_absent(
            header::CONTENT_TYPE.as_str(),
            ContentType::TextPlain.as_str(),
        )
        .with_state(
            BodySet,
            Some(RequestBody::Raw {
                bytes,
                content_type: ContentType::TextPlain.as_str().to_string(),
            }),
        )
    }

    /// Start a multipart body with a file part. The part's MIME type is
    /// inferred from the filename extension and its length is declared from
    /// the buffer.
    #[must_use]
    pub fn form_part(self, name: &str, filename: &str, data: impl Into<Bytes>) -> RequestBuilder<BodySet> {
        let field = MultipartField::new(name, filename, data);
        self.with_state(BodySet, Some(RequestBody::Multipart(vec![field])))
    }

    /// Start a multipart body with a plain text part
    #[must_use]
    pub fn form_text(self, name: &str, value: &str) -> RequestBuilder<BodySet> {
        let field = MultipartField::text(name, value);
        self.with_state(BodySet, Some(RequestBody::Multipart(vec![field])))
    }
}

impl RequestBuilder<BodySet> {
    /// Append another file part to a multipart body.
    ///
    /// Appending onto a non-multipart body is a configuration error,
    /// deferred and surfaced at dispatch.
    #[must_use]
    pub fn form_part(mut self, name: &str, filename: &str, data: impl Into<Bytes>) -> Self {
        match self.body {
            Some(RequestBody::Multipart(ref mut fields)) => {
                fields.push(MultipartField::new(name, filename, data));
            }
            _ => self.defer_error(Error::builder(
                "form parts cannot be combined with a non-multipart body",
            )),
        }
        self
    }

    /// Append another plain text part to a multipart body
    #[must_use]
    pub fn form_text(mut self, name: &str, value: &str) -> Self {
        match self.body {
            Some(RequestBody::Multipart(ref mut fields)) => {
                fields.push(MultipartField::text(name, value));
            }
            _ => self.defer_error(Error::builder(
                "form parts cannot be combined with a non-multipart body",
            )),
        }
        self
    }
}
