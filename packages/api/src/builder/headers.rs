//! Header configuration methods for `RequestBuilder`
//!
//! Three write modes mirror three real needs: `header` replaces, keeping
//! one value per name; `header_if_absent` defends a default against later
//! overwrites; `header_unchecked` bypasses the strict well-formedness
//! layer for non-conformant but representable headers. Malformed input
//! never aborts the chain, it is logged and skipped.

use http::header;

use courier_client::http::headers as header_rules;

use crate::builder::RequestBuilder;
use crate::builder::core::ContentType;

/// Accept header value
#[derive(Debug, Clone, Copy)]
pub enum AcceptValue {
    /// Accept any content type
    Any,
    /// Accept a specific content type
    ContentType(ContentType),
}

impl AcceptValue {
    fn as_str(self) -> &'static str {
        match self {
            AcceptValue::Any => "*/*",
            AcceptValue::ContentType(content_type) => content_type.as_str(),
        }
    }
}

impl From<ContentType> for AcceptValue {
    fn from(content_type: ContentType) -> Self {
        AcceptValue::ContentType(content_type)
    }
}

impl<S> RequestBuilder<S> {
    /// Set a header, replacing any existing values for the same name.
    ///
    /// Both name and value pass the strict well-formedness check; a
    /// malformed pair is logged and skipped.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match header_rules::parse_strict(name, value) {
            Ok((name, value)) => {
                self.headers.insert(name, value);
            }
            Err(error) => {
                log::warn!("skipping malformed header '{name}': {error}");
            }
        }
        self
    }

    /// Set a header only when no value exists for that name yet.
    #[must_use]
    pub fn header_if_absent(mut self, name: &str, value: &str) -> Self {
        match header_rules::parse_strict(name, value) {
            Ok((name, value)) => {
                if !self.headers.contains_key(&name) {
                    self.headers.append(name, value);
                }
            }
            Err(error) => {
                log::warn!("skipping malformed header '{name}': {error}");
            }
        }
        self
    }

    /// Append a header bypassing the strict well-formedness layer.
    ///
    /// Existing values for the name are kept. Only the minimal wire rules
    /// still apply, so obs-text values go through here.
    #[must_use]
    pub fn header_unchecked(mut self, name: &str, value: &str) -> Self {
        match header_rules::parse_unchecked(name, value.as_bytes()) {
            Ok((name, value)) => {
                self.headers.append(name, value);
            }
            Err(error) => {
                log::warn!("skipping unrepresentable header '{name}': {error}");
            }
        }
        self
    }

    /// Set multiple headers at once, each with replace semantics.
    #[must_use]
    pub fn headers<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, value) in pairs {
            self = self.header(name.as_ref(), value.as_ref());
        }
        self
    }

    /// Set the Content-Type header
    #[must_use]
    pub fn content_type(self, content_type: ContentType) -> Self {
        self.header(header::CONTENT_TYPE.as_str(), content_type.as_str())
    }

    /// Set the Accept header
    #[must_use]
    pub fn accept(self, value: impl Into<AcceptValue>) -> Self {
        self.header(header::ACCEPT.as_str(), value.into().as_str())
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(self, agent: &str) -> Self {
        self.header(header::USER_AGENT.as_str(), agent)
    }
}
