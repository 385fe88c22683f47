//! Authentication methods for `RequestBuilder`

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http::header;

use crate::builder::RequestBuilder;

impl<S> RequestBuilder<S> {
    /// Set an API key in the `x-api-key` header
    #[must_use]
    pub fn api_key(self, key: &str) -> Self {
        self.header("x-api-key", key)
    }

    /// Set a bearer token in the Authorization header
    #[must_use]
    pub fn bearer_auth(self, token: &str) -> Self {
        self.header(header::AUTHORIZATION.as_str(), &format!("Bearer {token}"))
    }

    /// Set basic authentication credentials in the Authorization header
    #[must_use]
    pub fn basic_auth(self, username: &str, password: &str) -> Self {
        let credentials = STANDARD.encode(format!("{username}:{password}"));
        self.header(header::AUTHORIZATION.as_str(), &format!("Basic {credentials}"))
    }
}
