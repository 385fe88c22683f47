//! Header well-formedness validation.
//!
//! The builder's default header path applies a strict RFC 9110 check on top
//! of the `http` crate's parsing; the unchecked path skips the strict layer
//! so that non-conformant but valid real-world headers still go through.

use http::{HeaderName, HeaderValue};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

// token characters per RFC 9110 §5.1
static HEADER_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9!#$%&'*+.^_`|~-]+$").expect("header name pattern"));

// visible ASCII plus SP and HTAB; no obs-text
static HEADER_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\t \x21-\x7e]*$").expect("header value pattern"));

/// Parse a header pair under the strict well-formedness rules.
pub fn parse_strict(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    if !HEADER_NAME.is_match(name) {
        return Err(Error::builder(format!("malformed header name {name:?}")));
    }
    if !HEADER_VALUE.is_match(value) {
        return Err(Error::builder(format!("malformed value for header {name}")));
    }
    let name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| Error::builder(format!("invalid header name {name:?}")).with(e))?;
    let value = HeaderValue::from_str(value)
        .map_err(|e| Error::builder("invalid header value").with(e))?;
    Ok((name, value))
}

/// Parse a header pair bypassing the strict layer.
///
/// Only the `http` crate's minimal rules apply, so values containing
/// obs-text (bytes above 0x7f) are accepted here but rejected by
/// [`parse_strict`].
pub fn parse_unchecked(name: &str, value: &[u8]) -> Result<(HeaderName, HeaderValue)> {
    let name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| Error::builder(format!("unparseable header name {name:?}")).with(e))?;
    let value = HeaderValue::from_bytes(value)
        .map_err(|e| Error::builder("unparseable header value").with(e))?;
    Ok((name, value))
}
