//! Convenience constructors for each error kind.

use http::StatusCode;

use super::types::{Error, Kind};

impl Error {
    pub fn builder<M: Into<String>>(message: M) -> Error {
        Error::new(Kind::Builder).with_message(message)
    }

    pub fn request<M: Into<String>>(message: M) -> Error {
        Error::new(Kind::Request).with_message(message)
    }

    pub fn status_code(code: StatusCode) -> Error {
        Error::new(Kind::Status(code))
    }

    pub fn validation<M: Into<String>>(message: M) -> Error {
        Error::new(Kind::Validation).with_message(message)
    }

    pub fn decode<M: Into<String>>(message: M) -> Error {
        Error::new(Kind::Decode).with_message(message)
    }

    pub fn body<M: Into<String>>(message: M) -> Error {
        Error::new(Kind::Body).with_message(message)
    }
}
