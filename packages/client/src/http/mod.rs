//! HTTP request/response vocabulary shared by the builder and the pipeline.

pub mod headers;
pub mod mime;
pub mod request;
pub mod response;

pub use request::{HttpRequest, MultipartField, PreparedBody, RequestBody};
pub use response::{Body, HttpResponse};
