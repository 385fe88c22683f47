//! Fluent request builder
//!
//! Split across focused modules: core structures, header configuration,
//! authentication, body handling, and dispatch.

pub mod auth;
pub mod body;
pub mod core;
pub mod dispatch;
pub mod headers;

pub use self::core::{
    BodyNotSet, BodySet, ContentType, PostDispatchHook, PreDispatchHook, RequestBuilder,
};
pub use self::headers::AcceptValue;
