//! Error types for the request pipeline.
//!
//! Modelled as a single [`Error`] with a [`Kind`] discriminant and optional
//! message/source/url attachments. Transport failures carry the
//! observer-built message as their display text and the original transport
//! error as an attached source.

mod constructors;
mod types;

pub use types::{Error, Kind, Result};
