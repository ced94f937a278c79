//! Shared oEmbed type definitions.
//!
//! This crate holds the closed set of response kinds understood by the
//! consumer, the validated [`OembedResponse`] wrapper, and the
//! [`ResponseFormat`] negotiated with providers.

mod format;
mod response;

pub use format::{ParseFormatError, ResponseFormat};
pub use response::{FieldMap, OembedResponse, ResponseError, ResponseKind};
