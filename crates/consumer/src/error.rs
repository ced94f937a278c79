//! Error types for the oEmbed consumer.

use oembed_api::TransportError;
use oembed_types::{ParseFormatError, ResponseError};
use oembed_util::DecodeError;
use thiserror::Error;

/// Main error type for consumer operations.
///
/// Transport failures are carried unchanged in [`OembedError::Transport`].
#[derive(Debug, Error)]
pub enum OembedError {
    #[error("invalid URL pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("invalid request: {0}")]
    InvalidRequest(#[from] ParseFormatError),

    #[error("no endpoint available for {url}")]
    NoEndpointAvailable { url: String },

    #[error("provider response has no content type")]
    MissingContentType,

    #[error("unsupported content type in provider response: {content_type}")]
    UnsupportedContentType { content_type: String },

    #[error(transparent)]
    Response(#[from] ResponseError),

    #[error("could not decode provider response: {0}")]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("could not run blocking request: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Result alias for consumer operations.
pub type Result<T> = std::result::Result<T, OembedError>;

impl OembedError {
    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument { message: message.into() }
    }

    /// Create a no endpoint error for the given resource URL.
    pub fn no_endpoint(url: impl Into<String>) -> Self {
        Self::NoEndpointAvailable { url: url.into() }
    }
}
