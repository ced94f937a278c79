//! # Body Codecs
//!
//! Decoders that turn a raw provider reply into a flat [`FieldMap`]. The JSON
//! decoder keeps values as decoded (numbers, nested structures); the XML
//! decoder discards the wrapping root element and maps each child element to
//! its text content.
//!
//! [`FieldMap`]: oembed_types::FieldMap

mod json;
mod xml;

pub use json::decode_json;
pub use xml::decode_xml;

use thiserror::Error;

/// Maximum number of body characters echoed back in decode errors.
const BODY_PREVIEW_LIMIT: usize = 200;

/// Error returned when a provider reply cannot be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to parse JSON response: {source}. body preview: {body_preview}")]
    Json {
        #[source]
        source: serde_json::Error,
        body_preview: String,
    },

    #[error("JSON response must be an object, got {found}")]
    NotAnObject { found: &'static str },

    #[error("failed to parse XML response: {source}. body preview: {body_preview}")]
    Xml {
        #[source]
        source: quick_xml::Error,
        body_preview: String,
    },

    #[error("XML response has no root element")]
    EmptyDocument,

    #[error("response body is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Collapse whitespace and truncate a body so it can be embedded in an error message.
pub(crate) fn truncate_response_preview(body: &[u8], limit: usize) -> String {
    let text = String::from_utf8_lossy(body);
    if text.trim().is_empty() {
        return "<empty>".to_string();
    }

    let mut preview = String::new();
    for ch in text.chars() {
        if preview.len() >= limit {
            preview.push_str("...");
            break;
        }
        match ch {
            '\n' | '\r' | '\t' => {
                if !preview.ends_with(' ') {
                    preview.push(' ');
                }
            }
            _ => preview.push(ch),
        }
    }

    preview.trim().to_string()
}

pub(crate) fn body_preview(body: &[u8]) -> String {
    truncate_response_preview(body, BODY_PREVIEW_LIMIT)
}
