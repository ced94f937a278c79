//! Validated oEmbed responses.
//!
//! Providers reply with a flat mapping of fields. The mandatory `type` field
//! selects one of the kinds in [`ResponseKind`]; each kind declares the
//! fields it requires beyond `type` and `version`. Unknown `type` values are
//! accepted as [`ResponseKind::Generic`] so that consumers keep working when
//! providers introduce new kinds.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// Decoded provider fields keyed by name.
pub type FieldMap = Map<String, Value>;

/// Fields every response must carry regardless of kind.
const MANDATORY_FIELDS: &[&str] = &["type", "version"];

/// Lookup table from the wire-level `type` value to its kind and the fields
/// that kind requires beyond [`MANDATORY_FIELDS`].
const KIND_TABLE: &[(&str, ResponseKind, &[&str])] = &[
    ("photo", ResponseKind::Photo, &["url", "width", "height"]),
    ("video", ResponseKind::Video, &["html", "width", "height"]),
    ("link", ResponseKind::Link, &[]),
    ("rich", ResponseKind::Rich, &["html", "width", "height"]),
];

/// The closed set of response kinds, plus a fallback for unrecognized ones.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum ResponseKind {
    /// A static photo; carries `url`, `width` and `height`.
    Photo,
    /// A playable video; carries embeddable `html`, `width` and `height`.
    Video,
    /// Generic embed data without `url` or `html`.
    Link,
    /// Rich HTML content; carries `html`, `width` and `height`.
    Rich,
    /// Any `type` value this consumer does not know about.
    Generic,
}

impl ResponseKind {
    /// Resolve a wire-level `type` value. Unknown values map to [`ResponseKind::Generic`].
    pub fn from_type_name(type_name: &str) -> Self {
        KIND_TABLE
            .iter()
            .find(|(name, _, _)| *name == type_name)
            .map(|(_, kind, _)| *kind)
            .unwrap_or(Self::Generic)
    }

    /// Fields this kind requires in addition to `type` and `version`.
    pub fn required_fields(&self) -> &'static [&'static str] {
        KIND_TABLE
            .iter()
            .find(|(_, kind, _)| kind == self)
            .map(|(_, _, fields)| *fields)
            .unwrap_or(&[])
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Video => "video",
            Self::Link => "link",
            Self::Rich => "rich",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while validating a decoded provider reply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseError {
    /// The reply lacks `type` and/or `version`.
    #[error("oEmbed response is missing mandatory field(s): {}", .missing.join(", "))]
    MalformedResponse { missing: Vec<String> },

    /// The reply lacks a field required by its declared kind.
    #[error("oEmbed {kind} response is missing required field '{field}'")]
    MissingRequiredField { kind: ResponseKind, field: String },
}

/// A provider reply that passed validation for its kind.
///
/// The full field mapping is kept verbatim, including provider-specific
/// extension fields, and is read-only once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct OembedResponse {
    kind: ResponseKind,
    data: FieldMap,
}

impl OembedResponse {
    /// Validate a decoded field mapping and wrap it in the matching kind.
    ///
    /// # Errors
    /// - [`ResponseError::MalformedResponse`] when `type` or `version` is absent.
    /// - [`ResponseError::MissingRequiredField`] when a kind-specific field is absent.
    pub fn from_fields(data: FieldMap) -> Result<Self, ResponseError> {
        let missing: Vec<String> = MANDATORY_FIELDS
            .iter()
            .filter(|field| !data.contains_key(**field))
            .map(|field| field.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ResponseError::MalformedResponse { missing });
        }

        let kind = data
            .get("type")
            .and_then(Value::as_str)
            .map(ResponseKind::from_type_name)
            .unwrap_or(ResponseKind::Generic);

        if let Some(field) = kind.required_fields().iter().find(|field| !data.contains_key(**field)) {
            return Err(ResponseError::MissingRequiredField {
                kind,
                field: field.to_string(),
            });
        }

        Ok(Self { kind, data })
    }

    pub fn kind(&self) -> ResponseKind {
        self.kind
    }

    /// Look up any field by name. Unknown keys yield `None`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Look up a field and return it when it holds a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    /// The complete field mapping as received from the provider.
    pub fn data(&self) -> &FieldMap {
        &self.data
    }

    pub fn into_data(self) -> FieldMap {
        self.data
    }

    /// The raw `type` value, which may name a kind unknown to this consumer.
    pub fn type_name(&self) -> Option<&str> {
        self.get_str("type")
    }

    pub fn version(&self) -> Option<&str> {
        self.get_str("version")
    }

    pub fn url(&self) -> Option<&str> {
        self.get_str("url")
    }

    pub fn html(&self) -> Option<&str> {
        self.get_str("html")
    }

    pub fn width(&self) -> Option<u64> {
        self.dimension("width")
    }

    pub fn height(&self) -> Option<u64> {
        self.dimension("height")
    }

    pub fn title(&self) -> Option<&str> {
        self.get_str("title")
    }

    pub fn author_name(&self) -> Option<&str> {
        self.get_str("author_name")
    }

    pub fn author_url(&self) -> Option<&str> {
        self.get_str("author_url")
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.get_str("provider_name")
    }

    pub fn provider_url(&self) -> Option<&str> {
        self.get_str("provider_url")
    }

    /// Suggested cache lifetime in seconds.
    pub fn cache_age(&self) -> Option<u64> {
        self.dimension("cache_age")
    }

    pub fn thumbnail_url(&self) -> Option<&str> {
        self.get_str("thumbnail_url")
    }

    pub fn thumbnail_width(&self) -> Option<u64> {
        self.dimension("thumbnail_width")
    }

    pub fn thumbnail_height(&self) -> Option<u64> {
        self.dimension("thumbnail_height")
    }

    /// Read a non-negative integer field. XML replies carry numbers as text,
    /// so numeric strings are accepted as well as JSON numbers.
    fn dimension(&self, key: &str) -> Option<u64> {
        match self.data.get(key)? {
            Value::Number(number) => number
                .as_u64()
                .or_else(|| number.as_f64().filter(|value| *value >= 0.0).map(|value| value as u64)),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }
}

impl Serialize for OembedResponse {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.data.serialize(serializer)
    }
}
