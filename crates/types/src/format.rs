use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Wire format requested from (and returned by) a provider.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Json,
    Xml,
}

impl ResponseFormat {
    /// The literal sent in the `format` request parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            other => Err(ParseFormatError { value: other.to_string() }),
        }
    }
}

/// Returned when a format literal other than `json` or `xml` is requested.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid format '{value}'; expected 'json' or 'xml'")]
pub struct ParseFormatError {
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_only_exact_lowercase_literals() {
        assert_eq!("json".parse::<ResponseFormat>(), Ok(ResponseFormat::Json));
        assert_eq!("xml".parse::<ResponseFormat>(), Ok(ResponseFormat::Xml));
        assert!("JSON".parse::<ResponseFormat>().is_err());
        let err = "text".parse::<ResponseFormat>().unwrap_err();
        assert_eq!(err.value, "text");
    }

    #[test]
    fn default_is_json() {
        assert_eq!(ResponseFormat::default().as_str(), "json");
    }
}
