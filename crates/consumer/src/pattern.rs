//! URL pattern matching.
//!
//! Two dialects are supported:
//!
//! - wildcard patterns such as `http://*.flickr.com/*`, where `*` matches any
//!   run of characters (including none) and everything else is literal
//! - raw regular expressions, written with a `regex:` prefix
//!
//! Both dialects must match the whole candidate URL.

use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::error::{OembedError, Result};

/// Prefix selecting the raw regular expression dialect.
pub const REGEX_PREFIX: &str = "regex:";

/// A compiled, immutable URL pattern.
#[derive(Debug, Clone)]
pub struct UrlPattern {
    pattern: String,
    regex: Regex,
}

impl UrlPattern {
    /// Compile a pattern in either dialect.
    ///
    /// # Errors
    /// Returns [`OembedError::InvalidPattern`] when the resulting expression
    /// does not compile.
    pub fn compile(pattern: &str) -> Result<Self> {
        let expression = match pattern.strip_prefix(REGEX_PREFIX) {
            Some(raw) => format!("^(?:{raw})$"),
            None => format!("^{}$", wildcard_to_regex(pattern)),
        };
        let regex = Regex::new(&expression).map_err(|source| OembedError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// The pattern text this matcher was compiled from.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Whether `candidate` matches this pattern in its entirety.
    pub fn matches(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }
}

/// Escape every metacharacter, then turn the escaped `*` back into a wildcard.
fn wildcard_to_regex(pattern: &str) -> String {
    regex::escape(pattern).replace(r"\*", ".*")
}

impl PartialEq for UrlPattern {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for UrlPattern {}

impl FromStr for UrlPattern {
    type Err = OembedError;

    fn from_str(s: &str) -> Result<Self> {
        Self::compile(s)
    }
}

impl fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}
