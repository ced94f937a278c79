//! Provider endpoints.
//!
//! An [`Endpoint`] pairs a provider's API URL with the URL patterns it
//! serves. It builds outbound request URLs and turns replies into validated
//! [`OembedResponse`] values.

use std::borrow::Cow;
use std::time::Instant;

use indexmap::IndexMap;
use oembed_api::{FetchRequest, Fetcher, TransportError};
use oembed_types::{OembedResponse, ResponseFormat};
use oembed_util::{decode_json, decode_xml};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::error::{OembedError, Result};
use crate::pattern::UrlPattern;

/// Query parameters sent to a provider, in insertion order.
pub type QueryParams = IndexMap<String, String>;

/// `User-Agent` sent by endpoints that do not override it.
pub const DEFAULT_USER_AGENT: &str = concat!("oembed-rs/", env!("CARGO_PKG_VERSION"));

/// Placeholder an API URL may carry to take the format in its path.
const FORMAT_PLACEHOLDER: &str = "{format}";

/// A provider API URL and the URL patterns it claims to serve.
///
/// Patterns are keyed by their original text, so registering the same
/// pattern twice is a no-op.
#[derive(Debug, Clone)]
pub struct Endpoint {
    api_url: String,
    implicit_format: bool,
    patterns: IndexMap<String, UrlPattern>,
    user_agent: String,
}

impl Endpoint {
    /// Create an endpoint with no patterns.
    pub fn new(api_url: impl Into<String>) -> Self {
        let api_url = api_url.into();
        let implicit_format = api_url.contains(FORMAT_PLACEHOLDER);
        Self {
            api_url,
            implicit_format,
            patterns: IndexMap::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Create an endpoint and register each of `patterns`.
    ///
    /// # Errors
    /// Fails on the first empty or uncompilable pattern.
    pub fn with_patterns<I, S>(api_url: impl Into<String>, patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut endpoint = Self::new(api_url);
        for pattern in patterns {
            endpoint.add_pattern(pattern.as_ref())?;
        }
        Ok(endpoint)
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Whether the API URL carries a `{format}` placeholder.
    pub fn is_implicit_format(&self) -> bool {
        self.implicit_format
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Override the `User-Agent` sent with this endpoint's requests.
    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) {
        self.user_agent = user_agent.into();
    }

    /// Register a pattern. Registering an existing pattern is a no-op.
    ///
    /// # Errors
    /// - [`OembedError::InvalidArgument`] for an empty pattern.
    /// - [`OembedError::InvalidPattern`] when the pattern does not compile.
    pub fn add_pattern(&mut self, pattern: &str) -> Result<()> {
        if pattern.is_empty() {
            return Err(OembedError::invalid_argument("URL pattern must be a non-empty string"));
        }
        if self.patterns.contains_key(pattern) {
            return Ok(());
        }
        let compiled = UrlPattern::compile(pattern)?;
        self.patterns.insert(pattern.to_string(), compiled);
        Ok(())
    }

    /// Remove a pattern by its text. Returns whether it was registered.
    pub fn remove_pattern(&mut self, pattern: &str) -> bool {
        self.patterns.shift_remove(pattern).is_some()
    }

    pub fn clear_patterns(&mut self) {
        self.patterns.clear();
    }

    pub fn patterns(&self) -> impl Iterator<Item = &UrlPattern> {
        self.patterns.values()
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Whether any registered pattern matches `url`.
    pub fn matches_url(&self, url: &str) -> bool {
        self.patterns.values().any(|pattern| pattern.matches(url))
    }

    /// Build the provider request URL for `resource_url`.
    ///
    /// `url` is always sent first. In implicit-format mode a `format`
    /// parameter replaces the `{format}` placeholder and is not repeated in
    /// the query string; otherwise it is an ordinary query parameter.
    pub fn build_request_url(&self, resource_url: &str, params: &QueryParams) -> String {
        let mut query = QueryParams::with_capacity(params.len() + 1);
        query.insert("url".to_string(), resource_url.to_string());
        for (key, value) in params {
            if key != "url" {
                query.insert(key.clone(), value.clone());
            }
        }

        let mut api_url = Cow::Borrowed(self.api_url.as_str());
        if self.implicit_format
            && let Some(format) = query.shift_remove("format")
        {
            api_url = Cow::Owned(self.api_url.replace(FORMAT_PLACEHOLDER, &format));
        }

        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(query.iter())
            .finish();
        let separator = if api_url.contains('?') { '&' } else { '?' };
        format!("{api_url}{separator}{encoded}")
    }

    /// Decode a provider reply according to its content type and validate it.
    ///
    /// # Errors
    /// - [`OembedError::MissingContentType`] when no content type was sent.
    /// - [`OembedError::UnsupportedContentType`] for anything but XML or JSON.
    /// - [`OembedError::Decode`] when the body does not parse.
    /// - [`OembedError::Response`] when the decoded fields fail validation.
    pub fn classify_and_parse(content_type: Option<&str>, body: &[u8]) -> Result<OembedResponse> {
        let content_type = content_type.ok_or(OembedError::MissingContentType)?;
        let fields = match classify_content_type(content_type) {
            Some(ResponseFormat::Xml) => decode_xml(body)?,
            Some(ResponseFormat::Json) => decode_json(body)?,
            None => {
                warn!(content_type = %content_type, "unsupported provider content type");
                return Err(OembedError::UnsupportedContentType {
                    content_type: content_type.to_string(),
                });
            }
        };
        Ok(OembedResponse::from_fields(fields)?)
    }

    /// Fetch an already built request URL and parse the reply.
    ///
    /// Cancelling `cancel` while the request is in flight yields
    /// [`TransportError::Cancelled`].
    pub async fn fetch(
        &self,
        fetcher: &dyn Fetcher,
        request_url: &str,
        cancel: &CancellationToken,
    ) -> Result<OembedResponse> {
        let start = Instant::now();
        let request = FetchRequest::new(request_url, self.user_agent.as_str());
        let reply = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(url = %request_url, "provider request cancelled");
                return Err(TransportError::cancelled(request_url).into());
            }
            reply = fetcher.fetch(&request) => reply?,
        };

        let response = Self::classify_and_parse(reply.content_type.as_deref(), &reply.body)?;
        debug!(
            url = %request_url,
            kind = %response.kind(),
            duration_ms = start.elapsed().as_millis(),
            "provider response validated"
        );
        Ok(response)
    }

    /// Build the request URL for `resource_url`, then fetch and parse it.
    pub async fn get(
        &self,
        fetcher: &dyn Fetcher,
        resource_url: &str,
        params: &QueryParams,
        cancel: &CancellationToken,
    ) -> Result<OembedResponse> {
        let request_url = self.build_request_url(resource_url, params);
        debug!(api_url = %self.api_url, request_url = %request_url, "built provider request");
        self.fetch(fetcher, &request_url, cancel).await
    }
}

impl PartialEq for Endpoint {
    fn eq(&self, other: &Self) -> bool {
        self.api_url == other.api_url && self.user_agent == other.user_agent && self.patterns == other.patterns
    }
}

impl Eq for Endpoint {}

/// Pick the codec for a `Content-Type` value. Matching is a case-sensitive
/// substring test; XML is checked before JSON.
pub fn classify_content_type(content_type: &str) -> Option<ResponseFormat> {
    if content_type.contains("application/xml") || content_type.contains("text/xml") {
        Some(ResponseFormat::Xml)
    } else if content_type.contains("application/json") || content_type.contains("text/json") {
        Some(ResponseFormat::Json)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubFetcher;
    use oembed_types::{ResponseError, ResponseKind};

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn construct_with_and_without_patterns() {
        let endpoint = Endpoint::new("http://www.flickr.com/services/oembed");
        assert_eq!(endpoint.pattern_count(), 0);
        assert!(!endpoint.is_implicit_format());
        assert_eq!(endpoint.user_agent(), DEFAULT_USER_AGENT);

        let endpoint = Endpoint::with_patterns(
            "http://www.flickr.com/services/oembed",
            ["http://*.flickr.com/*", "http://flickr.com/*"],
        )
        .unwrap();
        assert_eq!(endpoint.pattern_count(), 2);

        let endpoint = Endpoint::new("http://www.vimeo.com/api/oembed.{format}");
        assert!(endpoint.is_implicit_format());
    }

    #[test]
    fn pattern_registry_add_remove_clear() {
        let mut endpoint = Endpoint::new("http://www.flickr.com/services/oembed");

        endpoint.add_pattern("http://flickr.com/*").unwrap();
        endpoint.add_pattern("http://*.flickr.com/*").unwrap();
        assert_eq!(endpoint.pattern_count(), 2);

        endpoint.add_pattern("http://*.flickr.com/*").unwrap();
        assert_eq!(endpoint.pattern_count(), 2, "duplicate registration must be a no-op");

        endpoint.add_pattern("http://*.flickr.com/").unwrap();
        assert!(endpoint.remove_pattern("http://flickr.com/*"));
        assert!(!endpoint.remove_pattern("http://flickr.com/*"));
        assert_eq!(endpoint.pattern_count(), 2);

        let texts: Vec<&str> = endpoint.patterns().map(UrlPattern::as_str).collect();
        assert_eq!(texts, vec!["http://*.flickr.com/*", "http://*.flickr.com/"]);

        endpoint.clear_patterns();
        assert_eq!(endpoint.pattern_count(), 0);
    }

    #[test]
    fn empty_pattern_is_an_invalid_argument() {
        let mut endpoint = Endpoint::new("http://www.flickr.com/services/oembed");
        assert!(matches!(
            endpoint.add_pattern(""),
            Err(OembedError::InvalidArgument { .. })
        ));
        assert!(matches!(
            Endpoint::with_patterns("http://x", ["regex:("]),
            Err(OembedError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn matches_url_checks_every_pattern() {
        let endpoint = Endpoint::with_patterns(
            "http://www.flickr.com/services/oembed",
            ["http://flickr.com/*", "http://*.flickr.com/*"],
        )
        .unwrap();
        assert!(endpoint.matches_url("http://www.flickr.com/photos/wizardbt/2584979382/"));
        assert!(endpoint.matches_url("http://flickr.com/photos/wizardbt/2584979382/"));
        assert!(!endpoint.matches_url("http://google.com/123456"));
    }

    #[test]
    fn implicit_format_moves_format_into_the_path() {
        let endpoint = Endpoint::new("http://api.example.com/oembed.{format}");
        let url = endpoint.build_request_url("http://example.com/v/1", &params(&[("format", "json")]));
        assert_eq!(url, "http://api.example.com/oembed.json?url=http%3A%2F%2Fexample.com%2Fv%2F1");
        assert!(!url.contains("format="));
    }

    #[test]
    fn explicit_format_stays_in_the_query() {
        let endpoint = Endpoint::new("http://api.example.com/oembed");
        let url = endpoint.build_request_url(
            "http://example.com/v/1",
            &params(&[("format", "json"), ("maxwidth", "300")]),
        );
        assert_eq!(
            url,
            "http://api.example.com/oembed?url=http%3A%2F%2Fexample.com%2Fv%2F1&format=json&maxwidth=300"
        );
    }

    #[test]
    fn existing_query_string_is_extended_with_ampersand() {
        let endpoint = Endpoint::new("http://api.example.com/oembed?key=abc");
        let url = endpoint.build_request_url("http://example.com/a b", &params(&[("url", "ignored")]));
        assert_eq!(url, "http://api.example.com/oembed?key=abc&url=http%3A%2F%2Fexample.com%2Fa+b");
    }

    #[test]
    fn implicit_format_without_format_param_keeps_placeholder() {
        let endpoint = Endpoint::new("http://api.example.com/oembed.{format}");
        let url = endpoint.build_request_url("http://example.com/", &QueryParams::new());
        assert_eq!(url, "http://api.example.com/oembed.{format}?url=http%3A%2F%2Fexample.com%2F");
    }

    #[test]
    fn classifies_content_types_by_substring() {
        assert_eq!(classify_content_type("text/xml; charset=utf-8"), Some(ResponseFormat::Xml));
        assert_eq!(classify_content_type("application/xml"), Some(ResponseFormat::Xml));
        assert_eq!(classify_content_type("application/json; charset=utf-8"), Some(ResponseFormat::Json));
        assert_eq!(classify_content_type("text/json"), Some(ResponseFormat::Json));
        assert_eq!(classify_content_type("Application/JSON"), None);
        assert_eq!(classify_content_type("text/html"), None);
    }

    #[test]
    fn classify_and_parse_requires_a_known_content_type() {
        let body = br#"{"type":"link","version":"1.0"}"#;
        assert!(matches!(
            Endpoint::classify_and_parse(None, body),
            Err(OembedError::MissingContentType)
        ));
        match Endpoint::classify_and_parse(Some("text/html"), body) {
            Err(OembedError::UnsupportedContentType { content_type }) => assert_eq!(content_type, "text/html"),
            other => panic!("unexpected result: {other:?}"),
        }
        let response = Endpoint::classify_and_parse(Some("application/json"), body).unwrap();
        assert_eq!(response.kind(), ResponseKind::Link);
    }

    #[test]
    fn classify_and_parse_validates_xml_replies() {
        let body = b"<oembed><type>photo</type><version>1.0</version><url>http://x/y.jpg</url><height>80</height></oembed>";
        match Endpoint::classify_and_parse(Some("text/xml"), body) {
            Err(OembedError::Response(ResponseError::MissingRequiredField { kind, field })) => {
                assert_eq!(kind, ResponseKind::Photo);
                assert_eq!(field, "width");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_sends_user_agent_and_parses_reply() {
        let fetcher = StubFetcher::json(r#"{"type":"rich","version":"1.0","html":"<div/>","width":10,"height":20}"#);
        let mut endpoint = Endpoint::with_patterns("http://api.example.com/oembed", ["http://example.com/*"]).unwrap();
        endpoint.set_user_agent("my-agent/2.0");

        let response = endpoint
            .get(&fetcher, "http://example.com/r/1", &params(&[("format", "json")]), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.kind(), ResponseKind::Rich);
        let requests = fetcher.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].user_agent, "my-agent/2.0");
        assert_eq!(
            requests[0].url,
            "http://api.example.com/oembed?url=http%3A%2F%2Fexample.com%2Fr%2F1&format=json"
        );
    }

    #[tokio::test]
    async fn cancelled_token_aborts_the_fetch() {
        let fetcher = StubFetcher::json(r#"{"type":"link","version":"1.0"}"#);
        let endpoint = Endpoint::new("http://api.example.com/oembed");
        let cancel = CancellationToken::new();
        cancel.cancel();

        let error = endpoint
            .fetch(&fetcher, "http://api.example.com/oembed?url=x", &cancel)
            .await
            .unwrap_err();
        assert!(matches!(error, OembedError::Transport(TransportError::Cancelled { .. })));
        assert!(fetcher.requests().is_empty());
    }
}
