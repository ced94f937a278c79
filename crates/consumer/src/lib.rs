//! oEmbed consumer.
//!
//! Given an arbitrary resource URL, the [`Consumer`] picks the first
//! registered [`Endpoint`] whose URL patterns match it, builds the provider
//! request (including format negotiation), fetches it through an
//! [`oembed_api::Fetcher`], and returns a validated [`OembedResponse`].
//!
//! # Example
//!
//! ```ignore
//! use oembed::{Consumer, Endpoint};
//!
//! async fn run() -> oembed::Result<()> {
//!     let mut consumer = Consumer::new()?;
//!     consumer.add_endpoint(Endpoint::with_patterns(
//!         "http://www.flickr.com/services/oembed",
//!         ["http://*.flickr.com/*"],
//!     )?);
//!
//!     let response = consumer.embed("http://www.flickr.com/photos/wizardbt/2584979382/").await?;
//!     println!("{:?}", response.url());
//!     Ok(())
//! }
//! ```
//!
//! # Concurrency
//!
//! Resolution and `embed` only need `&Consumer`, so concurrent calls are
//! fine. Registry mutation needs `&mut`; callers that share a consumer across
//! threads and also reconfigure it must wrap it in their own lock.

pub mod config;
mod consumer;
mod endpoint;
mod error;
mod pattern;

#[cfg(test)]
pub(crate) mod test_support;

pub use consumer::Consumer;
pub use endpoint::{DEFAULT_USER_AGENT, Endpoint, QueryParams, classify_content_type};
pub use error::{OembedError, Result};
pub use pattern::{REGEX_PREFIX, UrlPattern};

pub use oembed_api::{FetchRequest, FetchedResponse, Fetcher, HttpFetcher, TransportError};
pub use oembed_types::{FieldMap, OembedResponse, ResponseError, ResponseFormat, ResponseKind};
pub use tokio_util::sync::CancellationToken;
