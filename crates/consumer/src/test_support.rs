//! Test doubles shared by unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use oembed_api::{FetchRequest, FetchedResponse, Fetcher, TransportError};

/// Records every request and answers with a canned reply.
pub(crate) struct StubFetcher {
    status: u16,
    content_type: Option<String>,
    body: Vec<u8>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl StubFetcher {
    pub(crate) fn new(status: u16, content_type: Option<&str>, body: &str) -> Self {
        Self {
            status,
            content_type: content_type.map(str::to_string),
            body: body.as_bytes().to_vec(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn json(body: &str) -> Self {
        Self::new(200, Some("application/json; charset=utf-8"), body)
    }

    pub(crate) fn xml(body: &str) -> Self {
        Self::new(200, Some("text/xml; charset=utf-8"), body)
    }

    pub(crate) fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().expect("stub lock poisoned").clone()
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchedResponse, TransportError> {
        self.requests.lock().expect("stub lock poisoned").push(request.clone());
        if !(200..300).contains(&self.status) {
            return Err(TransportError::Status {
                url: request.url.clone(),
                status: self.status,
            });
        }
        Ok(FetchedResponse {
            status: self.status,
            content_type: self.content_type.clone(),
            body: self.body.clone(),
        })
    }
}
