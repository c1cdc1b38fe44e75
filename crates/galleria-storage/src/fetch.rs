//! Retrieval of generated content from the URL a provider served it at.
use std::time::Duration;

use bytes::Bytes;
use galleria_core::storage::{StoreError, StoreFuture};

/// Something that can turn a content URL into bytes.
///
/// Kept as a seam so persistence can be exercised without a network.
pub trait ContentFetcher: Send + Sync {
    fn fetch<'a>(&'a self, url: &'a str) -> StoreFuture<'a, Bytes>;
}

/// [`ContentFetcher`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Backend(Box::new(e)))?;
        Ok(Self { http })
    }

    pub fn with_http(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl ContentFetcher for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> StoreFuture<'a, Bytes> {
        Box::pin(async move {
            let resp = self
                .http
                .get(url)
                .send()
                .await
                .map_err(|e| StoreError::Backend(Box::new(e)))?;

            let status = resp.status();
            if !status.is_success() {
                return Err(StoreError::Backend(
                    format!("GET {url} answered {status}").into(),
                ));
            }

            resp.bytes()
                .await
                .map_err(|e| StoreError::Backend(Box::new(e)))
        })
    }
}
