//! HTTP fetch layer.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use tracing::debug;

use crate::models::{AssetRequest, AssetResponse};

use super::FetchError;

/// HTTP request timeout in seconds.
/// 30s tolerates slow asset hosts while still failing over to the cache
/// quickly enough to keep pages usable.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// The wire as the cache manager sees it.
///
/// Implementations return any response the server produced, whatever the
/// status; callers decide what is cacheable. Transport failures are the
/// only `Err` case.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, FetchError>;
}

/// `reqwest`-backed fetcher.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, FetchError> {
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|_| FetchError::InvalidMethod(request.method.clone()))?;

        debug!(method = %method, url = %request.url, "fetching over network");
        let response = self
            .client
            .request(method, request.url.clone())
            .send()
            .await?;

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();

        // The reqwest body is a single-read stream; materialize it once.
        let body = response.bytes().await?;

        Ok(AssetResponse::new(status.as_u16(), status_text, headers, body))
    }
}
