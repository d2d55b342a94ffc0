//! Asset Fetching - narrow HTTP seam
//!
//! No retries at this layer; retry policy, if any, belongs to the caller.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("fetch failed for {url}: HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("request failed for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("empty response body for {url}")]
    EmptyBody { url: String },
}

/// Retrieves raw bytes for a template or branding asset by URL.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    /// Timeouts and connection policy come from the supplied client.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport { url: url.to_string(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport { url: url.to_string(), source })?;
        if bytes.is_empty() {
            return Err(FetchError::EmptyBody { url: url.to_string() });
        }
        Ok(bytes.to_vec())
    }
}
