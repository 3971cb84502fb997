//! Image retrieval over HTTP.
//!
//! A single attempt per URL: no retries, no caching. Callers that want retry
//! behavior wrap the whole compositing call.

use async_trait::async_trait;
use futures_util::StreamExt;
use std::time::Duration;

use crate::config::LimitsConfig;
use crate::error::PipelineError;

/// Anything that can turn a URL into raw image bytes.
///
/// Uses `async_trait` so the compositor can hold a `Box<dyn ImageFetcher>`.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Fetcher name for logging.
    fn name(&self) -> &str;

    /// Retrieve the bytes behind `url`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, PipelineError>;
}

/// Fetches images with `reqwest`, enforcing a timeout and a size cap.
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
    max_bytes: u64,
    max_mb: u64,
}

impl HttpFetcher {
    pub fn new(limits: &LimitsConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: Duration::from_millis(limits.fetch_timeout_ms),
            max_bytes: limits.max_download_mb.saturating_mul(1024 * 1024),
            max_mb: limits.max_download_mb,
        }
    }

    fn too_large(&self, url: &str) -> PipelineError {
        PipelineError::DownloadTooLarge {
            url: url.to_string(),
            max_mb: self.max_mb,
        }
    }
}

#[async_trait]
impl ImageFetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, PipelineError> {
        let resp = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| PipelineError::Fetch {
                url: url.to_string(),
                message: format!("request failed: {e}"),
                status_code: None,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PipelineError::Fetch {
                url: url.to_string(),
                message: format!("HTTP {status}"),
                status_code: Some(status.as_u16()),
            });
        }

        if resp.content_length().is_some_and(|len| len > self.max_bytes) {
            return Err(self.too_large(url));
        }

        let mut body = Vec::new();
        let mut stream = resp.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| PipelineError::Fetch {
                url: url.to_string(),
                message: format!("body read failed: {e}"),
                status_code: Some(status.as_u16()),
            })?;
            if body.len() as u64 + chunk.len() as u64 > self.max_bytes {
                return Err(self.too_large(url));
            }
            body.extend_from_slice(&chunk);
        }

        tracing::debug!(url, bytes = body.len(), "Fetched image");
        Ok(body)
    }
}
