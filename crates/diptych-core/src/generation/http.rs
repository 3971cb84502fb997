//! HTTP client for the image-generation service.
//!
//! Posts a JSON generation request authenticated by a shared-secret header
//! and reads `{ "result": "<url>" }` back. One attempt per call.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::{Duration, Instant};

use super::provider::{resolve_env_var, GenerationRequest, GenerationResponse, ImageGenerator};
use crate::config::GenerationConfig;
use crate::error::GenerationError;

/// Generation service reached over HTTP.
pub struct HttpImageGenerator {
    endpoint: String,
    secret_header: String,
    secret: String,
    timeout: Duration,
    client: reqwest::Client,
}

/// Service response. Other fields are ignored.
///
/// Deployed services answer with either `result` or `image_url`.
#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(alias = "image_url")]
    result: Option<String>,
}

impl HttpImageGenerator {
    /// Build a client from config, resolving `${ENV_VAR}` in the secret.
    pub fn from_config(config: &GenerationConfig) -> Result<Self, GenerationError> {
        let secret = resolve_env_var(&config.secret).ok_or(GenerationError::MissingSecret)?;
        Ok(Self::new(
            &config.endpoint,
            &config.secret_header,
            &secret,
            Duration::from_millis(config.timeout_ms),
        ))
    }

    pub fn new(endpoint: &str, secret_header: &str, secret: &str, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            secret_header: secret_header.to_string(),
            secret: secret.to_string(),
            timeout,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ImageGenerator for HttpImageGenerator {
    fn name(&self) -> &str {
        "http"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        let start = Instant::now();
        tracing::info!("Requesting generation: {}", request.prompt);

        let resp = self
            .client
            .post(&self.endpoint)
            .header(self.secret_header.as_str(), self.secret.as_str())
            .json(request)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status_code: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| GenerationError::Request(format!("invalid response body: {e}")))?;
        let image_url = parsed
            .result
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .ok_or(GenerationError::MissingResult)?;

        tracing::info!("Generated image: {}", image_url);
        Ok(GenerationResponse {
            image_url,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve_once;

    fn generator(endpoint: &str) -> HttpImageGenerator {
        HttpImageGenerator::new(
            endpoint,
            "X-Marketing-Secret",
            "s3cret",
            Duration::from_secs(5),
        )
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new("sneaker", "https://x/ref.png", &GenerationConfig::default())
    }

    #[tokio::test]
    async fn test_generate_returns_result_url_and_sends_secret() {
        let body = br#"{"result":"https://cdn.example/gen.png","credits":3}"#.to_vec();
        let (url, server) = serve_once("200 OK", "application/json", body).await;

        let resp = generator(&format!("{url}/api/generate"))
            .generate(&request())
            .await
            .unwrap();
        assert_eq!(resp.image_url, "https://cdn.example/gen.png");

        let raw = server.await.unwrap().to_lowercase();
        assert!(raw.starts_with("post /api/generate"));
        assert!(raw.contains("x-marketing-secret: s3cret"));
        assert!(raw.contains("\"reference_image_url\":\"https://x/ref.png\""));
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let (url, _server) =
            serve_once("401 Unauthorized", "text/plain", b"bad secret".to_vec()).await;
        let err = generator(&url).generate(&request()).await.unwrap_err();
        match err {
            GenerationError::Status { status_code, body } => {
                assert_eq!(status_code, 401);
                assert_eq!(body, "bad secret");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_image_url_field_is_accepted() {
        let body = br#"{"success":true,"image_url":"https://cdn.example/gen2.png"}"#.to_vec();
        let (url, _server) = serve_once("200 OK", "application/json", body).await;

        let resp = generator(&url).generate(&request()).await.unwrap();
        assert_eq!(resp.image_url, "https://cdn.example/gen2.png");
    }

    #[tokio::test]
    async fn test_missing_result_is_error() {
        let (url, _server) = serve_once("200 OK", "application/json", b"{}".to_vec()).await;
        let err = generator(&url).generate(&request()).await.unwrap_err();
        assert!(matches!(err, GenerationError::MissingResult));
    }

    #[test]
    fn test_from_config_requires_secret() {
        let config = GenerationConfig {
            secret: "${DEFINITELY_NOT_SET_XYZ_456}".to_string(),
            ..GenerationConfig::default()
        };
        assert!(matches!(
            HttpImageGenerator::from_config(&config),
            Err(GenerationError::MissingSecret)
        ));
    }
}
