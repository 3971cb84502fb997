//! Image generator trait and request/response types.
//!
//! The generation service produces the "after" image; the compositor only
//! consumes the URL it returns.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::GenerationConfig;
use crate::error::GenerationError;

/// Output settings forwarded to the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub resolution: String,
    #[serde(rename = "aspectRatio")]
    pub aspect_ratio: String,
}

/// Body of a generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    #[serde(rename = "type")]
    pub generation_type: String,
    pub prompt: String,
    pub reference_image_url: String,
    pub settings: GenerationSettings,
}

impl GenerationRequest {
    /// Build a request with the configured type and output settings.
    pub fn new(prompt: &str, reference_image_url: &str, config: &GenerationConfig) -> Self {
        Self {
            generation_type: config.generation_type.clone(),
            prompt: prompt.to_string(),
            reference_image_url: reference_image_url.to_string(),
            settings: GenerationSettings {
                resolution: config.resolution.clone(),
                aspect_ratio: config.aspect_ratio.clone(),
            },
        }
    }

    /// Build a request from a raw idea, appending the configured quality
    /// modifiers to form the prompt.
    pub fn from_idea(idea: &str, reference_image_url: &str, config: &GenerationConfig) -> Self {
        let idea = idea.trim();
        let suffix = config.prompt_suffix.trim();
        let prompt = if suffix.is_empty() {
            idea.to_string()
        } else {
            format!("{idea}, {suffix}")
        };
        Self::new(&prompt, reference_image_url, config)
    }
}

/// What a successful generation returns.
#[derive(Debug, Clone)]
pub struct GenerationResponse {
    /// URL of the generated image
    pub image_url: String,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Anything that can turn a prompt and a reference image into a new image.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (callers hold a `Box<dyn ImageGenerator>`).
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generator name for logging.
    fn name(&self) -> &str;

    /// Request one image.
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError>;

    /// Per-request timeout for this generator.
    fn timeout(&self) -> Duration;
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let config = GenerationConfig::default();
        let request = GenerationRequest::new("white sneaker", "https://x/ref.png", &config);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["type"], "text-to-image");
        assert_eq!(json["prompt"], "white sneaker");
        assert_eq!(json["reference_image_url"], "https://x/ref.png");
        assert_eq!(json["settings"]["resolution"], "1K");
        assert_eq!(json["settings"]["aspectRatio"], "3:4");
    }

    #[test]
    fn test_from_idea_appends_suffix() {
        let config = GenerationConfig {
            prompt_suffix: "studio lighting".to_string(),
            ..GenerationConfig::default()
        };
        let request = GenerationRequest::from_idea("  a white sneaker ", "u", &config);
        assert_eq!(request.prompt, "a white sneaker, studio lighting");
    }

    #[test]
    fn test_from_idea_without_suffix() {
        let config = GenerationConfig {
            prompt_suffix: String::new(),
            ..GenerationConfig::default()
        };
        let request = GenerationRequest::from_idea("marble stand", "u", &config);
        assert_eq!(request.prompt, "marble stand");
    }

    #[test]
    fn test_resolve_env_var() {
        // Non-env-var strings pass through
        assert_eq!(resolve_env_var("plain-secret"), Some("plain-secret".to_string()));
        // Empty returns None
        assert_eq!(resolve_env_var(""), None);
        // Unset env var returns None
        assert_eq!(resolve_env_var("${DEFINITELY_NOT_SET_XYZ_123}"), None);
    }
}
