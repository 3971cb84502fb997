//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Per-request transport timeout for image downloads in milliseconds
    pub fetch_timeout_ms: u64,

    /// Maximum download size in megabytes
    pub max_download_mb: u64,

    /// Maximum image dimension (width or height)
    pub max_image_dimension: u32,

    /// Decode timeout in milliseconds
    pub decode_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: 30000,
            max_download_mb: 50,
            max_image_dimension: 10000,
            decode_timeout_ms: 5000,
        }
    }
}

/// Font resolution settings.
///
/// Candidates are tried in order; the first file that parses as a TrueType
/// font wins. When none load, the built-in bitmap font is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Ordered list of font files to try (supports `~`)
    pub search_paths: Vec<String>,

    /// Append the built-in bitmap font to the end of the chain
    pub use_builtin_fallback: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            search_paths: vec![
                "C:\\Windows\\Fonts\\arialbd.ttf".to_string(),
                "/Library/Fonts/Arial Bold.ttf".to_string(),
                "/System/Library/Fonts/Supplemental/Arial Bold.ttf".to_string(),
                "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf".to_string(),
                "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf".to_string(),
                "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf".to_string(),
            ],
            use_builtin_fallback: true,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for generated assets when no explicit path is given
    pub dir: String,

    /// JPEG quality factor (1-100)
    pub jpeg_quality: u8,

    /// Default watermark text
    pub watermark: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "marketing_assets".to_string(),
            jpeg_quality: 95,
            watermark: "pikadesign.me".to_string(),
        }
    }
}

/// Image-generation service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Generation endpoint URL
    pub endpoint: String,

    /// Shared secret (supports ${ENV_VAR} syntax)
    pub secret: String,

    /// Header carrying the shared secret
    pub secret_header: String,

    /// Generation type sent as `type`
    pub generation_type: String,

    /// Requested output resolution ("1K", "2K", ...)
    pub resolution: String,

    /// Requested aspect ratio ("3:4" suits portrait social posts)
    pub aspect_ratio: String,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,

    /// Quality modifiers appended to a raw idea to form the prompt
    pub prompt_suffix: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000/api/generate".to_string(),
            secret: "${MARKETING_SECRET}".to_string(),
            secret_header: "X-Marketing-Secret".to_string(),
            generation_type: "text-to-image".to_string(),
            resolution: "1K".to_string(),
            aspect_ratio: "3:4".to_string(),
            timeout_ms: 120000,
            prompt_suffix: "professional commercial photography, high resolution, soft lighting, \
                            8k quality, minimalist composition"
                .to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
