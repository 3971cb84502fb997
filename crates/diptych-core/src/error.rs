//! Error types for the Diptych compositing pipeline.
//!
//! Errors are organized by stage so a failed run can report exactly where it
//! stopped (fetch, decode, encode, ...) along with the URL or path involved.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Diptych operations.
#[derive(Error, Debug)]
pub enum DiptychError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Image generation service errors
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pipeline stages that can fail, in execution order.
///
/// Normalize and compose only resample and copy pixels into a canvas sized
/// from the after-image, so no error is attributed to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Decode,
    Overlay,
    Encode,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetch => "fetch",
            Stage::Decode => "decode",
            Stage::Overlay => "overlay",
            Stage::Encode => "encode",
        };
        f.write_str(name)
    }
}

/// Pipeline processing errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Network retrieval failed (transport error or non-success status)
    #[error("Fetch failed for {url}: {message}")]
    Fetch {
        url: String,
        message: String,
        /// HTTP status code when the server answered
        status_code: Option<u16>,
    },

    /// Response body exceeds the download limit
    #[error("Download too large: {url} (> {max_mb}MB)")]
    DownloadTooLarge { url: String, max_mb: u64 },

    /// Image decoding failed
    #[error("Decode error for {source_name}: {message}")]
    Decode {
        source_name: String,
        message: String,
    },

    /// Image dimensions exceed limit
    #[error("Image too large: {source_name} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        source_name: String,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Operation timed out
    #[error("Timeout in {stage} stage for {source_name} after {timeout_ms}ms")]
    Timeout {
        source_name: String,
        stage: Stage,
        timeout_ms: u64,
    },

    /// Font or text rendering problem. A font that fails to load never
    /// aborts a run (the built-in font is substituted); a render task that
    /// dies does.
    #[error("Render error: {message}")]
    Render { message: String },

    /// Writing the output file failed
    #[error("Cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// The stage this error originated from.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Fetch { .. } | PipelineError::DownloadTooLarge { .. } => Stage::Fetch,
            PipelineError::Decode { .. } | PipelineError::ImageTooLarge { .. } => Stage::Decode,
            PipelineError::Timeout { stage, .. } => *stage,
            PipelineError::Render { .. } => Stage::Overlay,
            PipelineError::Io { .. } => Stage::Encode,
        }
    }
}

/// Errors talking to the upstream image-generation service.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Transport-level failure (DNS, connection refused, timeout)
    #[error("Generation request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status
    #[error("Generation service returned HTTP {status_code}: {body}")]
    Status { status_code: u16, body: String },

    /// The response carried no usable `result` URL
    #[error("Generation response has no result URL")]
    MissingResult,

    /// The shared secret is not configured
    #[error("Generation secret not set. Set MARKETING_SECRET env var or generation.secret.")]
    MissingSecret,
}

/// Convenience type alias for Diptych results.
pub type Result<T> = std::result::Result<T, DiptychError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        let names: Vec<_> = [Stage::Fetch, Stage::Decode, Stage::Overlay, Stage::Encode]
            .iter()
            .map(Stage::to_string)
            .collect();
        assert_eq!(names, ["fetch", "decode", "overlay", "encode"]);
    }

    #[test]
    fn test_render_error_is_overlay_stage() {
        let err = PipelineError::Render {
            message: "render task failed".to_string(),
        };
        assert_eq!(err.stage(), Stage::Overlay);
    }

    #[test]
    fn test_stage_of_fetch_error() {
        let err = PipelineError::Fetch {
            url: "https://example.com/a.png".to_string(),
            message: "HTTP 404 Not Found".to_string(),
            status_code: Some(404),
        };
        assert_eq!(err.stage(), Stage::Fetch);
        assert!(err.to_string().contains("example.com/a.png"));
    }

    #[test]
    fn test_stage_of_timeout_follows_field() {
        let err = PipelineError::Timeout {
            source_name: "after".to_string(),
            stage: Stage::Decode,
            timeout_ms: 5000,
        };
        assert_eq!(err.stage(), Stage::Decode);
        assert!(err.to_string().contains("decode"));
    }

    #[test]
    fn test_stage_of_io_error_is_encode() {
        let err = PipelineError::Io {
            path: PathBuf::from("/nope/out.jpg"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.stage(), Stage::Encode);
    }
}
