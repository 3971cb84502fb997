//! Image decoding with format sniffing, RGB coercion, and timeout support.

use image::{GenericImageView, ImageFormat};
use std::io::Cursor;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::LimitsConfig;
use crate::error::{PipelineError, Stage};
use crate::types::SourceImage;

/// Image decoder with configurable limits and timeout.
pub struct ImageDecoder {
    limits: LimitsConfig,
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Decode fetched bytes into an RGB `SourceImage`.
    ///
    /// `source_name` identifies the input in errors and logs (a URL or a
    /// role such as "before").
    pub async fn decode(
        &self,
        bytes: Vec<u8>,
        source_name: &str,
    ) -> Result<SourceImage, PipelineError> {
        let name = source_name.to_string();
        let timeout_duration = Duration::from_millis(self.limits.decode_timeout_ms);

        let decode_result = timeout(timeout_duration, async {
            tokio::task::spawn_blocking(move || Self::decode_bytes_sync(bytes, &name)).await
        })
        .await;

        match decode_result {
            Ok(Ok(Ok(decoded))) => {
                if decoded.width() > self.limits.max_image_dimension
                    || decoded.height() > self.limits.max_image_dimension
                {
                    return Err(PipelineError::ImageTooLarge {
                        source_name: source_name.to_string(),
                        width: decoded.width(),
                        height: decoded.height(),
                        max_dim: self.limits.max_image_dimension,
                    });
                }
                Ok(decoded)
            }
            Ok(Ok(Err(e))) => Err(e),
            Ok(Err(e)) => Err(PipelineError::Decode {
                source_name: source_name.to_string(),
                message: format!("Task join error: {}", e),
            }),
            Err(_) => Err(PipelineError::Timeout {
                source_name: source_name.to_string(),
                stage: Stage::Decode,
                timeout_ms: self.limits.decode_timeout_ms,
            }),
        }
    }

    /// Synchronous decode from bytes (runs in spawn_blocking).
    pub fn decode_bytes_sync(
        bytes: Vec<u8>,
        source_name: &str,
    ) -> Result<SourceImage, PipelineError> {
        let byte_len = bytes.len() as u64;
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                source_name: source_name.to_string(),
                message: format!("Cannot detect image format: {}", e),
            })?;
        let format = reader.format().ok_or_else(|| PipelineError::Decode {
            source_name: source_name.to_string(),
            message: "Unrecognized image format".to_string(),
        })?;
        let image = reader.decode().map_err(|e| PipelineError::Decode {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })?;

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(PipelineError::Decode {
                source_name: source_name.to_string(),
                message: "Image has zero width or height".to_string(),
            });
        }

        Ok(SourceImage {
            pixels: image.to_rgb8(),
            format: format_to_string(format),
            byte_len,
        })
    }
}

/// Convert an ImageFormat to a string representation.
pub fn format_to_string(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "jpeg".to_string(),
        ImageFormat::Png => "png".to_string(),
        ImageFormat::WebP => "webp".to_string(),
        ImageFormat::Gif => "gif".to_string(),
        ImageFormat::Tiff => "tiff".to_string(),
        ImageFormat::Bmp => "bmp".to_string(),
        _ => "unknown".to_string(),
    }
}
