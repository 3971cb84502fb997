//! Pipeline orchestration - wires together all compositing stages.

use image::RgbImage;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::types::{CompositeReport, SourceImage};

use super::compose::compose;
use super::decode::ImageDecoder;
use super::encode::encode_to_file;
use super::fetch::{HttpFetcher, ImageFetcher};
use super::font::FontChain;
use super::normalize::normalize;
use super::overlay::{render_overlays, OverlayPlacement};

/// A finished canvas plus what went into drawing it.
pub struct RenderedComparison {
    /// The composed, overlaid canvas
    pub canvas: RgbImage,
    /// Font that drew the overlays
    pub font: String,
    /// Where the badges and watermark landed
    pub overlays: OverlayPlacement,
}

/// Builds before/after comparison images.
///
/// Holds only configuration and collaborators; every call allocates and
/// owns its own canvas, so one compositor can serve many requests.
pub struct Compositor {
    config: Config,
    fetcher: Box<dyn ImageFetcher>,
    decoder: ImageDecoder,
    fonts: Arc<FontChain>,
}

impl Compositor {
    /// Create a compositor with an injected fetcher.
    pub fn new(config: Config, fetcher: Box<dyn ImageFetcher>) -> Self {
        Self {
            decoder: ImageDecoder::new(config.limits.clone()),
            fonts: Arc::new(FontChain::from_config(&config)),
            fetcher,
            config,
        }
    }

    /// Create a compositor that fetches over HTTP.
    pub fn with_http(config: Config) -> Self {
        let fetcher = HttpFetcher::new(&config.limits);
        Self::new(config, Box::new(fetcher))
    }

    /// Replace the font resolution chain.
    pub fn with_fonts(mut self, fonts: FontChain) -> Self {
        self.fonts = Arc::new(fonts);
        self
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the comparison and write it to `output_path`.
    ///
    /// Returns `true` on success. Any failure is logged with the stage that
    /// caused it and yields `false`; no file is left at `output_path`.
    pub async fn create_comparison_image(
        &self,
        before_url: &str,
        after_url: &str,
        output_path: &Path,
        watermark: &str,
    ) -> bool {
        match self
            .compose_to_file(before_url, after_url, output_path, watermark)
            .await
        {
            Ok(report) => {
                tracing::info!(
                    "Saved comparison to {:?} ({}, {} bytes)",
                    report.output_path,
                    report.canvas_size,
                    report.bytes_written
                );
                true
            }
            Err(e) => {
                tracing::error!(stage = %e.stage(), "Comparison image failed: {e}");
                false
            }
        }
    }

    /// Run every stage and return a report, or the first stage error.
    pub async fn compose_to_file(
        &self,
        before_url: &str,
        after_url: &str,
        output_path: &Path,
        watermark: &str,
    ) -> PipelineResult<CompositeReport> {
        let start = Instant::now();
        tracing::debug!("Composing {} | {} -> {:?}", before_url, after_url, output_path);

        // Fetch (both downloads run concurrently and join here)
        let fetch_start = Instant::now();
        let (before_bytes, after_bytes) = tokio::try_join!(
            self.fetcher.fetch(before_url),
            self.fetcher.fetch(after_url)
        )?;
        tracing::trace!("  Fetch: {:?}", fetch_start.elapsed());

        // Decode
        let decode_start = Instant::now();
        let before = self.decoder.decode(before_bytes, before_url).await?;
        let after = self.decoder.decode(after_bytes, after_url).await?;
        tracing::trace!("  Decode: {:?}", decode_start.elapsed());

        let before_size = before.dimensions();
        let after_size = after.dimensions();

        // Normalize, compose, overlay
        let render_start = Instant::now();
        let rendered = self.render_blocking(before, after, watermark).await?;
        tracing::trace!("  Render: {:?}", render_start.elapsed());

        // Encode
        let encode_start = Instant::now();
        let quality = self.config.output.jpeg_quality;
        let canvas = rendered.canvas;
        let path = output_path.to_path_buf();
        let bytes_written =
            tokio::task::spawn_blocking(move || encode_to_file(&canvas, &path, quality))
                .await
                .map_err(|e| PipelineError::Io {
                    path: output_path.to_path_buf(),
                    source: std::io::Error::other(format!("encode task failed: {e}")),
                })??;
        tracing::trace!("  Encode: {:?}", encode_start.elapsed());

        Ok(CompositeReport {
            output_path: output_path.to_path_buf(),
            before_size,
            after_size,
            canvas_size: after_size.canvas(),
            bytes_written,
            font: rendered.font,
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Decode already-fetched bytes and render the comparison in memory.
    pub async fn render_bytes(
        &self,
        before_bytes: Vec<u8>,
        after_bytes: Vec<u8>,
        watermark: &str,
    ) -> Result<RenderedComparison, PipelineError> {
        let before = self.decoder.decode(before_bytes, "before").await?;
        let after = self.decoder.decode(after_bytes, "after").await?;
        self.render_blocking(before, after, watermark).await
    }

    /// Run [`render`](Self::render) on the blocking pool; resampling a large
    /// image would otherwise stall the runtime's worker thread.
    async fn render_blocking(
        &self,
        before: SourceImage,
        after: SourceImage,
        watermark: &str,
    ) -> Result<RenderedComparison, PipelineError> {
        let fonts = Arc::clone(&self.fonts);
        let watermark = watermark.to_string();
        tokio::task::spawn_blocking(move || render_with(&fonts, &before, &after, &watermark))
            .await
            .map_err(|e| PipelineError::Render {
                message: format!("render task failed: {e}"),
            })
    }

    /// Normalize, compose, and overlay two decoded images.
    ///
    /// The after-image fixes the unit size; the before-image is stretched to
    /// match. Fonts are resolved fresh for every call.
    pub fn render(
        &self,
        before: &SourceImage,
        after: &SourceImage,
        watermark: &str,
    ) -> RenderedComparison {
        render_with(&self.fonts, before, after, watermark)
    }
}

fn render_with(
    fonts: &FontChain,
    before: &SourceImage,
    after: &SourceImage,
    watermark: &str,
) -> RenderedComparison {
    let target = after.dimensions();
    let normalized = normalize(before, target);
    let mut canvas = compose(&normalized, &after.pixels);

    let fonts = fonts.resolve_for_canvas(canvas.height());
    let overlays = render_overlays(&mut canvas, target.width, watermark, &fonts);

    RenderedComparison {
        canvas,
        font: fonts.name,
        overlays,
    }
}
