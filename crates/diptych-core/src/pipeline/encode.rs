//! JPEG encoding with all-or-nothing file output.

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use std::io::Write;
use std::path::Path;

use crate::error::PipelineError;

/// Default JPEG quality factor.
pub const DEFAULT_QUALITY: u8 = 95;

/// Encode `canvas` as JPEG at `quality` (clamped to 1..=100).
pub fn encode_jpeg(canvas: &RgbImage, quality: u8) -> Result<Vec<u8>, image::ImageError> {
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100)).write_image(
        canvas.as_raw(),
        canvas.width(),
        canvas.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(buffer)
}

/// Encode and write `canvas` to `path`, returning the number of bytes written.
///
/// The JPEG goes to a uniquely named hidden file in the destination
/// directory and is then renamed over `path`, so `path` either holds a
/// complete JPEG or is left untouched. Concurrent writers to the same path
/// never share a temporary file; the last rename wins.
pub fn encode_to_file(canvas: &RgbImage, path: &Path, quality: u8) -> Result<u64, PipelineError> {
    let io_error = |source: std::io::Error| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    };

    let bytes = encode_jpeg(canvas, quality).map_err(|e| io_error(std::io::Error::other(e)))?;

    let mut partial = tempfile::Builder::new()
        .prefix(PARTIAL_PREFIX)
        .suffix(PARTIAL_SUFFIX)
        .tempfile_in(parent_dir(path))
        .map_err(io_error)?;
    partial.write_all(&bytes).map_err(io_error)?;
    partial.as_file().sync_all().map_err(io_error)?;
    // On failure the temporary file is dropped, which removes it.
    partial.persist(path).map_err(|e| io_error(e.error))?;

    tracing::debug!("Wrote {} bytes to {:?}", bytes.len(), path);
    Ok(bytes.len() as u64)
}

const PARTIAL_PREFIX: &str = ".diptych-";
const PARTIAL_SUFFIX: &str = ".partial";

/// Directory the temporary file is created in; a bare file name means the
/// current directory.
fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}
