//! Resizing the before-image onto the after-image's grid.

use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::types::{SourceImage, TargetDimensions};

/// Stretch `before` to exactly `target`.
///
/// Aspect ratio is not preserved and nothing is cropped. Lanczos3 keeps the
/// downscale sharp; an image already at the target size is returned as-is.
pub fn normalize(before: &SourceImage, target: TargetDimensions) -> RgbImage {
    if before.dimensions() == target {
        return before.pixels.clone();
    }
    tracing::debug!(
        "Normalizing before image {} -> {}",
        before.dimensions(),
        target
    );
    imageops::resize(
        &before.pixels,
        target.width,
        target.height,
        FilterType::Lanczos3,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_resizes_to_exact_target() {
        let before = SourceImage::from_pixels(RgbImage::from_pixel(800, 600, Rgb([1, 2, 3])));
        let target = TargetDimensions {
            width: 1200,
            height: 900,
        };
        let out = normalize(&before, target);
        assert_eq!(out.dimensions(), (1200, 900));
    }

    #[test]
    fn test_aspect_ratio_is_not_preserved() {
        let before = SourceImage::from_pixels(RgbImage::new(100, 100));
        let target = TargetDimensions {
            width: 300,
            height: 50,
        };
        assert_eq!(normalize(&before, target).dimensions(), (300, 50));
    }

    #[test]
    fn test_same_size_is_identity() {
        let mut pixels = RgbImage::new(4, 4);
        pixels.put_pixel(1, 2, Rgb([200, 100, 50]));
        let before = SourceImage::from_pixels(pixels.clone());
        let out = normalize(&before, before.dimensions());
        assert_eq!(out, pixels);
    }

    #[test]
    fn test_solid_color_survives_resample() {
        let before = SourceImage::from_pixels(RgbImage::from_pixel(40, 30, Rgb([90, 90, 90])));
        let out = normalize(
            &before,
            TargetDimensions {
                width: 60,
                height: 45,
            },
        );
        assert_eq!(out.get_pixel(30, 20).0, [90, 90, 90]);
    }
}
