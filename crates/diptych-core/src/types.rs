//! Core data types for the compositing pipeline.

use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A decoded input image, always RGB (alpha dropped).
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Decoded pixels
    pub pixels: RgbImage,
    /// Detected container format ("png", "jpeg", ...)
    pub format: String,
    /// Size of the encoded bytes this image came from
    pub byte_len: u64,
}

impl SourceImage {
    /// Wrap an already-decoded buffer.
    pub fn from_pixels(pixels: RgbImage) -> Self {
        Self {
            pixels,
            format: "raw".to_string(),
            byte_len: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> TargetDimensions {
        TargetDimensions {
            width: self.width(),
            height: self.height(),
        }
    }
}

/// Unit size of the comparison: the after-image's native size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDimensions {
    pub width: u32,
    pub height: u32,
}

impl TargetDimensions {
    /// Size of the side-by-side canvas built from this unit.
    pub fn canvas(&self) -> TargetDimensions {
        TargetDimensions {
            width: self.width * 2,
            height: self.height,
        }
    }
}

impl std::fmt::Display for TargetDimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Top-left position on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub x: i32,
    pub y: i32,
}

impl Anchor {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A text badge drawn over one half of the canvas.
#[derive(Debug, Clone)]
pub struct Label {
    pub text: String,
    pub anchor: Anchor,
    pub background: Rgb<u8>,
}

/// Ink bounding box of a run of text, relative to the pen origin.
///
/// The pen origin is the top-left of the line box; `dx`/`dy` locate the first
/// inked pixel inside it. `width`/`height` cover the inked pixels only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextExtent {
    pub dx: i32,
    pub dy: i32,
    pub width: u32,
    pub height: u32,
}

impl TextExtent {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Pixel rectangle with an exclusive right/bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// True when `other` lies entirely within this rectangle.
    pub fn contains(&self, other: &PixelRect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Where a label's background and text ended up on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelPlacement {
    /// Filled background rectangle
    pub background: PixelRect,
    /// Inked text region
    pub text: PixelRect,
}

/// Summary of a successful compositing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeReport {
    /// Where the encoded file was written
    pub output_path: PathBuf,

    /// Native size of the before image (prior to normalization)
    pub before_size: TargetDimensions,

    /// Native size of the after image
    pub after_size: TargetDimensions,

    /// Final canvas size
    pub canvas_size: TargetDimensions,

    /// Encoded file size in bytes
    pub bytes_written: u64,

    /// Name of the font that rendered the overlays
    pub font: String,

    /// Wall-clock time for the whole run
    pub elapsed_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_doubles_width_only() {
        let unit = TargetDimensions {
            width: 1200,
            height: 900,
        };
        assert_eq!(
            unit.canvas(),
            TargetDimensions {
                width: 2400,
                height: 900
            }
        );
        assert_eq!(unit.to_string(), "1200x900");
    }

    #[test]
    fn test_rect_contains() {
        let outer = PixelRect {
            x: 30,
            y: 30,
            width: 140,
            height: 60,
        };
        let inner = PixelRect {
            x: 50,
            y: 50,
            width: 100,
            height: 20,
        };
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
    }

    #[test]
    fn test_report_serializes() {
        let report = CompositeReport {
            output_path: PathBuf::from("out.jpg"),
            before_size: TargetDimensions {
                width: 800,
                height: 600,
            },
            after_size: TargetDimensions {
                width: 1200,
                height: 900,
            },
            canvas_size: TargetDimensions {
                width: 2400,
                height: 900,
            },
            bytes_written: 1234,
            font: "builtin".to_string(),
            elapsed_ms: 10,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"canvas_size\":{\"width\":2400,\"height\":900}"));
    }
}
