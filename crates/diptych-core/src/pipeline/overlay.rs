//! Badge and watermark overlays.
//!
//! Every box is sized from measured ink extents, so longer text simply gets a
//! wider badge. Nothing here can fail; drawing is clipped to the canvas.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use super::font::{FontPair, ResolvedFont};
use crate::types::{Anchor, Label, LabelPlacement, PixelRect};

/// Space between badge text and the badge edge, on every side.
pub const LABEL_PADDING: u32 = 20;

/// Offset of each badge from its half's top-left corner.
pub const LABEL_MARGIN: i32 = 30;

/// Inset of the watermark from the canvas's bottom-right corner.
pub const WATERMARK_MARGIN: i32 = 30;

pub const BEFORE_LABEL: &str = "ORIGINAL";
pub const AFTER_LABEL: &str = "AI GENERATED";

pub const BEFORE_BADGE_COLOR: Rgb<u8> = Rgb([50, 50, 50]);
pub const AFTER_BADGE_COLOR: Rgb<u8> = Rgb([147, 51, 234]);
pub const LABEL_TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
pub const WATERMARK_COLOR: Rgb<u8> = Rgb([200, 200, 200]);

/// Where the overlays of one render landed.
#[derive(Debug, Clone, Copy)]
pub struct OverlayPlacement {
    pub before_badge: LabelPlacement,
    pub after_badge: LabelPlacement,
    /// `None` when the watermark text has no visible glyphs
    pub watermark: Option<PixelRect>,
}

/// The two badges for a comparison whose halves are `unit_width` wide.
pub fn comparison_labels(unit_width: u32) -> [Label; 2] {
    [
        Label {
            text: BEFORE_LABEL.to_string(),
            anchor: Anchor::new(LABEL_MARGIN, LABEL_MARGIN),
            background: BEFORE_BADGE_COLOR,
        },
        Label {
            text: AFTER_LABEL.to_string(),
            anchor: Anchor::new(unit_width as i32 + LABEL_MARGIN, LABEL_MARGIN),
            background: AFTER_BADGE_COLOR,
        },
    ]
}

/// Draw both badges and the watermark onto a composed canvas.
pub fn render_overlays(
    canvas: &mut RgbImage,
    unit_width: u32,
    watermark: &str,
    fonts: &FontPair,
) -> OverlayPlacement {
    let [before, after] = comparison_labels(unit_width);
    let before_badge = draw_label(canvas, &before, &fonts.large);
    let after_badge = draw_label(canvas, &after, &fonts.large);
    let watermark = draw_watermark(canvas, watermark, &fonts.small);
    OverlayPlacement {
        before_badge,
        after_badge,
        watermark,
    }
}

/// Fill a padded box behind `label.text` and draw the text in white on it.
pub fn draw_label(canvas: &mut RgbImage, label: &Label, font: &ResolvedFont) -> LabelPlacement {
    let extent = font.measure(&label.text);
    let background = PixelRect {
        x: label.anchor.x,
        y: label.anchor.y,
        width: extent.width + 2 * LABEL_PADDING,
        height: extent.height + 2 * LABEL_PADDING,
    };
    let text = PixelRect {
        x: label.anchor.x + LABEL_PADDING as i32,
        y: label.anchor.y + LABEL_PADDING as i32,
        width: extent.width,
        height: extent.height,
    };

    draw_filled_rect_mut(
        canvas,
        Rect::at(background.x, background.y).of_size(background.width, background.height),
        label.background,
    );
    font.draw_at(canvas, text.x, text.y, LABEL_TEXT_COLOR, &label.text);

    LabelPlacement { background, text }
}

/// Draw unboxed light-gray text whose ink ends exactly
/// `WATERMARK_MARGIN` pixels from the right and bottom edges.
pub fn draw_watermark(canvas: &mut RgbImage, text: &str, font: &ResolvedFont) -> Option<PixelRect> {
    let extent = font.measure(text);
    if extent.is_empty() {
        return None;
    }
    let placed = PixelRect {
        x: canvas.width() as i32 - extent.width as i32 - WATERMARK_MARGIN,
        y: canvas.height() as i32 - extent.height as i32 - WATERMARK_MARGIN,
        width: extent.width,
        height: extent.height,
    };
    font.draw_at(canvas, placed.x, placed.y, WATERMARK_COLOR, text);
    Some(placed)
}
