//! Side-by-side canvas assembly.

use image::{imageops, Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::types::TargetDimensions;

/// Width of the seam between the two halves.
pub const DIVIDER_WIDTH: u32 = 4;

/// Canvas background and divider color.
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Place `before` on the left and `after` on the right of a white canvas.
///
/// `before` must already be normalized to `after`'s size. A white divider
/// covers columns `W..W + DIVIDER_WIDTH` for the full height.
pub fn compose(before: &RgbImage, after: &RgbImage) -> RgbImage {
    debug_assert_eq!(before.dimensions(), after.dimensions());
    let unit = TargetDimensions {
        width: after.width(),
        height: after.height(),
    };
    let size = unit.canvas();

    let mut canvas = RgbImage::from_pixel(size.width, size.height, WHITE);
    imageops::replace(&mut canvas, before, 0, 0);
    imageops::replace(&mut canvas, after, i64::from(unit.width), 0);
    draw_divider(&mut canvas, unit.width);
    canvas
}

fn draw_divider(canvas: &mut RgbImage, x: u32) {
    let width = DIVIDER_WIDTH.min(canvas.width().saturating_sub(x));
    if width == 0 || canvas.height() == 0 {
        return;
    }
    let rect = Rect::at(x as i32, 0).of_size(width, canvas.height());
    draw_filled_rect_mut(canvas, rect, WHITE);
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb<u8> = Rgb([200, 0, 0]);
    const BLUE: Rgb<u8> = Rgb([0, 0, 200]);

    #[test]
    fn test_canvas_is_double_width() {
        let before = RgbImage::from_pixel(120, 90, RED);
        let after = RgbImage::from_pixel(120, 90, BLUE);
        let canvas = compose(&before, &after);
        assert_eq!(canvas.dimensions(), (240, 90));
    }

    #[test]
    fn test_halves_match_sources_outside_divider() {
        let before = RgbImage::from_pixel(50, 20, RED);
        let after = RgbImage::from_pixel(50, 20, BLUE);
        let canvas = compose(&before, &after);

        for y in 0..20 {
            for x in 0..50 {
                assert_eq!(*canvas.get_pixel(x, y), RED);
            }
            for x in 50 + DIVIDER_WIDTH..100 {
                assert_eq!(*canvas.get_pixel(x, y), BLUE);
            }
        }
    }

    #[test]
    fn test_divider_is_white_full_height() {
        let before = RgbImage::from_pixel(50, 20, RED);
        let after = RgbImage::from_pixel(50, 20, BLUE);
        let canvas = compose(&before, &after);

        for y in 0..20 {
            for x in 50..50 + DIVIDER_WIDTH {
                assert_eq!(*canvas.get_pixel(x, y), WHITE);
            }
        }
        // The column just past the seam is untouched.
        assert_eq!(*canvas.get_pixel(50 + DIVIDER_WIDTH, 0), BLUE);
    }

    #[test]
    fn test_tiny_images_do_not_overflow() {
        let before = RgbImage::from_pixel(2, 2, RED);
        let after = RgbImage::from_pixel(2, 2, BLUE);
        let canvas = compose(&before, &after);
        assert_eq!(canvas.dimensions(), (4, 2));
        assert_eq!(*canvas.get_pixel(0, 0), RED);
        assert_eq!(*canvas.get_pixel(2, 1), WHITE);
        assert_eq!(*canvas.get_pixel(3, 1), WHITE);
    }
}
