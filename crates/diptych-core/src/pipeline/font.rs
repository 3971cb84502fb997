//! Font resolution and text rasterization.
//!
//! Fonts are resolved through an ordered chain of strategies; the first one
//! that loads wins. The last link is a built-in 5x7 bitmap font that cannot
//! fail, so overlay rendering never aborts a run over a missing font.
//!
//! Both faces measure text by its *ink* bounding box (the pixels actually
//! touched), and both draw so that the ink box lands exactly where asked.

use image::{Rgb, RgbImage};
use rusttype::{point, Font, Scale};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::PipelineError;
use crate::types::TextExtent;

/// Label font size, percent of canvas height.
pub const LARGE_FONT_PERCENT: u32 = 5;

/// Watermark font size, percent of canvas height.
pub const SMALL_FONT_PERCENT: u32 = 3;

/// Pixel scale of the built-in bitmap font (each font dot is 2x2 pixels).
pub const BUILTIN_SCALE: u32 = 2;

const GLYPH_W: u32 = 5;
const GLYPH_H: u32 = 7;
const GLYPH_ADVANCE: u32 = GLYPH_W + 1;

/// A loaded typeface, independent of size.
#[derive(Clone)]
pub enum FontFace {
    TrueType(Font<'static>),
    Builtin,
}

impl FontFace {
    /// Bind this face to a pixel size.
    pub fn sized(&self, px: f32) -> ResolvedFont {
        ResolvedFont {
            face: self.clone(),
            px: px.max(1.0),
        }
    }
}

/// A face at a concrete pixel size, ready to measure and draw.
#[derive(Clone)]
pub struct ResolvedFont {
    face: FontFace,
    px: f32,
}

impl ResolvedFont {
    /// Requested pixel size. The built-in face ignores it.
    pub fn px(&self) -> f32 {
        self.px
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.face, FontFace::Builtin)
    }

    /// Ink bounding box of `text` when drawn with its pen origin at (0, 0).
    pub fn measure(&self, text: &str) -> TextExtent {
        match &self.face {
            FontFace::TrueType(font) => measure_truetype(font, self.px, text),
            FontFace::Builtin => measure_builtin(text),
        }
    }

    /// Draw `text` so that its ink box's top-left corner is at (x, y).
    ///
    /// Returns the extent that was used for placement.
    pub fn draw_at(
        &self,
        canvas: &mut RgbImage,
        x: i32,
        y: i32,
        color: Rgb<u8>,
        text: &str,
    ) -> TextExtent {
        let extent = self.measure(text);
        if extent.is_empty() {
            return extent;
        }
        let origin_x = x - extent.dx;
        let origin_y = y - extent.dy;
        match &self.face {
            FontFace::TrueType(font) => {
                draw_truetype(canvas, font, self.px, origin_x, origin_y, color, text)
            }
            FontFace::Builtin => draw_builtin(canvas, origin_x, origin_y, color, text),
        }
        extent
    }
}

/// One way of obtaining a font face.
pub trait FontStrategy: Send + Sync {
    /// Human-readable name for logs and reports.
    fn name(&self) -> String;

    /// Try to load the face.
    fn load(&self) -> Result<FontFace, PipelineError>;
}

/// Loads a TrueType/OpenType file from disk.
pub struct FileFont {
    path: PathBuf,
}

impl FileFont {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FontStrategy for FileFont {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<FontFace, PipelineError> {
        let bytes = std::fs::read(&self.path).map_err(|e| PipelineError::Render {
            message: format!("cannot read font {}: {e}", self.path.display()),
        })?;
        let font = Font::try_from_vec(bytes).ok_or_else(|| PipelineError::Render {
            message: format!("{} is not a usable font file", self.path.display()),
        })?;
        Ok(FontFace::TrueType(font))
    }
}

/// The embedded bitmap font. Always loads.
pub struct BuiltinFont;

impl FontStrategy for BuiltinFont {
    fn name(&self) -> String {
        "builtin-5x7".to_string()
    }

    fn load(&self) -> Result<FontFace, PipelineError> {
        Ok(FontFace::Builtin)
    }
}

/// The pair of sizes used by one render call.
pub struct FontPair {
    /// Which strategy produced the face
    pub name: String,
    /// Badge text, 5% of canvas height
    pub large: ResolvedFont,
    /// Watermark text, 3% of canvas height
    pub small: ResolvedFont,
}

/// Ordered list of font strategies.
pub struct FontChain {
    strategies: Vec<Box<dyn FontStrategy>>,
}

impl FontChain {
    pub fn new(strategies: Vec<Box<dyn FontStrategy>>) -> Self {
        Self { strategies }
    }

    /// Build the chain from configured search paths, then the built-in font.
    pub fn from_config(config: &Config) -> Self {
        let mut strategies: Vec<Box<dyn FontStrategy>> = config
            .font_paths()
            .into_iter()
            .map(|p| Box::new(FileFont::new(p)) as Box<dyn FontStrategy>)
            .collect();
        if config.fonts.use_builtin_fallback {
            strategies.push(Box::new(BuiltinFont));
        }
        Self::new(strategies)
    }

    /// A chain that always renders with the bitmap font.
    pub fn builtin_only() -> Self {
        Self::new(vec![Box::new(BuiltinFont)])
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Resolve a face, trying each strategy in order.
    ///
    /// Never fails: when every strategy errors, the built-in face is used.
    pub fn resolve(&self) -> (String, FontFace) {
        for strategy in &self.strategies {
            match strategy.load() {
                Ok(face) => {
                    tracing::debug!("Using font: {}", strategy.name());
                    return (strategy.name(), face);
                }
                Err(e) => tracing::debug!("Font candidate skipped: {e}"),
            }
        }
        let fallback = BuiltinFont;
        tracing::warn!(
            "No font in the chain could be loaded, using {}",
            fallback.name()
        );
        (fallback.name(), FontFace::Builtin)
    }

    /// Resolve once and size for a canvas of `canvas_height` pixels.
    pub fn resolve_for_canvas(&self, canvas_height: u32) -> FontPair {
        let (name, face) = self.resolve();
        let px = |percent: u32| (canvas_height * percent / 100) as f32;
        FontPair {
            name,
            large: face.sized(px(LARGE_FONT_PERCENT)),
            small: face.sized(px(SMALL_FONT_PERCENT)),
        }
    }
}

// --- TrueType ---

fn measure_truetype(font: &Font<'static>, px: f32, text: &str) -> TextExtent {
    let scale = Scale::uniform(px);
    let ascent = font.v_metrics(scale).ascent;

    let mut bounds: Option<(i32, i32, i32, i32)> = None;
    for glyph in font.layout(text, scale, point(0.0, ascent)) {
        if let Some(bb) = glyph.pixel_bounding_box() {
            bounds = Some(match bounds {
                None => (bb.min.x, bb.min.y, bb.max.x, bb.max.y),
                Some((x0, y0, x1, y1)) => (
                    x0.min(bb.min.x),
                    y0.min(bb.min.y),
                    x1.max(bb.max.x),
                    y1.max(bb.max.y),
                ),
            });
        }
    }

    match bounds {
        Some((x0, y0, x1, y1)) => TextExtent {
            dx: x0,
            dy: y0,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        },
        None => TextExtent::default(),
    }
}

fn draw_truetype(
    canvas: &mut RgbImage,
    font: &Font<'static>,
    px: f32,
    origin_x: i32,
    origin_y: i32,
    color: Rgb<u8>,
    text: &str,
) {
    let scale = Scale::uniform(px);
    let ascent = font.v_metrics(scale).ascent;
    let start = point(origin_x as f32, origin_y as f32 + ascent);

    for glyph in font.layout(text, scale, start) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            let x = gx as i32 + bb.min.x;
            let y = gy as i32 + bb.min.y;
            blend(canvas, x, y, color, coverage);
        });
    }
}

fn blend(canvas: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, coverage: f32) {
    if x < 0 || y < 0 || coverage <= 0.0 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    if x >= canvas.width() || y >= canvas.height() {
        return;
    }
    let alpha = coverage.min(1.0);
    let dst = canvas.get_pixel_mut(x, y);
    for c in 0..3 {
        let mixed = color.0[c] as f32 * alpha + dst.0[c] as f32 * (1.0 - alpha);
        dst.0[c] = mixed.round() as u8;
    }
}

// --- Built-in bitmap font ---

fn measure_builtin(text: &str) -> TextExtent {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (i, ch) in text.chars().enumerate() {
        let Some(rows) = glyph5x7(ch) else {
            continue;
        };
        let pen = i as u32 * GLYPH_ADVANCE;
        for (ry, bits) in rows.iter().enumerate() {
            for rx in 0..GLYPH_W {
                if bits & (1 << (GLYPH_W - 1 - rx)) == 0 {
                    continue;
                }
                let (x, y) = (pen + rx, ry as u32);
                bounds = Some(match bounds {
                    None => (x, y, x + 1, y + 1),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x + 1), y1.max(y + 1)),
                });
            }
        }
    }

    match bounds {
        Some((x0, y0, x1, y1)) => TextExtent {
            dx: (x0 * BUILTIN_SCALE) as i32,
            dy: (y0 * BUILTIN_SCALE) as i32,
            width: (x1 - x0) * BUILTIN_SCALE,
            height: (y1 - y0) * BUILTIN_SCALE,
        },
        None => TextExtent::default(),
    }
}

fn draw_builtin(canvas: &mut RgbImage, origin_x: i32, origin_y: i32, color: Rgb<u8>, text: &str) {
    let s = BUILTIN_SCALE as i32;
    for (i, ch) in text.chars().enumerate() {
        let Some(rows) = glyph5x7(ch) else {
            continue;
        };
        let pen = origin_x + (i as u32 * GLYPH_ADVANCE) as i32 * s;
        for (ry, bits) in rows.iter().enumerate() {
            for rx in 0..GLYPH_W {
                if bits & (1 << (GLYPH_W - 1 - rx)) == 0 {
                    continue;
                }
                let x = pen + rx as i32 * s;
                let y = origin_y + ry as i32 * s;
                for oy in 0..s {
                    for ox in 0..s {
                        blend(canvas, x + ox, y + oy, color, 1.0);
                    }
                }
            }
        }
    }
}

/// 5x7 glyph rows, top to bottom; bit 4 is the leftmost dot.
///
/// Lowercase folds to uppercase. Unknown characters render as '?'.
/// Space returns an empty glyph so it still advances the pen.
fn glyph5x7(ch: char) -> Option<[u8; GLYPH_H as usize]> {
    let glyph = match ch.to_ascii_uppercase() {
        ' ' => [0; 7],
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        ',' => [0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b00100, 0b01000],
        ':' => [0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b01100, 0b00000],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '+' => [0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000],
        '_' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b11111],
        '/' => [0b00001, 0b00010, 0b00010, 0b00100, 0b01000, 0b01000, 0b10000],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        '\'' => [0b00100, 0b00100, 0b01000, 0b00000, 0b00000, 0b00000, 0b00000],
        '&' => [0b01100, 0b10010, 0b10100, 0b01000, 0b10101, 0b10010, 0b01101],
        '@' => [0b01110, 0b10001, 0b10111, 0b10101, 0b10111, 0b10000, 0b01110],
        '#' => [0b01010, 0b01010, 0b11111, 0b01010, 0b11111, 0b01010, 0b01010],
        '(' => [0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010],
        ')' => [0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000],
        '?' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100],
        _ => return glyph5x7('?'),
    };
    Some(glyph)
}
