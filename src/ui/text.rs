//! Text rasterisation with ab_glyph
//!
//! Glyph coverage is blended straight into the pixmap, source-over. Only
//! screen-space positions are accepted; world-space labels are projected by
//! the caller first.

use std::path::Path;

use ab_glyph::{Font, FontVec, GlyphId, PxScale, ScaleFont, point};
use tiny_skia::{Pixmap, PremultipliedColorU8};

use crate::ui::palette::Rgba;
use crate::ui::renderer::RendererError;

/// A loaded font able to measure and draw single-line text
pub struct TextPainter {
    font: FontVec,
}

impl std::fmt::Debug for TextPainter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextPainter")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl TextPainter {
    /// Loads a TrueType/OpenType font file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RendererError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| RendererError::FontRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, RendererError> {
        let font = FontVec::try_from_vec(bytes).map_err(|_| RendererError::InvalidFont)?;
        Ok(Self { font })
    }

    /// Advance width of `text` at `size` pixels
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        let scaled = self.font.as_scaled(PxScale::from(size));
        let mut width = 0.0;
        let mut prev: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = prev {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        width
    }

    /// Draws `text` with its baseline starting at (`x`, `baseline`)
    pub fn draw(&self, pixmap: &mut Pixmap, text: &str, x: f32, baseline: f32, size: f32, color: Rgba) {
        let scaled = self.font.as_scaled(PxScale::from(size));
        let (width, height) = (pixmap.width() as i32, pixmap.height() as i32);
        let pixels = pixmap.pixels_mut();

        let mut caret = x;
        let mut prev: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = prev {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(size, point(caret, baseline));
            caret += scaled.h_advance(id);
            prev = Some(id);

            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = bounds.min.x as i32 + gx as i32;
                let py = bounds.min.y as i32 + gy as i32;
                if px < 0 || py < 0 || px >= width || py >= height {
                    return;
                }
                let index = (py * width + px) as usize;
                pixels[index] = blend(pixels[index], color, coverage);
            });
        }
    }
}

/// Source-over blend of `color` at `coverage` onto a premultiplied pixel
fn blend(dst: PremultipliedColorU8, color: Rgba, coverage: f32) -> PremultipliedColorU8 {
    let alpha = (color.3 as f32 / 255.0) * coverage.clamp(0.0, 1.0);
    let inv = 1.0 - alpha;
    let channel = |src: u8, dst: u8| (src as f32 * alpha + dst as f32 * inv).round() as u8;

    let a = channel(255, dst.alpha());
    let r = channel(color.0, dst.red()).min(a);
    let g = channel(color.1, dst.green()).min(a);
    let b = channel(color.2, dst.blue()).min(a);

    PremultipliedColorU8::from_rgba(r, g, b, a).unwrap_or(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_font_bytes_are_rejected() {
        let result = TextPainter::from_bytes(vec![0, 1, 2, 3]);
        assert!(matches!(result, Err(RendererError::InvalidFont)));
    }

    #[test]
    fn missing_font_file_is_reported() {
        let result = TextPainter::load("no/such/font.ttf");
        assert!(matches!(result, Err(RendererError::FontRead { .. })));
    }

    #[test]
    fn blend_full_coverage_replaces_pixel() {
        let dst = PremultipliedColorU8::from_rgba(0, 0, 0, 255).unwrap();
        let out = blend(dst, Rgba::rgb(200, 100, 50), 1.0);
        assert_eq!((out.red(), out.green(), out.blue(), out.alpha()), (200, 100, 50, 255));
    }

    #[test]
    fn blend_zero_coverage_keeps_pixel() {
        let dst = PremultipliedColorU8::from_rgba(10, 20, 30, 255).unwrap();
        let out = blend(dst, Rgba::rgb(200, 100, 50), 0.0);
        assert_eq!((out.red(), out.green(), out.blue(), out.alpha()), (10, 20, 30, 255));
    }

    const FONT: &[u8] = include_bytes!("../../tests/fixtures/DejaVuSansMono.ttf");

    #[test]
    fn draw_covers_pixels_above_baseline() {
        let painter = TextPainter::from_bytes(FONT.to_vec()).unwrap();
        let mut pixmap = Pixmap::new(120, 40).unwrap();
        pixmap.fill(tiny_skia::Color::BLACK);
        let before = pixmap.clone();

        painter.draw(&mut pixmap, "Yard", 5.0, 30.0, 20.0, Rgba::rgb(255, 255, 255));

        let lit = |p: &Pixmap, x: u32, y: u32| p.pixel(x, y).map(|c| c.red()).unwrap_or(0);
        let mut changed = 0;
        for y in 10..32 {
            for x in 5..60 {
                if lit(&pixmap, x, y) != lit(&before, x, y) {
                    changed += 1;
                }
            }
        }
        assert!(changed > 20, "only {} pixels changed", changed);

        // Right of the advance and below the descender nothing is touched
        assert_eq!(pixmap.pixel(110, 5), before.pixel(110, 5));
        assert_eq!(pixmap.pixel(110, 39), before.pixel(110, 39));
    }

    #[test]
    fn measure_follows_advances() {
        let painter = TextPainter::from_bytes(FONT.to_vec()).unwrap();
        let one = painter.measure("M", 20.0);
        assert!(one > 0.0);
        assert!((painter.measure("MM", 20.0) - 2.0 * one).abs() < 1e-3);
        assert_eq!(painter.measure("", 20.0), 0.0);
    }
}
