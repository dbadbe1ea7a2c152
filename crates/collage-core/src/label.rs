use crate::color::Color;
use crate::error::{CollageError, Result};
use ab_glyph::{Font, FontVec, GlyphId, OutlinedGlyph, PxScale, ScaleFont, point};
use image::RgbImage;
use imageproc::pixelops::interpolate;
use std::path::Path;

/// Loaded font plus the size and color labels are drawn with.
pub struct LabelStyle {
    font: FontVec,
    scale: PxScale,
    color: Color,
}

impl LabelStyle {
    pub fn new(font: FontVec, size_px: f32, color: Color) -> Self {
        Self {
            font,
            scale: PxScale::from(size_px),
            color,
        }
    }

    /// Reads a TrueType/OpenType font from disk.
    pub fn load(path: &Path, size_px: f32, color: Color) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| CollageError::Font {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let font = FontVec::try_from_vec(data).map_err(|e| CollageError::Font {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self::new(font, size_px, color))
    }

    /// Glyph outlines positioned relative to the draw origin, baseline at the ascent.
    fn layout(&self, text: &str) -> Vec<OutlinedGlyph> {
        let scaled = self.font.as_scaled(self.scale);
        let mut caret = 0.0f32;
        let mut last: Option<GlyphId> = None;
        let mut glyphs = Vec::with_capacity(text.len());
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = last {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(self.scale, point(caret, scaled.ascent()));
            caret += scaled.h_advance(id);
            last = Some(id);
            if let Some(outlined) = self.font.outline_glyph(glyph) {
                glyphs.push(outlined);
            }
        }
        glyphs
    }

    /// Extent of the drawn pixels of `text`, measured from the draw origin.
    /// Every pixel `draw` touches lies in `[x, x + w) × [y, y + h)`.
    pub fn measure(&self, text: &str) -> (u32, u32) {
        self.layout(text).iter().fold((0, 0), |(w, h), g| {
            let bb = g.px_bounds();
            (w.max(bb.max.x.max(0.0) as u32), h.max(bb.max.y.max(0.0) as u32))
        })
    }

    /// Draws `text` with its origin at (x, y), blending by glyph coverage.
    /// Pixels outside the canvas are skipped.
    pub fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str) {
        let color = self.color.to_rgb();
        let (cw, ch) = (canvas.width() as i64, canvas.height() as i64);
        for g in self.layout(text) {
            let bb = g.px_bounds();
            let ox = x as i64 + bb.min.x as i64;
            let oy = y as i64 + bb.min.y as i64;
            g.draw(|gx, gy, coverage| {
                let px = ox + gx as i64;
                let py = oy + gy as i64;
                if coverage <= 0.0 || px < 0 || py < 0 || px >= cw || py >= ch {
                    return;
                }
                let dst = canvas.get_pixel_mut(px as u32, py as u32);
                *dst = interpolate(color, *dst, coverage.min(1.0));
            });
        }
    }
}
