//! Label text.
//!
//! Glyph outlines come from an embedded DejaVu Sans face via `ab_glyph` and
//! are filled as ordinary `tiny-skia` paths, so text gets the same
//! anti-aliasing and transforms as the rest of the plot.

use std::sync::OnceLock;

use ab_glyph::{Font, FontRef, GlyphId, InvalidFont, OutlineCurve, PxScale, ScaleFont};
use tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Transform};

use super::RenderError;

/// DejaVu Sans, Bitstream Vera license (see `data/fonts/LICENSE-DejaVu.txt`).
const LABEL_FONT_TTF: &[u8] = include_bytes!("../../data/fonts/DejaVuSans.ttf");

static LABEL_FONT: OnceLock<Result<FontRef<'static>, InvalidFont>> = OnceLock::new();

/// Direction text runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Orientation {
    /// Left to right.
    Horizontal,
    /// Bottom to top, glyph tops facing left.
    Vertical,
}

/// Vertical extent of a line of text at `size_px`: (ascent, descent).
///
/// Descent is negative, below the baseline.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LineMetrics {
    pub ascent: f32,
    pub descent: f32,
}

fn label_font() -> Result<&'static FontRef<'static>, RenderError> {
    LABEL_FONT
        .get_or_init(|| FontRef::try_from_slice(LABEL_FONT_TTF))
        .as_ref()
        .map_err(|_| RenderError::Font(InvalidFont))
}

/// Ascent and descent for `size_px`.
pub(crate) fn line_metrics(size_px: f32) -> Result<LineMetrics, RenderError> {
    let scaled = label_font()?.as_scaled(PxScale::from(size_px));
    Ok(LineMetrics {
        ascent: scaled.ascent(),
        descent: scaled.descent(),
    })
}

/// Advance width of `text` at `size_px`, kerning included.
pub(crate) fn text_width(text: &str, size_px: f32) -> Result<f32, RenderError> {
    let font = label_font()?;
    let scaled = font.as_scaled(PxScale::from(size_px));

    let mut width = 0.0;
    let mut prev: Option<GlyphId> = None;
    for c in text.chars() {
        let id = font.glyph_id(c);
        if let Some(prev) = prev {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        prev = Some(id);
    }
    Ok(width)
}

/// Glyph outline in font units, y up.
fn glyph_path(font: &FontRef<'static>, id: GlyphId) -> Option<Path> {
    let outline = font.outline(id)?;
    let mut pb = PathBuilder::new();
    let mut last = None;

    for curve in &outline.curves {
        let (start, end) = match *curve {
            OutlineCurve::Line(a, b) => (a, b),
            OutlineCurve::Quad(a, _, b) => (a, b),
            OutlineCurve::Cubic(a, _, _, b) => (a, b),
        };
        // a new contour starts wherever the previous curve did not end
        if last != Some(start) {
            pb.move_to(start.x, start.y);
        }
        match *curve {
            OutlineCurve::Line(_, b) => pb.line_to(b.x, b.y),
            OutlineCurve::Quad(_, c, b) => pb.quad_to(c.x, c.y, b.x, b.y),
            OutlineCurve::Cubic(_, c1, c2, b) => pb.cubic_to(c1.x, c1.y, c2.x, c2.y, b.x, b.y),
        }
        last = Some(end);
    }

    pb.finish()
}

/// Fill `text` with its baseline starting at `origin`.
pub(crate) fn draw_text(
    pixmap: &mut Pixmap,
    text: &str,
    origin: (f32, f32),
    size_px: f32,
    orientation: Orientation,
    paint: &Paint,
) -> Result<(), RenderError> {
    let font = label_font()?;
    let scaled = font.as_scaled(PxScale::from(size_px));
    let (sx, sy) = (scaled.h_scale_factor(), scaled.v_scale_factor());

    let base = match orientation {
        Orientation::Horizontal => Transform::from_translate(origin.0, origin.1),
        Orientation::Vertical => Transform::from_translate(origin.0, origin.1).pre_rotate(-90.0),
    };

    let mut caret = 0.0;
    let mut prev: Option<GlyphId> = None;
    for c in text.chars() {
        let id = font.glyph_id(c);
        if let Some(prev) = prev {
            caret += scaled.kern(prev, id);
        }
        if let Some(path) = glyph_path(font, id) {
            let transform = base.pre_translate(caret, 0.0).pre_scale(sx, -sy);
            pixmap.fill_path(&path, paint, FillRule::Winding, transform, None);
        }
        caret += scaled.h_advance(id);
        prev = Some(id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiny_skia::Color;

    fn black() -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color_rgba8(0, 0, 0, 255);
        paint
    }

    fn dark_pixels(pixmap: &Pixmap, x0: u32, y0: u32, x1: u32, y1: u32) -> usize {
        let mut count = 0;
        for y in y0..y1 {
            for x in x0..x1 {
                if let Some(p) = pixmap.pixel(x, y) {
                    if p.demultiply().red() < 128 {
                        count += 1;
                    }
                }
            }
        }
        count
    }

    #[test]
    fn test_embedded_font_loads() {
        let metrics = line_metrics(12.0).unwrap();
        assert!(metrics.ascent > 0.0);
        assert!(metrics.descent < 0.0);
    }

    #[test]
    fn test_text_width_grows_with_text() {
        let short = text_width("K2", 11.0).unwrap();
        let long = text_width("K2C9 Observations", 11.0).unwrap();
        assert!(short > 0.0);
        assert!(long > short * 4.0);
        assert_eq!(text_width("", 11.0).unwrap(), 0.0);
    }

    #[test]
    fn test_horizontal_text_lands_right_of_origin() {
        let mut pixmap = Pixmap::new(120, 40).unwrap();
        pixmap.fill(Color::WHITE);
        draw_text(&mut pixmap, "Label", (10.0, 25.0), 14.0, Orientation::Horizontal, &black())
            .unwrap();

        assert!(dark_pixels(&pixmap, 10, 10, 60, 26) > 20);
        assert_eq!(dark_pixels(&pixmap, 0, 0, 9, 40), 0);
        assert_eq!(dark_pixels(&pixmap, 70, 0, 120, 40), 0);
    }

    #[test]
    fn test_vertical_text_runs_upward() {
        let mut pixmap = Pixmap::new(40, 120).unwrap();
        pixmap.fill(Color::WHITE);
        draw_text(&mut pixmap, "Label", (25.0, 110.0), 14.0, Orientation::Vertical, &black())
            .unwrap();

        // glyphs sit left of the baseline and above the origin
        assert!(dark_pixels(&pixmap, 10, 60, 26, 110) > 20);
        assert_eq!(dark_pixels(&pixmap, 0, 111, 40, 120), 0);
        assert_eq!(dark_pixels(&pixmap, 28, 0, 40, 120), 0);
    }
}
