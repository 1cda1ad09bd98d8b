//! Per-call raster plotting surface.
//!
//! A `PlotSurface` owns its pixmap and clip mask. It is created for a single
//! render and consumed by [`PlotSurface::encode`], so nothing drawn in one
//! call can leak into the next.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbaImage};
use tiny_skia::{
    Color, FillRule, Mask, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, Transform,
};

use super::legend::{Legend, LegendGlyph};
use super::text::{draw_text, line_metrics, text_width, Orientation};
use super::view::ViewWindow;
use super::{ImageEncoding, RenderError};
use crate::footprint::Polygon;

/// Space around the plot area, in pixels: left, right, top, bottom.
const MARGINS: (f32, f32, f32, f32) = (64.0, 16.0, 40.0, 48.0);

/// Length of axis tick marks in pixels.
const TICK_LENGTH: f32 = 6.0;

/// Upper bound on ticks per axis.
const MAX_TICKS: f64 = 8.0;

/// Candidate tick spacings in degrees.
const TICK_STEPS: [f64; 12] = [0.1, 0.2, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 30.0, 45.0, 90.0];

/// Legend swatch size in pixels.
const LEGEND_SWATCH: f32 = 14.0;
/// Gap between a legend swatch and its label.
const LEGEND_LABEL_GAP: f32 = 6.0;
/// Gap between one legend label and the next swatch.
const LEGEND_ENTRY_GAP: f32 = 24.0;

/// Font sizes in pixels.
const TICK_FONT_PX: f32 = 10.0;
const LABEL_FONT_PX: f32 = 12.0;

/// Gap between tick labels and the frame.
const TICK_LABEL_GAP: f32 = 4.0;
/// Distance of axis titles from the image edge.
const TITLE_INSET: f32 = 4.0;

pub(crate) const RA_AXIS_TITLE: &str = "RA [deg]";
pub(crate) const DEC_AXIS_TITLE: &str = "Dec [deg]";

/// Fill and stroke colours for one kind of polygon.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PolygonStyle {
    pub fill: [u8; 4],
    pub stroke: [u8; 4],
    pub stroke_width: f32,
}

pub(crate) const CHANNEL_STYLE: PolygonStyle = PolygonStyle {
    fill: [200, 200, 200, 90],
    stroke: [110, 110, 110, 255],
    stroke_width: 1.0,
};

pub(crate) const SUPERSTAMP_STYLE: PolygonStyle = PolygonStyle {
    fill: [31, 119, 180, 170],
    stroke: [31, 119, 180, 255],
    stroke_width: 1.5,
};

const MARKER_COLOR: [u8; 4] = [0, 0, 0, 255];
const MARKER_STROKE_WIDTH: f32 = 2.5;

fn paint(rgba: [u8; 4]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgba[0], rgba[1], rgba[2], rgba[3]);
    paint.anti_alias = true;
    paint
}

fn stroke(width: f32) -> Stroke {
    Stroke {
        width,
        ..Stroke::default()
    }
}

/// Pick a tick spacing that yields at most [`MAX_TICKS`] ticks over `span`.
///
/// Spans wider than the largest table step get a power-of-ten step.
pub(crate) fn tick_step(span: f64) -> f64 {
    let span = span.abs();
    if let Some(step) = TICK_STEPS.iter().copied().find(|step| span / step <= MAX_TICKS) {
        return step;
    }
    let step = 10f64.powf((span / MAX_TICKS).log10().ceil());
    if step.is_finite() {
        step
    } else {
        f64::MAX
    }
}

/// Tick values inside `[lo, hi]` (either order) at multiples of `step`.
///
/// Returns nothing when the range would need more than twice [`MAX_TICKS`]
/// ticks or cannot be indexed.
pub(crate) fn tick_values(a: f64, b: f64, step: f64) -> Vec<f64> {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let first = (lo / step).ceil();
    let last = (hi / step).floor();
    if !first.is_finite() || !last.is_finite() || last - first > 2.0 * MAX_TICKS {
        return Vec::new();
    }
    (first as i64..=last as i64).map(|i| i as f64 * step).collect()
}

/// Tick label text: at most two decimals, no trailing zeros, no `-0`.
pub(crate) fn tick_label(value: f64) -> String {
    let mut text = format!("{:.2}", value);
    if text.contains('.') {
        text.truncate(text.trim_end_matches('0').trim_end_matches('.').len());
    }
    if text == "-0" {
        text.remove(0);
    }
    text
}

/// Where one legend entry is drawn.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LegendSlot {
    /// Left edge of the swatch.
    pub swatch_x: f32,
    /// Left edge of the label.
    pub label_x: f32,
}

pub(crate) struct PlotSurface {
    pixmap: Pixmap,
    area: Rect,
    clip: Mask,
    view: ViewWindow,
}

impl PlotSurface {
    /// Allocate a surface of `width` x `height` pixels showing `view`.
    pub fn new(width: u32, height: u32, view: ViewWindow) -> Result<Self, RenderError> {
        let alloc_err = || RenderError::SurfaceAllocation { width, height };

        let (left, right, top, bottom) = MARGINS;
        let area = Rect::from_xywh(
            left,
            top,
            width as f32 - left - right,
            height as f32 - top - bottom,
        )
        .ok_or_else(alloc_err)?;

        let mut pixmap = Pixmap::new(width, height).ok_or_else(alloc_err)?;
        pixmap.fill(Color::WHITE);

        let mut clip = Mask::new(width, height).ok_or_else(alloc_err)?;
        clip.fill_path(
            &PathBuilder::from_rect(area),
            FillRule::Winding,
            false,
            Transform::identity(),
        );

        Ok(Self {
            pixmap,
            area,
            clip,
            view,
        })
    }

    /// Pixel coordinates for a sky position.
    pub fn to_pixel(&self, ra_deg: f64, dec_deg: f64) -> (f32, f32) {
        let x = self.area.left() + self.view.x_fraction(ra_deg) as f32 * self.area.width();
        let y = self.area.top() + self.view.y_fraction(dec_deg) as f32 * self.area.height();
        (x, y)
    }

    fn polygon_path(&self, polygon: &Polygon) -> Option<Path> {
        let mut pb = PathBuilder::new();
        for (i, &(ra, dec)) in polygon.vertices().iter().enumerate() {
            let (x, y) = self.to_pixel(ra, dec);
            if i == 0 {
                pb.move_to(x, y);
            } else {
                pb.line_to(x, y);
            }
        }
        pb.close();
        pb.finish()
    }

    /// Fill and outline a polygon, clipped to the plot area.
    pub fn draw_polygon(&mut self, polygon: &Polygon, style: &PolygonStyle) {
        let Some(path) = self.polygon_path(polygon) else {
            return;
        };
        self.pixmap.fill_path(
            &path,
            &paint(style.fill),
            FillRule::EvenOdd,
            Transform::identity(),
            Some(&self.clip),
        );
        self.pixmap.stroke_path(
            &path,
            &paint(style.stroke),
            &stroke(style.stroke_width),
            Transform::identity(),
            Some(&self.clip),
        );
    }

    fn plus_path(x: f32, y: f32, half: f32) -> Option<Path> {
        let mut pb = PathBuilder::new();
        pb.move_to(x - half, y);
        pb.line_to(x + half, y);
        pb.move_to(x, y - half);
        pb.line_to(x, y + half);
        pb.finish()
    }

    /// Draw a `+` marker at a sky position, clipped to the plot area.
    pub fn draw_marker(&mut self, ra_deg: f64, dec_deg: f64, size_px: f32) {
        let (x, y) = self.to_pixel(ra_deg, dec_deg);
        if let Some(path) = Self::plus_path(x, y, size_px / 2.0) {
            self.pixmap.stroke_path(
                &path,
                &paint(MARKER_COLOR),
                &stroke(MARKER_STROKE_WIDTH),
                Transform::identity(),
                Some(&self.clip),
            );
        }
    }

    /// Draw the axes frame with inward tick marks on all four sides, tick
    /// labels on the bottom and left, and both axis titles.
    pub fn draw_frame(&mut self) -> Result<(), RenderError> {
        let black = paint([0, 0, 0, 255]);
        let frame = PathBuilder::from_rect(self.area);
        self.pixmap
            .stroke_path(&frame, &black, &stroke(1.0), Transform::identity(), None);

        let (ra_left, ra_right) = self.view.ra_bounds();
        let (dec_bottom, dec_top) = self.view.dec_bounds();
        let (top, bottom) = (self.area.top(), self.area.bottom());
        let (left, right) = (self.area.left(), self.area.right());

        let tick_metrics = line_metrics(TICK_FONT_PX)?;
        let mut pb = PathBuilder::new();

        for ra in tick_values(ra_left, ra_right, tick_step(ra_left - ra_right)) {
            let (x, _) = self.to_pixel(ra, dec_bottom);
            pb.move_to(x, bottom);
            pb.line_to(x, bottom - TICK_LENGTH);
            pb.move_to(x, top);
            pb.line_to(x, top + TICK_LENGTH);

            let label = tick_label(ra);
            let width = text_width(&label, TICK_FONT_PX)?;
            let baseline = bottom + TICK_LABEL_GAP + tick_metrics.ascent;
            draw_text(
                &mut self.pixmap,
                &label,
                (x - width / 2.0, baseline),
                TICK_FONT_PX,
                Orientation::Horizontal,
                &black,
            )?;
        }
        for dec in tick_values(dec_bottom, dec_top, tick_step(dec_top - dec_bottom)) {
            let (_, y) = self.to_pixel(ra_left, dec);
            pb.move_to(left, y);
            pb.line_to(left + TICK_LENGTH, y);
            pb.move_to(right, y);
            pb.line_to(right - TICK_LENGTH, y);

            let label = tick_label(dec);
            let width = text_width(&label, TICK_FONT_PX)?;
            let baseline = y + (tick_metrics.ascent + tick_metrics.descent) / 2.0;
            draw_text(
                &mut self.pixmap,
                &label,
                (left - TICK_LABEL_GAP - width, baseline),
                TICK_FONT_PX,
                Orientation::Horizontal,
                &black,
            )?;
        }
        if let Some(ticks) = pb.finish() {
            self.pixmap
                .stroke_path(&ticks, &black, &stroke(1.0), Transform::identity(), None);
        }

        let title_metrics = line_metrics(LABEL_FONT_PX)?;
        let height = self.pixmap.height() as f32;

        let width = text_width(RA_AXIS_TITLE, LABEL_FONT_PX)?;
        draw_text(
            &mut self.pixmap,
            RA_AXIS_TITLE,
            (
                self.area.left() + (self.area.width() - width) / 2.0,
                height - TITLE_INSET + title_metrics.descent,
            ),
            LABEL_FONT_PX,
            Orientation::Horizontal,
            &black,
        )?;

        let width = text_width(DEC_AXIS_TITLE, LABEL_FONT_PX)?;
        draw_text(
            &mut self.pixmap,
            DEC_AXIS_TITLE,
            (
                TITLE_INSET + title_metrics.ascent,
                self.area.top() + (self.area.height() + width) / 2.0,
            ),
            LABEL_FONT_PX,
            Orientation::Vertical,
            &black,
        )
    }

    /// Top edge of the legend row.
    fn legend_top(&self) -> f32 {
        self.area.top() - LEGEND_SWATCH - 10.0
    }

    /// Lay out legend entries left to right, each label just after its swatch.
    pub fn legend_layout(&self, legend: &Legend) -> Result<Vec<LegendSlot>, RenderError> {
        let mut x = self.area.left() + 0.1 * self.area.width();
        let mut slots = Vec::with_capacity(legend.len());

        for entry in legend.entries() {
            let label_x = x + LEGEND_SWATCH + LEGEND_LABEL_GAP;
            let label_width = text_width(&entry.label, LABEL_FONT_PX)?;
            slots.push(LegendSlot {
                swatch_x: x,
                label_x,
            });
            x = label_x + label_width + LEGEND_ENTRY_GAP;
        }
        Ok(slots)
    }

    /// Draw the legend in a single row above the plot area.
    pub fn draw_legend(&mut self, legend: &Legend, marker_size_px: f32) -> Result<(), RenderError> {
        let y = self.legend_top();
        let metrics = line_metrics(LABEL_FONT_PX)?;
        let baseline = y + LEGEND_SWATCH / 2.0 + (metrics.ascent + metrics.descent) / 2.0;
        let black = paint([0, 0, 0, 255]);

        let slots = self.legend_layout(legend)?;
        for (entry, slot) in legend.entries().iter().zip(slots) {
            let x = slot.swatch_x;
            match entry.glyph {
                LegendGlyph::Marker => {
                    let half = (marker_size_px / 2.0).min(LEGEND_SWATCH / 2.0);
                    let (cx, cy) = (x + LEGEND_SWATCH / 2.0, y + LEGEND_SWATCH / 2.0);
                    if let Some(path) = Self::plus_path(cx, cy, half) {
                        self.pixmap.stroke_path(
                            &path,
                            &paint(MARKER_COLOR),
                            &stroke(MARKER_STROKE_WIDTH),
                            Transform::identity(),
                            None,
                        );
                    }
                }
                LegendGlyph::Patch => {
                    if let Some(rect) = Rect::from_xywh(x, y, LEGEND_SWATCH, LEGEND_SWATCH) {
                        self.pixmap.fill_rect(
                            rect,
                            &paint(SUPERSTAMP_STYLE.fill),
                            Transform::identity(),
                            None,
                        );
                    }
                }
            }
            draw_text(
                &mut self.pixmap,
                &entry.label,
                (slot.label_x, baseline),
                LABEL_FONT_PX,
                Orientation::Horizontal,
                &black,
            )?;
        }
        Ok(())
    }

    /// Encode the surface, consuming it.
    pub fn encode(self, encoding: ImageEncoding) -> Result<Vec<u8>, RenderError> {
        let (width, height) = (self.pixmap.width(), self.pixmap.height());

        let mut rgba = Vec::with_capacity(self.pixmap.pixels().len() * 4);
        for pixel in self.pixmap.pixels() {
            let c = pixel.demultiply();
            rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        let image = RgbaImage::from_raw(width, height, rgba)
            .ok_or(RenderError::SurfaceAllocation { width, height })?;

        let mut buf = Cursor::new(Vec::new());
        match encoding {
            ImageEncoding::Png => {
                DynamicImage::ImageRgba8(image).write_to(&mut buf, ImageFormat::Png)?
            }
            ImageEncoding::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(image).to_rgb8())
                .write_to(&mut buf, ImageFormat::Jpeg)?,
        }
        Ok(buf.into_inner())
    }

    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Position;
    use crate::render::POSITION_LABEL;

    fn view() -> ViewWindow {
        ViewWindow::from_bounds((0.0, 10.0, 0.0, 10.0), 0.0)
    }

    #[test]
    fn test_tick_step() {
        assert_eq!(tick_step(2.0), 0.25);
        assert_eq!(tick_step(14.0), 2.0);
        assert_eq!(tick_step(-14.0), 2.0);
        assert_eq!(tick_step(720.0), 90.0);
        assert!((tick_step(10_000.0) - 10_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_tick_count_is_bounded_for_huge_spans() {
        for span in [1e4, 1e12, 1e300] {
            let step = tick_step(span);
            let ticks = tick_values(span / 2.0, -span / 2.0, step);
            assert!(!ticks.is_empty(), "span {}", span);
            assert!(ticks.len() <= 2 * MAX_TICKS as usize + 1, "span {}", span);
        }
    }

    #[test]
    fn test_tick_values_refuses_unindexable_ranges() {
        assert!(tick_values(-f64::MAX, f64::MAX, 1.0).is_empty());
        assert!(tick_values(0.0, 1.0, 0.0).is_empty());
        assert!(tick_values(f64::NAN, 1.0, 1.0).is_empty());
        assert!(tick_values(0.0, 1.0, tick_step(f64::INFINITY)).len() <= 1);
    }

    #[test]
    fn test_tick_label() {
        assert_eq!(tick_label(270.0), "270");
        assert_eq!(tick_label(-28.5), "-28.5");
        assert_eq!(tick_label(0.25), "0.25");
        assert_eq!(tick_label(-0.0), "0");
        assert_eq!(tick_label(-0.001), "0");
    }

    #[test]
    fn test_tick_values_any_order() {
        assert_eq!(tick_values(271.5, 269.0, 1.0), vec![269.0, 270.0, 271.0]);
        assert_eq!(tick_values(-29.5, -27.0, 1.0), vec![-29.0, -28.0, -27.0]);
    }

    #[test]
    fn test_to_pixel_corners() {
        let surface = PlotSurface::new(200, 200, view()).unwrap();
        let (left, right, top, bottom) = MARGINS;

        // high RA maps to the left edge
        let (x, y) = surface.to_pixel(10.0, 10.0);
        assert!((x - left).abs() < 1e-3);
        assert!((y - top).abs() < 1e-3);

        let (x, y) = surface.to_pixel(0.0, 0.0);
        assert!((x - (200.0 - right)).abs() < 1e-3);
        assert!((y - (200.0 - bottom)).abs() < 1e-3);
    }

    #[test]
    fn test_too_small_surface_fails() {
        assert!(matches!(
            PlotSurface::new(20, 20, view()),
            Err(RenderError::SurfaceAllocation { .. })
        ));
    }

    #[test]
    fn test_polygon_fill_is_clipped_to_plot_area() {
        let mut surface = PlotSurface::new(200, 200, view()).unwrap();
        // covers the whole sky window and far beyond
        let huge = Polygon::new(vec![(-50.0, -50.0), (60.0, -50.0), (60.0, 60.0), (-50.0, 60.0)])
            .unwrap();
        surface.draw_polygon(&huge, &SUPERSTAMP_STYLE);

        // inside the plot area the fill shows, in the margin it does not
        assert_ne!(surface.pixel(100, 100), Some([255, 255, 255, 255]));
        assert_eq!(surface.pixel(5, 5), Some([255, 255, 255, 255]));
    }

    fn dark_pixels(surface: &PlotSurface, x0: f32, y0: f32, x1: f32, y1: f32) -> usize {
        let mut count = 0;
        for y in y0.floor() as u32..y1.ceil() as u32 {
            for x in x0.floor() as u32..x1.ceil() as u32 {
                if matches!(surface.pixel(x, y), Some([r, _, _, _]) if r < 128) {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn test_legend_labels_follow_swatches() {
        let mut surface = PlotSurface::new(480, 240, view()).unwrap();
        let legend = Legend::for_positions(&[Position::new(5.0, 5.0).unwrap()], "K2C9");
        let slots = surface.legend_layout(&legend).unwrap();
        assert_eq!(slots.len(), 2);

        let top = surface.legend_top();
        let bottom = top + LEGEND_SWATCH;
        for slot in &slots {
            assert!(slot.label_x > slot.swatch_x + LEGEND_SWATCH);
            assert_eq!(dark_pixels(&surface, slot.label_x, top, slot.label_x + 30.0, bottom), 0);
        }
        // the second swatch sits past the end of the first label
        let first_width = text_width(POSITION_LABEL, LABEL_FONT_PX).unwrap();
        assert!(slots[1].swatch_x > slots[0].label_x + first_width);

        surface.draw_legend(&legend, 14.0).unwrap();
        for slot in &slots {
            assert!(
                dark_pixels(&surface, slot.label_x, top, slot.label_x + 30.0, bottom) > 0,
                "no label text right of swatch at x={}",
                slot.swatch_x
            );
        }
    }

    #[test]
    fn test_frame_draws_tick_labels_and_titles() {
        let mut surface = PlotSurface::new(200, 200, view()).unwrap();
        let (left, right, top, bottom) = MARGINS;
        let area_bottom = 200.0 - bottom;

        surface.draw_frame().unwrap();

        // RA tick labels and title below the frame
        assert!(dark_pixels(&surface, left, area_bottom + 2.0, 200.0 - right, 200.0) > 0);
        // Dec tick labels left of the frame
        assert!(dark_pixels(&surface, 20.0, top, left - 1.0, area_bottom) > 0);
        // vertical Dec title hugging the left edge
        assert!(dark_pixels(&surface, 0.0, top, 18.0, area_bottom) > 0);
    }

    #[test]
    fn test_marker_is_drawn_black() {
        let mut surface = PlotSurface::new(200, 200, view()).unwrap();
        surface.draw_marker(5.0, 5.0, 12.0);
        let (x, y) = surface.to_pixel(5.0, 5.0);
        let [r, g, b, _] = surface.pixel(x as u32, y as u32).unwrap();
        assert!(r < 80 && g < 80 && b < 80);
    }
}
