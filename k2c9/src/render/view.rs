//! Visible sky window for the footprint plot.
//!
//! Sky plots put right ascension increasing to the LEFT, so the window's
//! RA bounds are stored as (left, right) with left normally the larger value.

use crate::coord::Position;

use super::RenderError;

/// Padding in degrees added around the footprint for the default view.
pub const DEFAULT_VIEW_PAD_DEG: f64 = 0.5;

/// Sky window mapped onto the plot area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewWindow {
    /// RA at the left edge of the plot.
    pub ra_left: f64,
    /// RA at the right edge of the plot.
    pub ra_right: f64,
    /// Dec at the bottom edge of the plot.
    pub dec_bottom: f64,
    /// Dec at the top edge of the plot.
    pub dec_top: f64,
}

impl ViewWindow {
    /// Window covering a bounding box plus `pad` degrees on every side.
    ///
    /// `bounds` is (min_ra, max_ra, min_dec, max_dec).
    pub fn from_bounds(bounds: (f64, f64, f64, f64), pad: f64) -> Self {
        let (min_ra, max_ra, min_dec, max_dec) = bounds;
        Self {
            ra_left: max_ra + pad,
            ra_right: min_ra - pad,
            dec_bottom: min_dec - pad,
            dec_top: max_dec + pad,
        }
    }

    /// Window spanning the given positions plus half of `size_deg` on each side.
    ///
    /// Returns `None` when there are no positions.
    pub fn around(positions: &[Position], size_deg: f64) -> Option<Self> {
        if positions.is_empty() {
            return None;
        }

        let half = size_deg / 2.0;
        let (min_ra, max_ra, min_dec, max_dec) = positions.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
            |(a, b, c, d), p| {
                (
                    a.min(p.ra_deg()),
                    b.max(p.ra_deg()),
                    c.min(p.dec_deg()),
                    d.max(p.dec_deg()),
                )
            },
        );

        Some(Self {
            ra_left: max_ra + half,
            ra_right: min_ra - half,
            dec_bottom: min_dec - half,
            dec_top: max_dec + half,
        })
    }

    /// Choose the window for a render request.
    ///
    /// The window only follows the positions when both positions and a view
    /// size are given; otherwise the full footprint view is used. A size so
    /// small that it vanishes next to the coordinates, or so large that the
    /// window overflows, is rejected.
    pub fn resolve(
        footprint_bounds: (f64, f64, f64, f64),
        positions: &[Position],
        view_size_deg: Option<f64>,
    ) -> Result<Self, RenderError> {
        if let Some(size) = view_size_deg {
            if !size.is_finite() || size <= 0.0 {
                return Err(RenderError::InvalidViewSize(size));
            }
            if let Some(window) = Self::around(positions, size) {
                return if window.has_area() {
                    Ok(window)
                } else {
                    Err(RenderError::InvalidViewSize(size))
                };
            }
        }
        Ok(Self::from_bounds(footprint_bounds, DEFAULT_VIEW_PAD_DEG))
    }

    /// Both axes span a positive, finite number of degrees.
    pub fn has_area(&self) -> bool {
        let ra_span = self.ra_left - self.ra_right;
        let dec_span = self.dec_top - self.dec_bottom;
        ra_span.is_finite() && dec_span.is_finite() && ra_span > 0.0 && dec_span > 0.0
    }

    /// RA axis limits as (left, right).
    pub fn ra_bounds(&self) -> (f64, f64) {
        (self.ra_left, self.ra_right)
    }

    /// Dec axis limits as (bottom, top).
    pub fn dec_bounds(&self) -> (f64, f64) {
        (self.dec_bottom, self.dec_top)
    }

    /// Fraction across the plot (0 = left, 1 = right) for a right ascension.
    pub fn x_fraction(&self, ra_deg: f64) -> f64 {
        (self.ra_left - ra_deg) / (self.ra_left - self.ra_right)
    }

    /// Fraction down the plot (0 = top, 1 = bottom) for a declination.
    pub fn y_fraction(&self, dec_deg: f64) -> f64 {
        (self.dec_top - dec_deg) / (self.dec_top - self.dec_bottom)
    }
}
