//! Footprint map rendering.
//!
//! Draws the fixed footprint outline, overlays query positions as `+`
//! markers, adds a labelled legend and axes, and encodes the result as an
//! image. Text is rasterised from a font embedded in the crate.
//!
//! # Pipeline
//!
//! ```text
//! RenderRequest ──► ViewWindow::resolve ──► PlotSurface::new (fresh pixmap)
//!                                              │
//!        channels ─► superstamp ─► frame ─► markers ─► legend
//!                                              │
//!                                   PlotSurface::encode ──► bytes
//! ```
//!
//! Every render allocates its own surface and consumes it when encoding, so
//! a single [`FootprintRenderer`] can be shared between threads.

mod legend;
mod surface;
mod text;
mod view;

pub use legend::{Legend, LegendEntry, LegendGlyph, POSITION_LABEL};
pub use view::{ViewWindow, DEFAULT_VIEW_PAD_DEG};

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::debug;

use crate::coord::Position;
use crate::footprint::Footprint;
use surface::{PlotSurface, CHANNEL_STYLE, SUPERSTAMP_STYLE};

/// Default image width in pixels.
pub const DEFAULT_WIDTH: u32 = 640;

/// Default image height in pixels.
pub const DEFAULT_HEIGHT: u32 = 480;

/// Default marker size in pixels.
pub const DEFAULT_MARKER_SIZE_PX: f32 = 14.0;

/// Errors that can occur while rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The requested view size is not a positive finite number.
    #[error("Invalid view size: {0} (must be a positive number of degrees)")]
    InvalidViewSize(f64),

    /// The plotting surface could not be allocated at this size.
    #[error("Cannot allocate a {width}x{height} plotting surface")]
    SurfaceAllocation { width: u32, height: u32 },

    /// The embedded label font could not be parsed.
    #[error("Label font could not be loaded: {0}")]
    Font(#[from] ab_glyph::InvalidFont),

    /// Image encoding failed.
    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Raster encoding for rendered images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageEncoding {
    #[default]
    Png,
    Jpeg,
}

impl ImageEncoding {
    /// MIME type for the encoding.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageEncoding::Png => "image/png",
            ImageEncoding::Jpeg => "image/jpeg",
        }
    }

    /// Conventional file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageEncoding::Png => "png",
            ImageEncoding::Jpeg => "jpg",
        }
    }
}

impl fmt::Display for ImageEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageEncoding::Png => f.write_str("png"),
            ImageEncoding::Jpeg => f.write_str("jpeg"),
        }
    }
}

impl FromStr for ImageEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(ImageEncoding::Png),
            "jpeg" | "jpg" => Ok(ImageEncoding::Jpeg),
            other => Err(format!("unknown image format '{}'", other)),
        }
    }
}

/// Image settings for the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub encoding: ImageEncoding,
    pub marker_size_px: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            encoding: ImageEncoding::Png,
            marker_size_px: DEFAULT_MARKER_SIZE_PX,
        }
    }
}

impl RenderConfig {
    /// Set the image size in pixels.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the output encoding.
    pub fn with_encoding(mut self, encoding: ImageEncoding) -> Self {
        self.encoding = encoding;
        self
    }
}

/// Positions to overlay and an optional view size around them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderRequest {
    pub positions: Vec<Position>,
    pub view_size_deg: Option<f64>,
}

impl RenderRequest {
    pub fn new(positions: Vec<Position>, view_size_deg: Option<f64>) -> Self {
        Self {
            positions,
            view_size_deg,
        }
    }
}

/// Renders footprint maps.
#[derive(Clone)]
pub struct FootprintRenderer {
    footprint: Arc<dyn Footprint>,
    config: RenderConfig,
}

impl FootprintRenderer {
    pub fn new(footprint: Arc<dyn Footprint>, config: RenderConfig) -> Self {
        Self { footprint, config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn footprint_name(&self) -> &str {
        self.footprint.name()
    }

    /// Legend that a render of `positions` would show.
    pub fn legend(&self, positions: &[Position]) -> Legend {
        Legend::for_positions(positions, self.footprint.name())
    }

    /// Sky window that a render of `request` would show.
    pub fn view_window(&self, request: &RenderRequest) -> Result<ViewWindow, RenderError> {
        ViewWindow::resolve(
            self.footprint.outline().bounds,
            &request.positions,
            request.view_size_deg,
        )
    }

    /// Render the footprint with the request's positions and return image bytes.
    pub fn render(&self, request: &RenderRequest) -> Result<Vec<u8>, RenderError> {
        let start = Instant::now();
        let view = self.view_window(request)?;
        let legend = self.legend(&request.positions);

        let mut surface = PlotSurface::new(self.config.width, self.config.height, view)?;

        let outline = self.footprint.outline();
        for channel in &outline.channels {
            surface.draw_polygon(channel, &CHANNEL_STYLE);
        }
        for stamp in &outline.superstamp {
            surface.draw_polygon(stamp, &SUPERSTAMP_STYLE);
        }
        surface.draw_frame()?;

        for position in &request.positions {
            surface.draw_marker(
                position.ra_deg(),
                position.dec_deg(),
                self.config.marker_size_px,
            );
        }
        surface.draw_legend(&legend, self.config.marker_size_px)?;

        let bytes = surface.encode(self.config.encoding)?;

        debug!(
            positions = request.positions.len(),
            legend_entries = legend.len(),
            ra_bounds = ?view.ra_bounds(),
            dec_bounds = ?view.dec_bounds(),
            bytes = bytes.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Rendered footprint"
        );

        Ok(bytes)
    }
}

impl fmt::Debug for FootprintRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FootprintRenderer")
            .field("footprint", &self.footprint.name())
            .field("config", &self.config)
            .finish()
    }
}
