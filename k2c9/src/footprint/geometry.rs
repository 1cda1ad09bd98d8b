//! Polygon geometry and footprint loading.

use std::path::Path;

use serde::Deserialize;

use super::{Footprint, FootprintError, FootprintOutline};
use crate::coord::{MAX_DEC, MIN_DEC};

/// A closed polygon on the sky, vertices as (ra_deg, dec_deg).
///
/// The closing edge from the last vertex back to the first is implicit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Polygon {
    vertices: Vec<(f64, f64)>,
}

impl Polygon {
    /// Create a polygon, checking it has at least three valid vertices.
    pub fn new(vertices: Vec<(f64, f64)>) -> Result<Self, FootprintError> {
        let polygon = Self { vertices };
        polygon.validate("polygon")?;
        Ok(polygon)
    }

    /// Vertices in drawing order.
    pub fn vertices(&self) -> &[(f64, f64)] {
        &self.vertices
    }

    /// Even-odd ray casting test in the (ra, dec) plane.
    ///
    /// Points exactly on an edge may land on either side.
    pub fn contains(&self, ra_deg: f64, dec_deg: f64) -> bool {
        let mut inside = false;
        let n = self.vertices.len();
        let mut j = n - 1;

        for i in 0..n {
            let (xi, yi) = self.vertices[i];
            let (xj, yj) = self.vertices[j];
            if (yi > dec_deg) != (yj > dec_deg) {
                let x_cross = (xj - xi) * (dec_deg - yi) / (yj - yi) + xi;
                if ra_deg < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }

        inside
    }

    /// Bounding box as (min_ra, max_ra, min_dec, max_dec).
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.vertices.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
            |(min_ra, max_ra, min_dec, max_dec), &(ra, dec)| {
                (min_ra.min(ra), max_ra.max(ra), min_dec.min(dec), max_dec.max(dec))
            },
        )
    }

    fn validate(&self, name: &str) -> Result<(), FootprintError> {
        if self.vertices.len() < 3 {
            return Err(FootprintError::Malformed(format!(
                "{} has {} vertices, need at least 3",
                name,
                self.vertices.len()
            )));
        }
        for &(ra, dec) in &self.vertices {
            if !ra.is_finite() || !dec.is_finite() {
                return Err(FootprintError::Malformed(format!(
                    "{} has a non-finite vertex",
                    name
                )));
            }
            if !(MIN_DEC..=MAX_DEC).contains(&dec) {
                return Err(FootprintError::Malformed(format!(
                    "{} has vertex declination {} out of range",
                    name, dec
                )));
            }
        }
        Ok(())
    }
}

/// A named superstamp region.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Superstamp {
    pub name: String,
    #[serde(flatten)]
    pub polygon: Polygon,
}

/// One detector channel outline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Channel {
    /// CCD module number.
    pub module: u32,
    /// Output within the module (1-4).
    pub output: u32,
    /// Global channel number.
    pub channel: u32,
    #[serde(flatten)]
    pub polygon: Polygon,
}

/// Fixed footprint: superstamp regions plus detector channel outlines.
///
/// Membership is tested against the superstamp polygons only. Channels
/// are there to be drawn as context.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FootprintGeometry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub superstamp: Vec<Superstamp>,
    #[serde(default)]
    pub channels: Vec<Channel>,
}

impl FootprintGeometry {
    /// Parse and validate a footprint from JSON text.
    pub fn from_json(text: &str) -> Result<Self, FootprintError> {
        let geometry: FootprintGeometry =
            serde_json::from_str(text).map_err(|e| FootprintError::Parse(e.to_string()))?;
        geometry.validate()?;
        Ok(geometry)
    }

    /// Load a footprint from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, FootprintError> {
        let text = std::fs::read_to_string(path).map_err(|e| FootprintError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json(&text)
    }

    /// Bounding box of every drawable polygon as (min_ra, max_ra, min_dec, max_dec).
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.superstamp
            .iter()
            .map(|s| &s.polygon)
            .chain(self.channels.iter().map(|c| &c.polygon))
            .map(Polygon::bounds)
            .fold(
                (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
                |acc, b| (acc.0.min(b.0), acc.1.max(b.1), acc.2.min(b.2), acc.3.max(b.3)),
            )
    }

    fn validate(&self) -> Result<(), FootprintError> {
        if self.superstamp.is_empty() {
            return Err(FootprintError::Malformed(
                "footprint has no superstamp polygons".to_string(),
            ));
        }
        for stamp in &self.superstamp {
            stamp
                .polygon
                .validate(&format!("superstamp '{}'", stamp.name))?;
        }
        for channel in &self.channels {
            channel
                .polygon
                .validate(&format!("channel {}", channel.channel))?;
        }
        Ok(())
    }
}

impl Footprint for FootprintGeometry {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_in_region(&self, ra_deg: f64, dec_deg: f64) -> bool {
        self.superstamp
            .iter()
            .any(|s| s.polygon.contains(ra_deg, dec_deg))
    }

    fn outline(&self) -> FootprintOutline<'_> {
        FootprintOutline {
            superstamp: self.superstamp.iter().map(|s| &s.polygon).collect(),
            channels: self.channels.iter().map(|c| &c.polygon).collect(),
            bounds: self.bounds(),
        }
    }
}
