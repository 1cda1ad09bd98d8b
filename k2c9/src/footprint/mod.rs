//! Observational footprint geometry.
//!
//! The footprint is a fixed set of sky polygons: the microlensing
//! superstamp, which defines the region positions are tested against, and
//! the detector channel outlines, which are only drawn for context.
//!
//! Callers talk to the geometry through the [`Footprint`] trait so the
//! query pipeline does not depend on where the polygons come from. The
//! built-in K2 Campaign 9 footprint is embedded in the binary, parsed once
//! on first use and then shared read-only for the rest of the process.
//!
//! # Example
//!
//! ```
//! use k2c9::footprint::{builtin, Footprint};
//!
//! let footprint = builtin().unwrap();
//! assert!(footprint.is_in_region(270.0, -28.0));
//! assert!(!footprint.is_in_region(0.0, 0.0));
//! ```

mod geometry;

pub use geometry::{Channel, FootprintGeometry, Polygon, Superstamp};

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use thiserror::Error;
use tracing::info;

/// Embedded K2 Campaign 9 footprint definition.
const K2C9_FOOTPRINT_JSON: &str = include_str!("../../data/k2c9_footprint.json");

/// Parsed built-in footprint, shared for the lifetime of the process.
static BUILTIN: OnceLock<Result<Arc<FootprintGeometry>, FootprintError>> = OnceLock::new();

/// Errors raised while loading or validating footprint geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FootprintError {
    /// The footprint file could not be read.
    #[error("Failed to read footprint file {path}: {message}")]
    Read { path: PathBuf, message: String },

    /// The footprint text is not valid JSON for a footprint.
    #[error("Failed to parse footprint: {0}")]
    Parse(String),

    /// The footprint parsed but its polygons are unusable.
    #[error("Malformed footprint geometry: {0}")]
    Malformed(String),
}

/// Drawable handles for a footprint's outline.
#[derive(Debug, Clone)]
pub struct FootprintOutline<'a> {
    /// Superstamp polygons (the region tested for membership).
    pub superstamp: Vec<&'a Polygon>,
    /// Detector channel polygons.
    pub channels: Vec<&'a Polygon>,
    /// Bounding box of all polygons as (min_ra, max_ra, min_dec, max_dec).
    pub bounds: (f64, f64, f64, f64),
}

/// Read-only footprint geometry engine.
///
/// Implementations must be safe to query from many threads at once.
pub trait Footprint: Send + Sync {
    /// Short name used in logs and legends.
    fn name(&self) -> &str;

    /// Returns true if (ra, dec) in degrees lies inside the observed region.
    fn is_in_region(&self, ra_deg: f64, dec_deg: f64) -> bool;

    /// Polygons to draw.
    fn outline(&self) -> FootprintOutline<'_>;
}

/// The built-in K2 Campaign 9 footprint.
///
/// Parsing happens once; every later call returns the same shared value.
pub fn builtin() -> Result<Arc<FootprintGeometry>, FootprintError> {
    BUILTIN
        .get_or_init(|| {
            let geometry = FootprintGeometry::from_json(K2C9_FOOTPRINT_JSON)?;
            info!(
                name = %geometry.name,
                superstamps = geometry.superstamp.len(),
                channels = geometry.channels.len(),
                "Loaded built-in footprint"
            );
            Ok(Arc::new(geometry))
        })
        .clone()
}

/// Load a footprint from `path`, or the built-in one when `path` is `None`.
pub fn load(path: Option<&Path>) -> Result<Arc<FootprintGeometry>, FootprintError> {
    match path {
        Some(path) => {
            let geometry = FootprintGeometry::from_file(path)?;
            info!(path = %path.display(), name = %geometry.name, "Loaded footprint file");
            Ok(Arc::new(geometry))
        }
        None => builtin(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_loads() {
        let footprint = builtin().unwrap();
        assert_eq!(footprint.name(), "K2C9");
        assert!(!footprint.superstamp.is_empty());
        assert_eq!(footprint.channels.len(), 84);
    }

    #[test]
    fn test_builtin_is_shared() {
        let a = builtin().unwrap();
        let b = builtin().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_builtin_membership() {
        let footprint = builtin().unwrap();
        assert!(footprint.is_in_region(270.0, -28.0));
        assert!(footprint.is_in_region(270.5, -28.2));
        assert!(!footprint.is_in_region(271.0, -30.0));
        assert!(!footprint.is_in_region(0.0, 0.0));
    }

    #[test]
    fn test_builtin_outline_bounds_cover_superstamp() {
        let footprint = builtin().unwrap();
        let outline = footprint.outline();
        let (min_ra, max_ra, min_dec, max_dec) = outline.bounds;
        for polygon in &outline.superstamp {
            let (a, b, c, d) = polygon.bounds();
            assert!(a >= min_ra && b <= max_ra && c >= min_dec && d <= max_dec);
        }
    }

    #[test]
    fn test_load_none_is_builtin() {
        let loaded = load(None).unwrap();
        assert!(Arc::ptr_eq(&loaded, &builtin().unwrap()));
    }

    #[test]
    fn test_footprint_is_usable_as_trait_object() {
        let footprint: Arc<dyn Footprint> = builtin().unwrap();
        assert!(footprint.is_in_region(270.0, -28.0));
    }
}
