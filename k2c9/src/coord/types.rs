//! Core coordinate types.

use std::fmt;

use thiserror::Error;

use super::sexagesimal::{format_dms, format_hms};

/// Minimum declination in degrees.
pub const MIN_DEC: f64 = -90.0;

/// Maximum declination in degrees.
pub const MAX_DEC: f64 = 90.0;

/// Full circle of right ascension in degrees.
pub const FULL_CIRCLE_DEG: f64 = 360.0;

/// Degrees of right ascension per hour.
pub const DEG_PER_HOUR: f64 = 15.0;

/// Errors produced while building or parsing a sky position.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    /// Declination outside [-90, 90].
    #[error("Invalid declination: {0} (must be between -90 and 90)")]
    InvalidDeclination(f64),

    /// A coordinate value was NaN or infinite.
    #[error("Non-finite coordinate value")]
    NonFinite,

    /// The raw token could not be parsed under any interpretation.
    #[error("Malformed coordinate '{token}': {reason}")]
    Malformed { token: String, reason: String },
}

/// A normalized equatorial sky position.
///
/// Right ascension is always in `[0, 360)` and declination in `[-90, 90]`.
/// The only way to build one is [`Position::new`], which enforces both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    ra_deg: f64,
    dec_deg: f64,
}

impl Position {
    /// Create a position from degrees, wrapping right ascension into `[0, 360)`.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError::NonFinite`] for NaN/infinite input and
    /// [`CoordError::InvalidDeclination`] when the declination is out of range.
    pub fn new(ra_deg: f64, dec_deg: f64) -> Result<Self, CoordError> {
        if !ra_deg.is_finite() || !dec_deg.is_finite() {
            return Err(CoordError::NonFinite);
        }
        if !(MIN_DEC..=MAX_DEC).contains(&dec_deg) {
            return Err(CoordError::InvalidDeclination(dec_deg));
        }

        let mut ra = ra_deg.rem_euclid(FULL_CIRCLE_DEG);
        // rem_euclid can round up to exactly 360.0 for tiny negative inputs
        if ra >= FULL_CIRCLE_DEG {
            ra = 0.0;
        }

        Ok(Self {
            ra_deg: ra,
            dec_deg,
        })
    }

    /// Right ascension in degrees.
    #[inline]
    pub fn ra_deg(&self) -> f64 {
        self.ra_deg
    }

    /// Declination in degrees.
    #[inline]
    pub fn dec_deg(&self) -> f64 {
        self.dec_deg
    }

    /// Right ascension in hours.
    #[inline]
    pub fn ra_hours(&self) -> f64 {
        self.ra_deg / DEG_PER_HOUR
    }

    /// Sexagesimal form, e.g. `18h04m00.00s -30d00m00.0s`.
    pub fn to_hmsdms(&self) -> String {
        format!("{} {}", format_hms(self.ra_hours()), format_dms(self.dec_deg))
    }

    /// Decimal degrees form, e.g. `271.0000 -30.0000`.
    pub fn to_decimal(&self) -> String {
        format!("{:.4} {:.4}", self.ra_deg, self.dec_deg)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_wraps_right_ascension() {
        let pos = Position::new(-90.0, 10.0).unwrap();
        assert!((pos.ra_deg() - 270.0).abs() < 1e-12);

        let pos = Position::new(720.5, 10.0).unwrap();
        assert!((pos.ra_deg() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_position_tiny_negative_ra_wraps_to_zero() {
        let pos = Position::new(-1e-18, 0.0).unwrap();
        assert!(pos.ra_deg() >= 0.0 && pos.ra_deg() < FULL_CIRCLE_DEG);
    }

    #[test]
    fn test_position_rejects_out_of_range_declination() {
        assert!(matches!(
            Position::new(10.0, 90.5),
            Err(CoordError::InvalidDeclination(_))
        ));
        assert!(Position::new(10.0, -90.0).is_ok());
    }

    #[test]
    fn test_position_rejects_nan() {
        assert_eq!(Position::new(f64::NAN, 0.0), Err(CoordError::NonFinite));
        assert_eq!(
            Position::new(0.0, f64::INFINITY),
            Err(CoordError::NonFinite)
        );
    }

    #[test]
    fn test_decimal_string() {
        let pos = Position::new(271.0, -30.0).unwrap();
        assert_eq!(pos.to_decimal(), "271.0000 -30.0000");
        assert_eq!(pos.to_string(), "271.0000 -30.0000");
    }

    #[test]
    fn test_hmsdms_string() {
        let pos = Position::new(271.0, -30.0).unwrap();
        assert_eq!(pos.to_hmsdms(), "18h04m00.00s -30d00m00.0s");

        let pos = Position::new(270.0, 28.5).unwrap();
        assert_eq!(pos.to_hmsdms(), "18h00m00.00s +28d30m00.0s");
    }
}
