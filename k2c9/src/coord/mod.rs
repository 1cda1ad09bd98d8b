//! Sky coordinate parsing.
//!
//! Converts one user-supplied position string into a normalized [`Position`].
//! The same pair of numbers can mean different things depending on notation,
//! so parsing walks an ordered list of [`ParseStrategy`] values and keeps the
//! first one that succeeds:
//!
//! ```text
//! raw ──► SelfDescribing ──► HourAngleSexagesimal (only if ':' present)
//!                        └─► DecimalDegrees       (only if no ':')
//! ```
//!
//! A colon is the only signal that separates sexagesimal hours from plain
//! degrees, so it decides which of the two fallbacks is eligible.
//!
//! # Example
//!
//! ```
//! use k2c9::coord::parse_position;
//!
//! let pos = parse_position("18:04:00 -30:00:00").unwrap();
//! assert!((pos.ra_deg() - 271.0).abs() < 1e-9);
//! assert!((pos.dec_deg() + 30.0).abs() < 1e-9);
//! ```

mod sexagesimal;
mod types;

pub use sexagesimal::{format_dms, format_hms, UnitValue};
pub use types::{CoordError, Position, DEG_PER_HOUR, FULL_CIRCLE_DEG, MAX_DEC, MIN_DEC};

use sexagesimal::{parse_fields, parse_with_units};
use tracing::debug;

/// One interpretation of a raw coordinate string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    /// Both components carry explicit units (`18h04m00s -30d00m00s`, `271.0deg -30deg`).
    SelfDescribing,
    /// Colon-separated sexagesimal: right ascension in hours, declination in degrees.
    HourAngleSexagesimal,
    /// Both components in degrees.
    DecimalDegrees,
}

/// Strategies in the order they are tried.
pub const PARSE_STRATEGIES: [ParseStrategy; 3] = [
    ParseStrategy::SelfDescribing,
    ParseStrategy::HourAngleSexagesimal,
    ParseStrategy::DecimalDegrees,
];

impl ParseStrategy {
    /// Whether this strategy should be attempted for the given input.
    pub fn applies_to(&self, raw: &str) -> bool {
        match self {
            ParseStrategy::SelfDescribing => true,
            ParseStrategy::HourAngleSexagesimal => raw.contains(':'),
            ParseStrategy::DecimalDegrees => !raw.contains(':'),
        }
    }

    /// Try to interpret `raw` under this strategy.
    ///
    /// The error string describes why this interpretation did not fit; it is
    /// only surfaced if every applicable strategy fails.
    pub fn attempt(&self, raw: &str) -> Result<Position, String> {
        let (ra_text, dec_text) = split_components(raw)?;

        let (ra_deg, dec_deg) = match self {
            ParseStrategy::SelfDescribing => {
                let ra = match parse_with_units(&ra_text)? {
                    UnitValue::Hours(h) => h * DEG_PER_HOUR,
                    UnitValue::Degrees(d) => d,
                };
                let dec = match parse_with_units(&dec_text)? {
                    UnitValue::Degrees(d) => d,
                    UnitValue::Hours(_) => {
                        return Err("declination cannot be given in hours".to_string())
                    }
                };
                (ra, dec)
            }
            ParseStrategy::HourAngleSexagesimal => {
                (parse_fields(&ra_text)? * DEG_PER_HOUR, parse_fields(&dec_text)?)
            }
            ParseStrategy::DecimalDegrees => (parse_fields(&ra_text)?, parse_fields(&dec_text)?),
        };

        Position::new(ra_deg, dec_deg).map_err(|e| e.to_string())
    }
}

/// Parse a single position string.
///
/// # Errors
///
/// Returns [`CoordError::Malformed`] naming the offending token when no
/// applicable strategy succeeds.
pub fn parse_position(raw: &str) -> Result<Position, CoordError> {
    parse_position_with_strategy(raw).map(|(pos, _)| pos)
}

/// Parse a single position string, also reporting which strategy matched.
pub fn parse_position_with_strategy(raw: &str) -> Result<(Position, ParseStrategy), CoordError> {
    let mut last_reason = String::from("empty coordinate");

    for strategy in PARSE_STRATEGIES {
        if !strategy.applies_to(raw) {
            continue;
        }
        match strategy.attempt(raw) {
            Ok(pos) => return Ok((pos, strategy)),
            Err(reason) => {
                debug!(token = %raw, ?strategy, %reason, "Coordinate strategy did not match");
                last_reason = reason;
            }
        }
    }

    Err(CoordError::Malformed {
        token: raw.to_string(),
        reason: last_reason,
    })
}

/// Split a coordinate string into right ascension and declination text.
///
/// - two whitespace fields: one per component
/// - six whitespace fields: three per component (`18 04 00 -30 00 00`)
/// - one field: split at an embedded sign (`18:04:00-30:00:00`)
fn split_components(raw: &str) -> Result<(String, String), String> {
    let parts: Vec<&str> = raw.split_whitespace().collect();

    match parts.len() {
        0 => Err("empty coordinate".to_string()),
        1 => split_at_sign(parts[0]),
        2 => Ok((parts[0].to_string(), parts[1].to_string())),
        6 => Ok((parts[..3].join(" "), parts[3..].join(" "))),
        n => Err(format!(
            "expected two coordinate components, found {} fields",
            n
        )),
    }
}

fn split_at_sign(text: &str) -> Result<(String, String), String> {
    let mut prev: Option<char> = None;
    for (idx, c) in text.char_indices() {
        if idx > 0 && (c == '+' || c == '-') && !matches!(prev, Some('e') | Some('E')) {
            let (ra, dec) = text.split_at(idx);
            return Ok((ra.to_string(), dec.to_string()));
        }
        prev = Some(c);
    }
    Err(format!("'{}' has only one coordinate component", text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(pos: &Position, ra: f64, dec: f64) {
        assert!(
            (pos.ra_deg() - ra).abs() < 1e-6,
            "ra {} != {}",
            pos.ra_deg(),
            ra
        );
        assert!(
            (pos.dec_deg() - dec).abs() < 1e-6,
            "dec {} != {}",
            pos.dec_deg(),
            dec
        );
    }

    #[test]
    fn test_bare_decimal_pair_is_degrees() {
        let (pos, strategy) = parse_position_with_strategy("270.0 -28.0").unwrap();
        assert_close(&pos, 270.0, -28.0);
        assert_eq!(strategy, ParseStrategy::DecimalDegrees);
    }

    #[test]
    fn test_colon_pair_is_hours_and_degrees() {
        let (pos, strategy) = parse_position_with_strategy("18:04:00 -30:00:00").unwrap();
        assert_close(&pos, 271.0, -30.0);
        assert_eq!(strategy, ParseStrategy::HourAngleSexagesimal);
    }

    #[test]
    fn test_colon_in_declination_only_still_means_hours() {
        // 18 hours, not 18 degrees
        let pos = parse_position("18 -30:00:00").unwrap();
        assert_close(&pos, 270.0, -30.0);
    }

    #[test]
    fn test_self_describing_hms_dms() {
        let (pos, strategy) = parse_position_with_strategy("18h04m00s -30d00m00s").unwrap();
        assert_close(&pos, 271.0, -30.0);
        assert_eq!(strategy, ParseStrategy::SelfDescribing);
    }

    #[test]
    fn test_self_describing_degrees() {
        let (pos, strategy) = parse_position_with_strategy("271.0deg -30.5deg").unwrap();
        assert_close(&pos, 271.0, -30.5);
        assert_eq!(strategy, ParseStrategy::SelfDescribing);

        let pos = parse_position("271.0d -30d30m").unwrap();
        assert_close(&pos, 271.0, -30.5);
    }

    #[test]
    fn test_self_describing_rejects_hours_for_declination() {
        let result = parse_position("18h00m00s 5h00m00s");
        assert!(matches!(result, Err(CoordError::Malformed { .. })));
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let pos = parse_position("  270.5   -28.2 ").unwrap();
        assert_close(&pos, 270.5, -28.2);
    }

    #[test]
    fn test_space_separated_sexagesimal_is_degrees() {
        let pos = parse_position("270 30 00 -28 12 00").unwrap();
        assert_close(&pos, 270.5, -28.2);
    }

    #[test]
    fn test_embedded_sign_splits_components() {
        let pos = parse_position("18:04:00-30:00:00").unwrap();
        assert_close(&pos, 271.0, -30.0);

        let pos = parse_position("270.0+28.0").unwrap();
        assert_close(&pos, 270.0, 28.0);
    }

    #[test]
    fn test_exponent_sign_does_not_split() {
        let pos = parse_position("2.7e+2 -28").unwrap();
        assert_close(&pos, 270.0, -28.0);
        assert!(parse_position("2.7e+2").is_err());
    }

    #[test]
    fn test_negative_right_ascension_wraps() {
        let pos = parse_position("-90 10").unwrap();
        assert_close(&pos, 270.0, 10.0);
    }

    #[test]
    fn test_malformed_token_is_reported() {
        let err = parse_position("not-a-coordinate").unwrap_err();
        match err {
            CoordError::Malformed { token, .. } => assert_eq!(token, "not-a-coordinate"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_declination_is_malformed() {
        assert!(matches!(
            parse_position("270.0 95.0"),
            Err(CoordError::Malformed { .. })
        ));
    }

    #[test]
    fn test_empty_and_single_component_are_malformed() {
        assert!(parse_position("").is_err());
        assert!(parse_position("   ").is_err());
        assert!(parse_position("270.0").is_err());
        assert!(parse_position("1 2 3").is_err());
    }

    #[test]
    fn test_strategy_applicability() {
        assert!(ParseStrategy::SelfDescribing.applies_to("1 2"));
        assert!(ParseStrategy::HourAngleSexagesimal.applies_to("1:0 2"));
        assert!(!ParseStrategy::HourAngleSexagesimal.applies_to("1 2"));
        assert!(ParseStrategy::DecimalDegrees.applies_to("1 2"));
        assert!(!ParseStrategy::DecimalDegrees.applies_to("1:0 2"));
    }

    #[test]
    fn test_bad_colon_input_does_not_fall_back_to_degrees() {
        // 75 minutes is invalid; the degrees strategy is not eligible
        let err = parse_position("18:75:00 -30:00:00").unwrap_err();
        match err {
            CoordError::Malformed { reason, .. } => assert!(reason.contains("below 60")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn ra_diff(a: f64, b: f64) -> f64 {
            let d = (a - b).rem_euclid(FULL_CIRCLE_DEG);
            d.min(FULL_CIRCLE_DEG - d)
        }

        proptest! {
            #[test]
            fn test_decimal_degrees_roundtrip(
                ra in 0.0..360.0_f64,
                dec in -90.0..=90.0_f64
            ) {
                let pos = parse_position(&format!("{} {}", ra, dec))?;
                prop_assert!(ra_diff(pos.ra_deg(), ra) < 1e-9);
                prop_assert!((pos.dec_deg() - dec).abs() < 1e-9);

                // formatting back to decimal reproduces the same values
                let reparsed = parse_position(&pos.to_decimal())?;
                prop_assert!(ra_diff(reparsed.ra_deg(), ra) < 1e-4);
                prop_assert!((reparsed.dec_deg() - dec).abs() < 1e-4);
            }

            #[test]
            fn test_colon_input_reads_first_field_as_hours(
                h in 0u32..24,
                m in 0u32..60,
                d in 0u32..90,
                negative in any::<bool>()
            ) {
                let sign = if negative { "-" } else { "+" };
                let raw = format!("{:02}:{:02}:00 {}{:02}:00:00", h, m, sign, d);
                let pos = parse_position(&raw)?;

                let expected_ra = (h as f64 + m as f64 / 60.0) * DEG_PER_HOUR;
                let expected_dec = if negative { -(d as f64) } else { d as f64 };
                prop_assert!(ra_diff(pos.ra_deg(), expected_ra) < 1e-9);
                prop_assert!((pos.dec_deg() - expected_dec).abs() < 1e-9);
            }

            #[test]
            fn test_hmsdms_output_parses_back(
                ra in 0.0..360.0_f64,
                dec in -89.9..89.9_f64
            ) {
                let pos = Position::new(ra, dec)?;
                let reparsed = parse_position(&pos.to_hmsdms())?;
                // 0.01s of time is 0.15 arcsec; 0.1 arcsec in dec
                prop_assert!(ra_diff(reparsed.ra_deg(), pos.ra_deg()) < 1e-4);
                prop_assert!((reparsed.dec_deg() - pos.dec_deg()).abs() < 1e-4);
            }
        }
    }
}
