//! Sexagesimal field parsing and formatting.
//!
//! Two input notations are handled here:
//!
//! - **Bare fields**: `18:04:00`, `18 04 00`, `-30:00:00`, `271.0`. The unit
//!   (hours or degrees) is decided by the caller.
//! - **Unit-annotated**: `18h04m00s`, `-30d00m00s`, `-30°00'00"`, `271.0deg`.
//!   These carry their own unit and need no outside hint.

use std::sync::OnceLock;

use regex::Regex;

/// Decimal places for right ascension seconds in [`format_hms`].
pub const RA_SECONDS_PRECISION: u32 = 2;

/// Decimal places for declination arcseconds in [`format_dms`].
pub const DEC_ARCSEC_PRECISION: u32 = 1;

/// A value whose unit was stated explicitly in the text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnitValue {
    Hours(f64),
    Degrees(f64),
}

static HMS_RE: OnceLock<Regex> = OnceLock::new();
static DMS_RE: OnceLock<Regex> = OnceLock::new();
static DEG_RE: OnceLock<Regex> = OnceLock::new();

fn hms_regex() -> &'static Regex {
    HMS_RE.get_or_init(|| {
        Regex::new(r"^([+-])?(\d+(?:\.\d*)?)h(?:(\d+(?:\.\d*)?)m(?:(\d+(?:\.\d*)?)s)?)?$")
            .expect("hours pattern is valid")
    })
}

fn dms_regex() -> &'static Regex {
    DMS_RE.get_or_init(|| {
        Regex::new(
            r#"^([+-])?(\d+(?:\.\d*)?)(?:d|°)(?:(\d+(?:\.\d*)?)(?:m|'|′)(?:(\d+(?:\.\d*)?)(?:s|"|″))?)?$"#,
        )
        .expect("degrees pattern is valid")
    })
}

fn deg_regex() -> &'static Regex {
    DEG_RE.get_or_init(|| {
        Regex::new(r"^([+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?)deg$")
            .expect("deg suffix pattern is valid")
    })
}

/// Parse bare sexagesimal fields (`a`, `a:b`, `a:b:c`, or space separated).
///
/// The result is in whatever unit the first field is in. A leading sign
/// applies to the whole value, so `-0:30:00` is `-0.5`.
pub fn parse_fields(text: &str) -> Result<f64, String> {
    let text = text.trim();
    let (negative, rest) = strip_sign(text);
    if rest.is_empty() {
        return Err("empty coordinate component".to_string());
    }

    let fields: Vec<&str> = rest
        .split(|c: char| c == ':' || c.is_whitespace())
        .collect();

    if fields.len() == 1 {
        return parse_single(rest).map(|v| if negative { -v } else { v });
    }

    combine(negative, &fields)
}

/// Parse a component that states its own unit.
///
/// Returns an error both for malformed annotated text and for text with no
/// unit annotation at all; the caller treats either as "not self-describing".
pub fn parse_with_units(text: &str) -> Result<UnitValue, String> {
    let text = text.trim();

    if let Some(caps) = hms_regex().captures(text) {
        let negative = caps.get(1).is_some_and(|m| m.as_str() == "-");
        let fields = captured_fields(&caps);
        return combine(negative, &fields).map(UnitValue::Hours);
    }

    if let Some(caps) = dms_regex().captures(text) {
        let negative = caps.get(1).is_some_and(|m| m.as_str() == "-");
        let fields = captured_fields(&caps);
        return combine(negative, &fields).map(UnitValue::Degrees);
    }

    if let Some(caps) = deg_regex().captures(text) {
        return parse_single(&caps[1]).map(UnitValue::Degrees);
    }

    Err(format!("'{}' carries no explicit unit", text))
}

/// Format hours as `HHhMMmSS.SSs`, wrapping at 24h.
pub fn format_hms(hours: f64) -> String {
    let (whole, minutes, seconds) = split_units(hours, RA_SECONDS_PRECISION);
    format!(
        "{:02}h{:02}m{:0width$.prec$}s",
        whole % 24,
        minutes,
        seconds,
        width = seconds_width(RA_SECONDS_PRECISION),
        prec = RA_SECONDS_PRECISION as usize
    )
}

/// Format degrees as `±DDdMMmSS.Ss`; the sign is always shown.
pub fn format_dms(degrees: f64) -> String {
    let (whole, minutes, seconds) = split_units(degrees, DEC_ARCSEC_PRECISION);
    let is_zero = whole == 0 && minutes == 0 && seconds == 0.0;
    let sign = if degrees < 0.0 && !is_zero { '-' } else { '+' };
    format!(
        "{}{:02}d{:02}m{:0width$.prec$}s",
        sign,
        whole,
        minutes,
        seconds,
        width = seconds_width(DEC_ARCSEC_PRECISION),
        prec = DEC_ARCSEC_PRECISION as usize
    )
}

fn strip_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (false, rest)
    } else {
        (false, text)
    }
}

fn parse_single(text: &str) -> Result<f64, String> {
    if text.starts_with(['+', '-']) {
        return Err(format!("unexpected sign in '{}'", text));
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("'{}' is not a number", text)),
    }
}

fn captured_fields<'t>(caps: &regex::Captures<'t>) -> Vec<&'t str> {
    (2..=4)
        .filter_map(|i| caps.get(i))
        .map(|m| m.as_str())
        .collect()
}

/// Combine up to three unsigned fields into one value.
///
/// Minutes and seconds must be below 60 and only the last field may be
/// fractional.
fn combine(negative: bool, fields: &[&str]) -> Result<f64, String> {
    if fields.is_empty() || fields.len() > 3 {
        return Err(format!(
            "expected 1 to 3 sexagesimal fields, got {}",
            fields.len()
        ));
    }

    let mut total = 0.0;
    let mut divisor = 1.0;
    for (i, field) in fields.iter().enumerate() {
        let is_last = i + 1 == fields.len();
        if field.is_empty() || !field.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return Err(format!("invalid sexagesimal field '{}'", field));
        }
        if !is_last && field.contains('.') {
            return Err(format!("only the last field may be fractional: '{}'", field));
        }
        let value: f64 = field
            .parse()
            .map_err(|_| format!("invalid sexagesimal field '{}'", field))?;
        if i > 0 && value >= 60.0 {
            return Err(format!("field '{}' must be below 60", field));
        }
        total += value / divisor;
        divisor *= 60.0;
    }

    Ok(if negative { -total } else { total })
}

/// Split a value into (whole, minutes, seconds) after rounding to the
/// requested seconds precision, so rounding carries into higher fields.
fn split_units(value: f64, decimals: u32) -> (u64, u64, f64) {
    let scale = 10u64.pow(decimals);
    let total = (value.abs() * 3600.0 * scale as f64).round() as u64;
    let per_minute = 60 * scale;
    let per_whole = 3600 * scale;

    let whole = total / per_whole;
    let minutes = (total % per_whole) / per_minute;
    let seconds = (total % per_minute) as f64 / scale as f64;
    (whole, minutes, seconds)
}

fn seconds_width(decimals: u32) -> usize {
    if decimals == 0 {
        2
    } else {
        3 + decimals as usize
    }
}
