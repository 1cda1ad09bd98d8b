//! Membership result formatting.
//!
//! Two text layouts are produced, both with CRLF line endings:
//!
//! ```text
//! Plain                 Csv
//! -----                 ---
//! yes\r\n               position,in_region\r\n
//! no\r\n                270.0 -28.0,yes\r\n
//!                       0 0,no\r\n
//! ```
//!
//! CSV rows echo the raw token exactly as the caller typed it so results
//! can be matched back to the input. Neither layout reorders.

use std::fmt;
use std::str::FromStr;

use crate::batch::{RawPositionToken, ResolvedBatch};

/// Line terminator for all text output.
pub const LINE_ENDING: &str = "\r\n";

/// CSV header line.
pub const CSV_HEADER: &str = "position,in_region\r\n";

/// Text layout for membership results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One `yes`/`no` line per position.
    #[default]
    Plain,
    /// Header plus `<raw token>,yes|no` rows.
    Csv,
}

impl OutputFormat {
    /// Interpret an optional format selector.
    ///
    /// Only `csv` selects CSV; anything else, including no selector, is plain.
    pub fn from_selector(selector: Option<&str>) -> Self {
        match selector {
            Some(s) if s.eq_ignore_ascii_case("csv") => OutputFormat::Csv,
            _ => OutputFormat::Plain,
        }
    }

    /// Selector name.
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Plain => "plain",
            OutputFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" | "text" => Ok(OutputFormat::Plain),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// Render membership results.
///
/// `tokens` and `results` must be index-aligned; the output has exactly one
/// line per pair (plus the header in CSV mode).
pub fn format_membership(
    tokens: &[&RawPositionToken],
    results: &[bool],
    format: OutputFormat,
) -> String {
    debug_assert_eq!(tokens.len(), results.len());

    let mut out = String::new();
    match format {
        OutputFormat::Plain => {
            for &result in results {
                out.push_str(yes_no(result));
                out.push_str(LINE_ENDING);
            }
        }
        OutputFormat::Csv => {
            out.push_str(CSV_HEADER);
            for (token, &result) in tokens.iter().zip(results) {
                out.push_str(&token.text);
                out.push(',');
                out.push_str(yes_no(result));
                out.push_str(LINE_ENDING);
            }
        }
    }
    out
}

/// One row of the human-readable summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    /// Raw token as typed.
    pub input: String,
    /// Sexagesimal form.
    pub hmsdms: String,
    /// Decimal degrees form.
    pub decimal: String,
    /// Whether the position lies inside the footprint.
    pub in_region: bool,
}

/// Build summary rows for a resolved batch and its membership results.
pub fn summarize(batch: &ResolvedBatch, results: &[bool]) -> Vec<SummaryRow> {
    batch
        .iter()
        .zip(results)
        .map(|(entry, &in_region)| SummaryRow {
            input: entry.token.text.clone(),
            hmsdms: entry.position.to_hmsdms(),
            decimal: entry.position.to_decimal(),
            in_region,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::resolve;

    fn token(index: usize, text: &str) -> RawPositionToken {
        RawPositionToken {
            index,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_plain_output() {
        let a = token(0, "270 -28");
        let b = token(1, "0 0");
        let out = format_membership(&[&a, &b], &[true, false], OutputFormat::Plain);
        assert_eq!(out, "yes\r\nno\r\n");
    }

    #[test]
    fn test_plain_line_count_matches_input() {
        let tokens: Vec<RawPositionToken> = (0..5).map(|i| token(i, "x")).collect();
        let refs: Vec<&RawPositionToken> = tokens.iter().collect();
        let results = [true, true, false, true, false];
        let out = format_membership(&refs, &results, OutputFormat::Plain);

        let lines: Vec<&str> = out.split_terminator(LINE_ENDING).collect();
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|l| *l == "yes" || *l == "no"));
    }

    #[test]
    fn test_csv_output_echoes_raw_tokens() {
        let a = token(0, " 18:04:00 -30:00:00");
        let b = token(1, "270.0 -28.0 ");
        let out = format_membership(&[&a, &b], &[false, true], OutputFormat::Csv);
        assert_eq!(
            out,
            "position,in_region\r\n 18:04:00 -30:00:00,no\r\n270.0 -28.0 ,yes\r\n"
        );
    }

    #[test]
    fn test_csv_header_always_present() {
        let out = format_membership(&[], &[], OutputFormat::Csv);
        assert_eq!(out, CSV_HEADER);
    }

    #[test]
    fn test_format_selector() {
        assert_eq!(OutputFormat::from_selector(Some("csv")), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_selector(Some("CSV")), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_selector(Some("json")), OutputFormat::Plain);
        assert_eq!(OutputFormat::from_selector(None), OutputFormat::Plain);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("csv".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert_eq!("Plain".parse::<OutputFormat>(), Ok(OutputFormat::Plain));
        assert!("xml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Csv.to_string(), "csv");
    }

    #[test]
    fn test_summarize() {
        let batch = resolve(Some("18:04:00 -30:00:00,270.0 -28.0")).unwrap();
        let rows = summarize(&batch, &[false, true]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].input, "18:04:00 -30:00:00");
        assert_eq!(rows[0].hmsdms, "18h04m00.00s -30d00m00.0s");
        assert_eq!(rows[0].decimal, "271.0000 -30.0000");
        assert!(!rows[0].in_region);
        assert_eq!(rows[1].decimal, "270.0000 -28.0000");
        assert!(rows[1].in_region);
    }
}
