//! Comma-separated batch resolution.
//!
//! A query holds one or more positions separated by commas. Splitting is
//! literal: there is no quoting or escaping, so a comma can never appear
//! inside a single coordinate.
//!
//! Resolution is all-or-nothing. If any token fails to parse, the whole
//! batch fails with [`QueryError::InvalidQuery`] naming that token.

use tracing::debug;

use crate::coord::{parse_position, Position};
use crate::error::QueryError;

/// Token separator in a batch query.
pub const TOKEN_SEPARATOR: char = ',';

/// An untouched substring of the caller's input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPositionToken {
    /// Zero-based index of the token within the batch.
    pub index: usize,
    /// Exact text as received, including surrounding whitespace.
    pub text: String,
}

/// A token together with the position it parsed to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPosition {
    pub token: RawPositionToken,
    pub position: Position,
}

/// Ordered result of resolving a batch query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedBatch {
    entries: Vec<ResolvedPosition>,
}

impl ResolvedBatch {
    /// Number of positions in the batch.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the batch holds no positions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parsed positions, in input order.
    pub fn positions(&self) -> Vec<Position> {
        self.entries.iter().map(|e| e.position).collect()
    }

    /// Raw tokens, in input order.
    pub fn tokens(&self) -> Vec<&RawPositionToken> {
        self.entries.iter().map(|e| &e.token).collect()
    }

    /// Iterate over resolved entries in input order.
    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedPosition> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a ResolvedBatch {
    type Item = &'a ResolvedPosition;
    type IntoIter = std::slice::Iter<'a, ResolvedPosition>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Split a raw batch into tokens on the literal comma.
pub fn split_tokens(raw: &str) -> Vec<RawPositionToken> {
    raw.split(TOKEN_SEPARATOR)
        .enumerate()
        .map(|(index, text)| RawPositionToken {
            index,
            text: text.to_string(),
        })
        .collect()
}

/// Resolve a batch query into positions.
///
/// An absent or empty query yields an empty batch; whether that is
/// acceptable is up to the caller.
///
/// # Errors
///
/// Returns [`QueryError::InvalidQuery`] for the first token that fails to
/// parse. Later tokens are not examined.
pub fn resolve(raw: Option<&str>) -> Result<ResolvedBatch, QueryError> {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(ResolvedBatch::default()),
    };

    let mut entries = Vec::new();
    for token in split_tokens(raw) {
        match parse_position(&token.text) {
            Ok(position) => entries.push(ResolvedPosition { token, position }),
            Err(source) => {
                debug!(index = token.index, token = %token.text, error = %source, "Batch rejected");
                return Err(QueryError::InvalidQuery {
                    index: token.index,
                    token: token.text,
                    source,
                });
            }
        }
    }

    Ok(ResolvedBatch { entries })
}
