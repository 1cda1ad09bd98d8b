//! Query-level error types.

use thiserror::Error;

use crate::coord::CoordError;
use crate::footprint::FootprintError;
use crate::render::RenderError;

/// Message shown to users when their position input cannot be parsed.
pub const INVALID_INPUT_MESSAGE: &str = "Error: the input is invalid.";

/// Message shown to users when a position is required but none was given.
pub const EMPTY_QUERY_MESSAGE: &str = "Error: no position was given.";

/// Errors surfaced by the query entry points.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A token in a comma-separated batch could not be parsed.
    ///
    /// The whole batch fails; no partial result is produced.
    #[error("Invalid query: token {index} ('{token}') could not be parsed")]
    InvalidQuery {
        index: usize,
        token: String,
        #[source]
        source: CoordError,
    },

    /// No position was supplied where at least one is required.
    #[error("Empty query: at least one position is required")]
    EmptyQuery,

    /// The footprint geometry could not be loaded.
    #[error("Footprint error: {0}")]
    Footprint(#[from] FootprintError),

    /// Rendering the footprint image failed.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

impl QueryError {
    /// Human-readable message suitable for returning to the caller.
    ///
    /// Input problems get a short fixed message; anything else is an
    /// internal failure and is described in full.
    pub fn user_message(&self) -> String {
        match self {
            QueryError::InvalidQuery { .. } => INVALID_INPUT_MESSAGE.to_string(),
            QueryError::EmptyQuery => EMPTY_QUERY_MESSAGE.to_string(),
            other => format!("Error: {}", other),
        }
    }

    /// Returns true if the caller's input was at fault.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            QueryError::InvalidQuery { .. } | QueryError::EmptyQuery
        )
    }
}
