//! Query entry points.
//!
//! `QueryService` is the surface a transport layer (CLI, HTTP handler, ...)
//! calls into. Each method takes the raw query string exactly as received
//! and returns text, a report, or image bytes.
//!
//! ```text
//! raw "pos" ──► batch::resolve ──► RegionMembershipEvaluator ──► format
//!                     │
//!                     └──────────► FootprintRenderer ──► image bytes
//! ```

use std::sync::Arc;

use tracing::{error, info};

use crate::batch::{resolve, ResolvedBatch};
use crate::error::QueryError;
use crate::footprint::{self, Footprint};
use crate::format::{format_membership, summarize, OutputFormat, SummaryRow};
use crate::membership::RegionMembershipEvaluator;
use crate::render::{FootprintRenderer, RenderConfig, RenderRequest};

/// Example query with two positions inside the footprint.
pub const DEMO_QUERY: &str = "270.0 -28.0,270.5 -28.2";

/// Result of a visibility check: one summary row per input position.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityReport {
    /// The query as received.
    pub query: String,
    /// Rows in input order.
    pub rows: Vec<SummaryRow>,
}

impl VisibilityReport {
    /// Number of positions inside the footprint.
    pub fn in_region_count(&self) -> usize {
        self.rows.iter().filter(|r| r.in_region).count()
    }
}

/// Stateless query handler over a shared, read-only footprint.
#[derive(Debug, Clone)]
pub struct QueryService {
    evaluator: RegionMembershipEvaluator,
    renderer: FootprintRenderer,
}

impl QueryService {
    /// Create a service over `footprint`.
    pub fn new(footprint: Arc<dyn Footprint>, render_config: RenderConfig) -> Self {
        Self {
            evaluator: RegionMembershipEvaluator::new(Arc::clone(&footprint)),
            renderer: FootprintRenderer::new(footprint, render_config),
        }
    }

    /// Create a service over the built-in K2C9 footprint.
    pub fn with_builtin(render_config: RenderConfig) -> Result<Self, QueryError> {
        let footprint = footprint::builtin()?;
        Ok(Self::new(footprint, render_config))
    }

    pub fn renderer(&self) -> &FootprintRenderer {
        &self.renderer
    }

    /// Name of the footprint queries are answered against.
    pub fn footprint_name(&self) -> &str {
        self.renderer.footprint_name()
    }

    /// Resolve a query that must contain at least one position.
    fn resolve_required(&self, pos: Option<&str>) -> Result<ResolvedBatch, QueryError> {
        let batch = resolve(pos)?;
        if batch.is_empty() {
            return Err(QueryError::EmptyQuery);
        }
        Ok(batch)
    }

    /// Membership for each position, as plain or CSV text.
    ///
    /// `fmt` is the raw format selector; only `csv` selects CSV.
    pub fn in_region(&self, pos: Option<&str>, fmt: Option<&str>) -> Result<String, QueryError> {
        let batch = self.resolve_required(pos)?;
        let results = self.evaluator.evaluate(&batch.positions());
        let format = OutputFormat::from_selector(fmt);

        info!(
            positions = batch.len(),
            in_region = results.iter().filter(|r| **r).count(),
            %format,
            "Membership query"
        );

        Ok(format_membership(&batch.tokens(), &results, format))
    }

    /// Human-readable summary of each position and its membership.
    pub fn check_visibility(&self, pos: Option<&str>) -> Result<VisibilityReport, QueryError> {
        let batch = self.resolve_required(pos)?;
        let results = self.evaluator.evaluate(&batch.positions());
        let rows = summarize(&batch, &results);

        info!(positions = rows.len(), "Visibility check");

        Ok(VisibilityReport {
            query: pos.unwrap_or_default().to_string(),
            rows,
        })
    }

    /// Footprint image with optional position markers and view size.
    ///
    /// Positions are optional here; an absent query renders the bare footprint.
    pub fn render(&self, pos: Option<&str>, size: Option<f64>) -> Result<Vec<u8>, QueryError> {
        let batch = resolve(pos)?;
        let request = RenderRequest::new(batch.positions(), size);

        self.renderer.render(&request).map_err(|e| {
            error!(error = %e, positions = request.positions.len(), ?size, "Render failed");
            QueryError::from(e)
        })
    }
}
