//! Region membership evaluation.

use std::sync::Arc;

use crate::coord::Position;
use crate::footprint::Footprint;

/// Asks the footprint engine whether each position lies inside the region.
#[derive(Clone)]
pub struct RegionMembershipEvaluator {
    footprint: Arc<dyn Footprint>,
}

impl RegionMembershipEvaluator {
    pub fn new(footprint: Arc<dyn Footprint>) -> Self {
        Self { footprint }
    }

    /// One boolean per position, in input order.
    pub fn evaluate(&self, positions: &[Position]) -> Vec<bool> {
        positions
            .iter()
            .map(|p| self.footprint.is_in_region(p.ra_deg(), p.dec_deg()))
            .collect()
    }
}

impl std::fmt::Debug for RegionMembershipEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionMembershipEvaluator")
            .field("footprint", &self.footprint.name())
            .finish()
    }
}
