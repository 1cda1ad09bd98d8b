//! Plot legend composition.

use crate::coord::Position;

/// Label for the query position marker.
pub const POSITION_LABEL: &str = "Your position";

/// Glyph drawn next to a legend label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendGlyph {
    /// The `+` marker used for query positions.
    Marker,
    /// A filled patch in the superstamp colour.
    Patch,
}

/// One legend entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub label: String,
    pub glyph: LegendGlyph,
}

/// Ordered legend entries, laid out in a single row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Legend {
    entries: Vec<LegendEntry>,
}

impl Legend {
    /// Legend for a plot of `footprint_name` with the given query positions.
    ///
    /// Depends only on whether any positions were supplied: with positions
    /// there is a marker entry followed by the footprint patch, without them
    /// only the patch.
    pub fn for_positions(positions: &[Position], footprint_name: &str) -> Self {
        let footprint = LegendEntry {
            label: format!("{} Observations", footprint_name),
            glyph: LegendGlyph::Patch,
        };

        let entries = if positions.is_empty() {
            vec![footprint]
        } else {
            vec![
                LegendEntry {
                    label: POSITION_LABEL.to_string(),
                    glyph: LegendGlyph::Marker,
                },
                footprint,
            ]
        };

        Self { entries }
    }

    pub fn entries(&self) -> &[LegendEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legend_without_positions() {
        let legend = Legend::for_positions(&[], "K2C9");
        assert_eq!(legend.len(), 1);
        assert_eq!(legend.entries()[0].glyph, LegendGlyph::Patch);
        assert_eq!(legend.entries()[0].label, "K2C9 Observations");
    }

    #[test]
    fn test_legend_with_positions() {
        let positions = [Position::new(270.0, -28.0).unwrap()];
        let legend = Legend::for_positions(&positions, "K2C9");
        assert_eq!(legend.len(), 2);
        assert_eq!(legend.entries()[0].label, POSITION_LABEL);
        assert_eq!(legend.entries()[0].glyph, LegendGlyph::Marker);
        assert_eq!(legend.entries()[1].glyph, LegendGlyph::Patch);
    }

    #[test]
    fn test_legend_ignores_position_count() {
        let one = [Position::new(270.0, -28.0).unwrap()];
        let many = [
            Position::new(270.0, -28.0).unwrap(),
            Position::new(10.0, 10.0).unwrap(),
            Position::new(20.0, 20.0).unwrap(),
        ];
        assert_eq!(
            Legend::for_positions(&one, "K2C9"),
            Legend::for_positions(&many, "K2C9")
        );
    }
}
