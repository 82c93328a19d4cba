use serde::{Deserialize, Serialize};

use crate::geometry::Polygon;

/// How blocks are turned into lots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarveMode {
    /// Plain recursive subdivision of the whole block.
    #[default]
    Divide,
    /// A ring of lots around a cleared courtyard, where the block is big
    /// enough for one.
    Courtyard,
}

impl CarveMode {
    pub const ALL: [CarveMode; 2] = [CarveMode::Divide, CarveMode::Courtyard];

    pub fn label(self) -> &'static str {
        match self {
            CarveMode::Divide => "Divide",
            CarveMode::Courtyard => "Courtyard",
        }
    }
}

/// Containment filter verdict for a candidate lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LotClass {
    /// Outside the courtyard boundary, kept.
    Perimeter,
    /// Inside the courtyard boundary, discarded.
    Interior,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CarveStats {
    pub blocks_with_courtyards: usize,
    pub blocks_without_courtyards: usize,
    pub discarded_lots: usize,
}

impl CarveStats {
    pub fn blocks(&self) -> usize {
        self.blocks_with_courtyards + self.blocks_without_courtyards
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarveOutcome {
    pub lots: Vec<Polygon>,
    pub stats: CarveStats,
}
