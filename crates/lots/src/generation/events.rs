use bevy::prelude::*;

use crate::carving::CarveStats;

/// Request a generation pass with the current `BuildingConfig`.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct GenerateBuildings {
    /// Advance shrink and divide one block per frame instead of finishing
    /// inside the request.
    pub animate: bool,
}

/// Drop all generated lots and buildings.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ResetBuildings;

/// Fired once when a pass publishes its lots and buildings.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct BuildingsGenerated {
    pub lots: usize,
    pub buildings: usize,
    pub stats: CarveStats,
}
