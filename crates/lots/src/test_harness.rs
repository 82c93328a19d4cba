//! # TestTown: headless harness for lot generation
//!
//! Wraps a `bevy::app::App` with `MinimalPlugins` + `LotsPlugin` so tests and
//! benches can drive generation through events, exactly like the game does.

use bevy::app::App;
use bevy::prelude::*;

use crate::blocks::StreetGraph;
use crate::generation::{Buildings, BuildingsGenerated, GenerateBuildings, ResetBuildings};
use crate::projection::CameraState;
use crate::{BuildingConfig, LotRng, LotsPlugin, LotsSet};

/// Every `BuildingsGenerated` event seen so far.
#[derive(Resource, Default)]
struct GeneratedLog(Vec<BuildingsGenerated>);

fn record_generated(mut events: EventReader<BuildingsGenerated>, mut log: ResMut<GeneratedLog>) {
    log.0.extend(events.read().copied());
}

pub struct TestTown {
    app: App,
}

impl Default for TestTown {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTown {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// An empty town: no streets, default config, default seed.
    pub fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(LotsPlugin);
        app.init_resource::<GeneratedLog>()
            .add_systems(Update, record_generated.after(LotsSet));
        app.update();
        Self { app }
    }

    // -----------------------------------------------------------------------
    // Setup (builder pattern, consumes and returns Self)
    // -----------------------------------------------------------------------

    pub fn with_streets(mut self, streets: StreetGraph) -> Self {
        self.buildings_mut().set_streets(streets);
        self
    }

    /// Add one block enclosed by its own ring of streets.
    pub fn with_block(mut self, corners: &[Vec2]) -> Self {
        let mut streets = self.buildings().streets().clone();
        streets.add_ring(corners);
        self.buildings_mut().set_streets(streets);
        self
    }

    /// A `cols` x `rows` street grid with square cells of `cell` units.
    pub fn with_grid(self, cols: usize, rows: usize, cell: f32) -> Self {
        self.with_streets(grid_streets(cols, rows, cell))
    }

    pub fn with_config(mut self, config: BuildingConfig) -> Self {
        self.app.insert_resource(config);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.app.insert_resource(LotRng::from_seed_u64(seed));
        self
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    pub fn request_generate(&mut self, animate: bool) {
        self.app.world_mut().send_event(GenerateBuildings { animate });
    }

    pub fn request_reset(&mut self) {
        self.app.world_mut().send_event(ResetBuildings);
    }

    /// Run `n` frames.
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.update();
        }
    }

    /// Run frames until no pass is in flight, up to `max_frames`.
    /// Returns the number of frames run.
    pub fn tick_until_idle(&mut self, max_frames: u32) -> u32 {
        for frame in 0..max_frames {
            if !self.buildings().is_generating() {
                return frame;
            }
            self.app.update();
        }
        max_frames
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn buildings(&self) -> &Buildings {
        self.app.world().resource::<Buildings>()
    }

    pub fn buildings_mut(&mut self) -> Mut<'_, Buildings> {
        self.app.world_mut().resource_mut::<Buildings>()
    }

    pub fn camera_mut(&mut self) -> Mut<'_, CameraState> {
        self.app.world_mut().resource_mut::<CameraState>()
    }

    pub fn config(&self) -> &BuildingConfig {
        self.app.world().resource::<BuildingConfig>()
    }

    pub fn generated_events(&self) -> &[BuildingsGenerated] {
        &self.app.world().resource::<GeneratedLog>().0
    }

    pub fn resource<T: Resource>(&self) -> &T {
        self.app.world().resource::<T>()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}

/// Street grid with `(cols + 1) * (rows + 1)` intersections.
pub fn grid_streets(cols: usize, rows: usize, cell: f32) -> StreetGraph {
    let mut streets = StreetGraph::new();
    for y in 0..=rows {
        for x in 0..=cols {
            streets.add_node(Vec2::new(x as f32 * cell, y as f32 * cell));
        }
    }
    let id = |x: usize, y: usize| y * (cols + 1) + x;
    for y in 0..=rows {
        for x in 0..=cols {
            if x < cols {
                streets.add_edge(id(x, y), id(x + 1, y));
            }
            if y < rows {
                streets.add_edge(id(x, y), id(x, y + 1));
            }
        }
    }
    streets
}
