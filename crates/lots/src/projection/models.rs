use bevy::prelude::*;
use rand::Rng;

use super::camera::CameraView;
use crate::geometry::Polygon;

/// A lot lifted into a box. Everything but `height` and `lot_world` is a
/// projection cache, rebuilt by [`BuildingModels::set_projections`].
#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    pub height: f32,
    pub lot_world: Polygon,
    pub lot_screen: Polygon,
    pub roof: Polygon,
    /// One quad per lot edge: `[base_i, base_i+1, roof_i+1, roof_i]`.
    pub sides: Vec<[Vec2; 4]>,
}

impl Building {
    pub fn new(lot_world: Polygon, height: f32) -> Self {
        Self {
            height,
            lot_world,
            lot_screen: Vec::new(),
            roof: Vec::new(),
            sides: Vec::new(),
        }
    }

    /// Recompute the screen-space cache for the current camera.
    /// `distance` is the camera distance at zoom 1.0.
    pub fn set_projection(&mut self, camera: &impl CameraView, distance: f32) {
        self.lot_screen = self
            .lot_world
            .iter()
            .map(|&p| camera.world_to_screen(p))
            .collect();
        let d = distance / camera.zoom();
        self.roof = roof_polygon(&self.lot_screen, self.height, d, camera);
        self.sides = side_quads(&self.lot_screen, &self.roof);
    }
}

/// Lift screen-space base vertices to height `h` with eye distance `d`.
/// Requires `h < d`.
pub fn roof_polygon(base: &[Vec2], h: f32, d: f32, camera: &impl CameraView) -> Polygon {
    let scale = d / (d - h);
    if camera.orthographic() {
        let lean = camera.camera_direction() * (-h * scale);
        base.iter().map(|&v| v + lean).collect()
    } else {
        let eye = camera.camera_position();
        base.iter().map(|&v| (v - eye) * scale + eye).collect()
    }
}

/// Side walls for a base and its roof. Empty for degenerate lots.
pub fn side_quads(base: &[Vec2], roof: &[Vec2]) -> Vec<[Vec2; 4]> {
    let n = base.len();
    if n < 3 || roof.len() != n {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let j = (i + 1) % n;
            [base[i], base[j], roof[j], roof[i]]
        })
        .collect()
}

/// Buildings sorted by ascending height, so drawing in order paints taller
/// silhouettes over shorter ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildingModels {
    buildings: Vec<Building>,
}

impl BuildingModels {
    /// Give every lot a height in `[min_height, min_height + height_range)`.
    pub fn new<R: Rng + ?Sized>(
        lots: &[Polygon],
        min_height: f32,
        height_range: f32,
        rng: &mut R,
    ) -> Self {
        let mut buildings: Vec<Building> = lots
            .iter()
            .map(|lot| Building::new(lot.clone(), min_height + rng.gen::<f32>() * height_range))
            .collect();
        // sort_by is stable: equal heights keep lot order
        buildings.sort_by(|a, b| a.height.total_cmp(&b.height));
        Self { buildings }
    }

    pub fn set_projections(&mut self, camera: &impl CameraView, distance: f32) {
        for building in &mut self.buildings {
            building.set_projection(camera, distance);
        }
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }

    pub fn clear(&mut self) {
        self.buildings.clear();
    }
}
