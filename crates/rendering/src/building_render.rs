//! Flat gizmo rendering of streets, lots and pseudo-3D buildings.
//!
//! Everything arrives in screen space (pixels, origin top-left, y down) and is
//! mapped onto the default `Camera2d`, which is centred on the world origin
//! with y up.

use bevy::prelude::*;

use lots::generation::Buildings;
use lots::projection::{CameraState, CameraView};
use lots::BuildingConfig;

/// Which layers to draw.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct BuildingRenderSettings {
    pub draw_streets: bool,
    /// Half-shrunk block outlines while nothing is generated yet.
    pub draw_block_preview: bool,
    pub draw_lots: bool,
    pub draw_buildings: bool,
}

impl Default for BuildingRenderSettings {
    fn default() -> Self {
        Self {
            draw_streets: true,
            draw_block_preview: true,
            draw_lots: false,
            draw_buildings: true,
        }
    }
}

const STREET_COLOR: Color = Color::srgb(0.55, 0.55, 0.6);
const BLOCK_COLOR: Color = Color::srgba(0.4, 0.7, 1.0, 0.6);
const WORKING_COLOR: Color = Color::srgb(1.0, 0.75, 0.2);
const LOT_COLOR: Color = Color::srgba(0.9, 0.9, 0.9, 0.5);
const SIDE_COLOR: Color = Color::srgba(0.2, 0.2, 0.25, 0.9);
const ROOF_COLOR: Color = Color::srgb(1.0, 1.0, 1.0);

/// Screen pixel to 2D gizmo coordinates for a viewport of `screen_size`.
pub fn screen_to_gizmo(point: Vec2, screen_size: Vec2) -> Vec2 {
    Vec2::new(point.x - screen_size.x * 0.5, screen_size.y * 0.5 - point.y)
}

fn closed_ring(points: &[Vec2], screen_size: Vec2) -> Vec<Vec2> {
    let mut ring: Vec<Vec2> = points
        .iter()
        .map(|&p| screen_to_gizmo(p, screen_size))
        .collect();
    if let Some(&first) = ring.first() {
        ring.push(first);
    }
    ring
}

pub fn draw_streets(
    settings: Res<BuildingRenderSettings>,
    buildings: Res<Buildings>,
    camera: Res<CameraState>,
    mut gizmos: Gizmos,
) {
    if !settings.draw_streets {
        return;
    }
    let streets = buildings.streets();
    let nodes = streets.nodes();
    for (i, node) in nodes.iter().enumerate() {
        let from = screen_to_gizmo(camera.world_to_screen(node.position), camera.screen_size);
        // Each undirected street once
        for &j in node.neighbors.iter().filter(|&&j| j > i) {
            let to = screen_to_gizmo(
                camera.world_to_screen(nodes[j].position),
                camera.screen_size,
            );
            gizmos.line_2d(from, to, STREET_COLOR);
        }
    }
}

/// Block outlines: the worker's blocks mid-pass, otherwise a preview of
/// the blocks the next pass would start from.
pub fn draw_blocks(
    settings: Res<BuildingRenderSettings>,
    buildings: Res<Buildings>,
    config: Res<BuildingConfig>,
    camera: Res<CameraState>,
    mut gizmos: Gizmos,
) {
    let camera = *camera;
    if buildings.is_generating() {
        for polygon in buildings.working_polygons(&camera) {
            gizmos.linestrip_2d(closed_ring(&polygon, camera.screen_size), WORKING_COLOR);
        }
        return;
    }
    if !settings.draw_block_preview || !buildings.lots().is_empty() {
        return;
    }
    for block in buildings.preview_blocks(&config, &camera) {
        gizmos.linestrip_2d(closed_ring(&block, camera.screen_size), BLOCK_COLOR);
    }
}

/// Reproject every building for the current camera, then draw in height
/// order so taller buildings paint over shorter ones.
pub fn draw_buildings(
    settings: Res<BuildingRenderSettings>,
    mut buildings: ResMut<Buildings>,
    config: Res<BuildingConfig>,
    camera: Res<CameraState>,
    mut gizmos: Gizmos,
) {
    let camera = *camera;
    let size = camera.screen_size;

    if settings.draw_lots {
        for lot in buildings.screen_lots(&camera) {
            gizmos.linestrip_2d(closed_ring(&lot, size), LOT_COLOR);
        }
    }
    if !settings.draw_buildings || buildings.buildings().is_empty() {
        return;
    }

    for building in buildings.models(&camera, config.projection_distance) {
        for side in &building.sides {
            gizmos.linestrip_2d(closed_ring(side, size), SIDE_COLOR);
        }
        gizmos.linestrip_2d(closed_ring(&building.roof, size), ROOF_COLOR);
    }
}
