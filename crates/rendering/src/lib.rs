use bevy::prelude::*;

use lots::LotsSet;

pub mod building_render;
pub mod camera;

use building_render::BuildingRenderSettings;
use camera::CameraDrag;

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraDrag>()
            .init_resource::<BuildingRenderSettings>()
            .add_systems(Startup, camera::setup_camera)
            .add_systems(
                Update,
                (
                    camera::sync_screen_size,
                    camera::camera_pan_keyboard,
                    camera::camera_pan_drag,
                    camera::camera_zoom,
                    camera::projection_keybind,
                )
                    .before(LotsSet),
            )
            .add_systems(
                Update,
                (
                    building_render::draw_streets,
                    building_render::draw_blocks,
                    building_render::draw_buildings,
                )
                    .chain()
                    .after(LotsSet),
            );
    }
}
