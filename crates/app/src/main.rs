use bevy::prelude::*;
use bevy::window::PresentMode;
use bevy::winit::{UpdateMode, WinitSettings};

use lots::generation::{Buildings, GenerateBuildings};
use lots::projection::CameraState;
use lots::BuildingConfig;

mod demo_town;

/// Path to a JSON `BuildingConfig` loaded at startup.
const CONFIG_ENV: &str = "CITYLOTS_CONFIG";

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "City Lots".to_string(),
            resolution: (1280.0, 720.0).into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    }))
    .insert_resource(WinitSettings {
        focused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(16)),
        unfocused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(100)),
    })
    .insert_resource(ClearColor(Color::srgb(0.08, 0.09, 0.11)))
    .add_plugins((lots::LotsPlugin, rendering::RenderingPlugin, ui::UiPlugin))
    .add_systems(Startup, (load_config_from_env, seed_demo_town).chain());

    app.run();
}

fn load_config_from_env(mut config: ResMut<BuildingConfig>) {
    let Ok(path) = std::env::var(CONFIG_ENV) else {
        return;
    };
    let loaded = std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|json| BuildingConfig::from_json(&json).map_err(|e| e.to_string()));
    match loaded {
        Ok(loaded) => {
            info!("Loaded building config from {path}");
            *config = loaded;
        }
        Err(e) => warn!("Ignoring {CONFIG_ENV}={path}: {e}"),
    }
}

fn seed_demo_town(
    mut buildings: ResMut<Buildings>,
    mut camera: ResMut<CameraState>,
    mut generate: EventWriter<GenerateBuildings>,
) {
    let streets = demo_town::demo_streets(demo_town::DEMO_SEED);
    info!(
        "Demo town: {} intersections, {} streets",
        streets.node_count(),
        streets.edge_count()
    );
    buildings.set_streets(streets);
    camera.look_at(demo_town::demo_centre());
    generate.send(GenerateBuildings { animate: false });
}
