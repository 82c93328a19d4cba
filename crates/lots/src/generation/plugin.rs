use bevy::prelude::*;

use super::buildings::Buildings;
use super::events::{BuildingsGenerated, GenerateBuildings, ResetBuildings};
use crate::config::BuildingConfig;
use crate::lot_rng::LotRng;
use crate::LotsSet;

pub struct GenerationPlugin;

impl Plugin for GenerationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Buildings>()
            .add_event::<GenerateBuildings>()
            .add_event::<ResetBuildings>()
            .add_event::<BuildingsGenerated>()
            .add_systems(
                Update,
                (
                    handle_reset_requests,
                    handle_generate_requests,
                    advance_generation,
                )
                    .chain()
                    .in_set(LotsSet),
            );
    }
}

pub fn handle_reset_requests(
    mut requests: EventReader<ResetBuildings>,
    mut buildings: ResMut<Buildings>,
) {
    if requests.read().count() == 0 {
        return;
    }
    buildings.reset();
    info!("Buildings reset");
}

pub fn handle_generate_requests(
    mut requests: EventReader<GenerateBuildings>,
    config: Res<BuildingConfig>,
    mut rng: ResMut<LotRng>,
    mut buildings: ResMut<Buildings>,
    mut generated: EventWriter<BuildingsGenerated>,
) {
    for request in requests.read() {
        match buildings.generate(&config, &mut rng.0, request.animate) {
            Ok(()) if !buildings.is_generating() => {
                generated.send(buildings.generated_event());
            }
            Ok(()) => {}
            Err(e) => warn!("Ignoring generate request: {e}"),
        }
    }
}

/// Animated driver: one unit of work per frame.
pub fn advance_generation(
    mut rng: ResMut<LotRng>,
    mut buildings: ResMut<Buildings>,
    mut generated: EventWriter<BuildingsGenerated>,
) {
    if !buildings.is_generating() {
        return;
    }
    if !buildings.update(&mut rng.0) && !buildings.is_generating() {
        generated.send(buildings.generated_event());
    }
}
