use bevy::prelude::*;

use super::*;
use crate::blocks::StreetGraph;
use crate::carving::CarveMode;
use crate::error::GenerationError;
use crate::geometry::area;
use crate::projection::CameraState;
use crate::{BuildingConfig, ConfigError, LotRng};

fn square_streets(size: f32) -> StreetGraph {
    let mut streets = StreetGraph::new();
    streets.add_ring(&[
        Vec2::new(0.0, 0.0),
        Vec2::new(size, 0.0),
        Vec2::new(size, size),
        Vec2::new(0.0, size),
    ]);
    streets
}

fn courtyard_config() -> BuildingConfig {
    BuildingConfig {
        mode: CarveMode::Courtyard,
        shrink_spacing: 0.0,
        ..default()
    }
}

#[test]
fn test_blocking_pass_publishes() {
    let mut buildings = Buildings::new(square_streets(100.0));
    let mut rng = LotRng::from_seed_u64(1);
    buildings
        .generate(&BuildingConfig::default(), &mut rng.0, false)
        .expect("pass starts");

    assert!(!buildings.is_generating());
    assert_eq!(buildings.stage(), GenerationStage::Projected);
    assert!(!buildings.lots().is_empty());
    assert_eq!(buildings.buildings().len(), buildings.lots().len());
    // 4-unit setback on a 100x100 block
    let total: f32 = buildings.lots().iter().map(|lot| area(lot)).sum();
    assert!((total - 92.0 * 92.0).abs() < 1.0, "total {total}");
}

#[test]
fn test_tiny_block_survives_in_both_modes() {
    // 12x12 ring less a 4-unit setback leaves a 4x4 block, too small to subdivide
    for mode in CarveMode::ALL {
        let config = BuildingConfig {
            mode,
            chance_no_divide: 0.0,
            ..default()
        };
        let mut buildings = Buildings::new(square_streets(12.0));
        let mut rng = LotRng::from_seed_u64(3);
        buildings
            .generate(&config, &mut rng.0, false)
            .expect("pass starts");
        assert_eq!(buildings.lots().len(), 1, "{}", mode.label());
        assert!((area(&buildings.lots()[0]) - 16.0).abs() < 1e-2);
    }
}

#[test]
fn test_animated_pass_publishes_only_at_the_end() {
    let mut buildings = Buildings::new(square_streets(100.0));
    let mut rng = LotRng::from_seed_u64(1);
    buildings
        .generate(&courtyard_config(), &mut rng.0, true)
        .expect("pass starts");

    let mut stages = vec![buildings.stage()];
    while buildings.is_generating() {
        assert!(buildings.lots().is_empty());
        assert!(buildings.buildings().is_empty());
        buildings.update(&mut rng.0);
        if stages.last() != Some(&buildings.stage()) {
            stages.push(buildings.stage());
        }
    }
    assert_eq!(
        stages,
        vec![
            GenerationStage::BlocksFound,
            GenerationStage::Shrunk,
            GenerationStage::Carved,
            GenerationStage::Projected,
        ]
    );
    assert!(!buildings.lots().is_empty());
}

#[test]
fn test_generate_while_in_flight_is_rejected() {
    let mut buildings = Buildings::new(square_streets(100.0));
    let mut rng = LotRng::from_seed_u64(1);
    buildings
        .generate(&BuildingConfig::default(), &mut rng.0, true)
        .expect("pass starts");
    assert_eq!(
        buildings.generate(&BuildingConfig::default(), &mut rng.0, false),
        Err(GenerationError::AlreadyGenerating)
    );
    assert!(buildings.is_generating());
}

#[test]
fn test_invalid_config_is_rejected_before_work() {
    let mut buildings = Buildings::new(square_streets(100.0));
    let config = BuildingConfig {
        min_area: -1.0,
        ..default()
    };
    let result = buildings.generate(&config, &mut LotRng::default().0, false);
    assert!(matches!(
        result,
        Err(GenerationError::InvalidConfig(ConfigError::Invalid {
            field: "min_area",
            ..
        }))
    ));
    assert_eq!(buildings.stage(), GenerationStage::Idle);
}

#[test]
fn test_regenerate_replaces_published_set() {
    let mut buildings = Buildings::new(square_streets(100.0));
    let mut rng = LotRng::from_seed_u64(1);
    buildings
        .generate(&BuildingConfig::default(), &mut rng.0, false)
        .expect("first pass");
    let first = buildings.lots().to_vec();

    buildings
        .generate(&courtyard_config(), &mut rng.0, true)
        .expect("second pass");
    // Old set stays visible until the new pass publishes
    assert_eq!(buildings.lots(), first.as_slice());
    while buildings.step(&mut rng.0) {}
    assert_ne!(buildings.lots(), first.as_slice());
    assert_eq!(buildings.last_stats().map(|s| s.blocks_with_courtyards), Some(1));
}

#[test]
fn test_reset_returns_to_idle() {
    let mut buildings = Buildings::new(square_streets(100.0));
    let mut rng = LotRng::from_seed_u64(1);
    buildings
        .generate(&BuildingConfig::default(), &mut rng.0, false)
        .expect("pass");
    buildings.generate(&BuildingConfig::default(), &mut rng.0, true).expect("pass");
    buildings.reset();

    assert_eq!(buildings.stage(), GenerationStage::Idle);
    assert!(!buildings.is_generating());
    assert!(buildings.lots().is_empty());
    assert!(buildings.buildings().is_empty());
    assert_eq!(buildings.last_stats(), None);
    assert_eq!(buildings.streets().node_count(), 4);
    // A fresh pass can start right away
    buildings
        .generate(&BuildingConfig::default(), &mut rng.0, false)
        .expect("restart");
}

#[test]
fn test_same_seed_same_buildings() {
    let run = |seed| {
        let mut buildings = Buildings::new(square_streets(120.0));
        buildings
            .generate(&courtyard_config(), &mut LotRng::from_seed_u64(seed).0, false)
            .expect("pass");
        buildings.buildings().to_vec()
    };
    assert_eq!(run(9), run(9));
}

#[test]
fn test_models_are_height_sorted_and_projected() {
    let mut buildings = Buildings::new(square_streets(100.0));
    let mut rng = LotRng::from_seed_u64(4);
    buildings
        .generate(&BuildingConfig::default(), &mut rng.0, false)
        .expect("pass");
    let camera = CameraState::default();
    let models = buildings.models(&camera, 1000.0);
    assert!(models.windows(2).all(|w| w[0].height <= w[1].height));
    for building in models {
        assert_eq!(building.sides.len(), building.lot_world.len());
        assert_eq!(building.roof.len(), building.lot_screen.len());
        assert!((20.0..40.0).contains(&building.height));
    }
}

#[test]
fn test_screen_lots_follow_camera() {
    let mut buildings = Buildings::new(square_streets(100.0));
    buildings
        .generate(&BuildingConfig::default(), &mut LotRng::default().0, false)
        .expect("pass");
    let camera = CameraState {
        origin: Vec2::new(-10.0, -10.0),
        zoom: 2.0,
        ..default()
    };
    let screen = buildings.screen_lots(&camera);
    assert_eq!(screen.len(), buildings.lots().len());
    assert_eq!(screen[0][0], (buildings.lots()[0][0] + Vec2::splat(10.0)) * 2.0);
}

#[test]
fn test_preview_blocks_half_shrunk_in_screen_space() {
    let buildings = Buildings::new(square_streets(100.0));
    let previews = buildings.preview_blocks(&BuildingConfig::default(), &CameraState::default());
    assert_eq!(previews.len(), 1);
    // spacing 4 -> preview inset 2
    assert!((area(&previews[0]) - 96.0 * 96.0).abs() < 1e-1);
}

#[test]
fn test_working_polygons_visible_mid_pass() {
    let mut buildings = Buildings::new(square_streets(100.0));
    let camera = CameraState::default();
    assert!(buildings.working_polygons(&camera).is_empty());
    buildings
        .generate(&BuildingConfig::default(), &mut LotRng::default().0, true)
        .expect("pass");
    assert_eq!(buildings.working_polygons(&camera).len(), 1);
}

#[test]
fn test_empty_network_publishes_nothing() {
    let mut buildings = Buildings::default();
    buildings
        .generate(&BuildingConfig::default(), &mut LotRng::default().0, false)
        .expect("pass");
    assert_eq!(buildings.stage(), GenerationStage::Projected);
    assert!(buildings.lots().is_empty());
    assert_eq!(buildings.generated_event().buildings, 0);
}

#[test]
fn test_stage_labels() {
    assert_eq!(GenerationStage::default(), GenerationStage::Idle);
    assert_eq!(GenerationStage::Carved.label(), "Carved");
}
