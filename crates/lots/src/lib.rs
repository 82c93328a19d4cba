//! Building lots for street-bounded city blocks.
//!
//! The crate turns a street network into blocks, carves each block into
//! building lots (plain subdivision or a perimeter ring around a cleared
//! courtyard) and lifts the lots into pseudo-3D buildings for a 2D renderer.
//!
//! Pipeline: [`blocks::StreetGraph`] → [`blocks::BlockWorker`] (shrink, divide)
//! → [`carving`] → [`projection::BuildingModels`], sequenced by the
//! [`generation::Buildings`] resource.

use bevy::prelude::*;

pub mod blocks;
pub mod carving;
pub mod config;
pub mod error;
pub mod generation;
pub mod geometry;
pub mod lot_rng;
pub mod projection;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

pub use config::BuildingConfig;
pub use error::{ConfigError, GenerationError};
pub use geometry::Polygon;
pub use lot_rng::LotRng;

/// System set containing every lot generation system, so render/UI crates can
/// order themselves after a pass has been advanced for the frame.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct LotsSet;

pub struct LotsPlugin;

impl Plugin for LotsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BuildingConfig>()
            .init_resource::<LotRng>()
            .init_resource::<projection::CameraState>();

        app.add_plugins(generation::GenerationPlugin);
    }
}
