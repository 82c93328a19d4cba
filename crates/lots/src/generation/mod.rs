//! Sequences a generation pass: find blocks, shrink, carve or divide, then
//! build the height-sorted models and publish them.

mod buildings;
mod events;
mod plugin;
mod stage;
#[cfg(test)]
mod tests;

pub use buildings::Buildings;
pub use events::{BuildingsGenerated, GenerateBuildings, ResetBuildings};
pub use plugin::{
    advance_generation, handle_generate_requests, handle_reset_requests, GenerationPlugin,
};
pub use stage::GenerationStage;
