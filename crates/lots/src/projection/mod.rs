//! Pseudo-3D buildings: random heights per lot, and the screen-space roof
//! and side geometry for a given camera.
//!
//! With eye distance `d = distance / zoom`, a vertex at height `h` scales by
//! `d / (d - h)`: towards the eye in perspective mode, along the camera
//! direction in orthographic mode.

mod camera;
mod models;

pub use camera::{CameraState, CameraView, MAX_ZOOM, MIN_ZOOM};
pub use models::{roof_polygon, side_quads, Building, BuildingModels};
