//! Block to lot carving: plain subdivision, or a ring of perimeter lots
//! around an inset courtyard.
//!
//! Courtyard depth follows the block's perimeter-derived radius,
//! `min(depth, 0.45 * perimeter / 2π)`. Blocks under twice the minimum lot
//! area, or whose courtyard would be shallower than 5 units, are subdivided
//! as in divide mode instead.

mod containment;
mod courtyard;
mod types;

pub use containment::{
    any_edge_midpoint_inside, centroid_inside, classify_lot, majority_of_vertices_inside,
};
pub use courtyard::{carve_courtyards, courtyard_boundary, courtyard_depth, divide_block};
pub use types::{CarveMode, CarveOutcome, CarveStats, LotClass};
