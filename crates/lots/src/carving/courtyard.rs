use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::Rng;

use super::containment::classify_lot;
use super::types::{CarveOutcome, LotClass};
use crate::config::{COURTYARD_MIN_DEPTH, COURTYARD_RADIUS_FRACTION, COURTYARD_SKIP_AREA_FACTOR};
use crate::geometry::{area, perimeter, resize, subdivide, Polygon};

/// Courtyard depth for a block: the configured depth, capped by a fraction
/// of the radius of a circle with the block's perimeter.
pub fn courtyard_depth(block: &[Vec2], configured_depth: f32) -> f32 {
    let avg_radius = perimeter(block) / TAU;
    configured_depth.min(avg_radius * COURTYARD_RADIUS_FRACTION)
}

/// The courtyard boundary of a block, or `None` when the block gets no
/// courtyard: too small, too shallow a courtyard, or a collapsed inset.
pub fn courtyard_boundary(block: &[Vec2], min_area: f32, configured_depth: f32) -> Option<Polygon> {
    if area(block) < min_area * COURTYARD_SKIP_AREA_FACTOR {
        return None;
    }
    let depth = courtyard_depth(block, configured_depth);
    if depth < COURTYARD_MIN_DEPTH {
        return None;
    }
    resize(block, -depth).filter(|courtyard| courtyard.len() >= 3)
}

/// Carve every block into a ring of perimeter lots around a courtyard.
///
/// Blocks without a courtyard fall back to plain subdivision. Lots come out
/// in block order, and within a block in subdivision order.
pub fn carve_courtyards<R: Rng + ?Sized>(
    blocks: &[Polygon],
    min_area: f32,
    configured_depth: f32,
    rng: &mut R,
) -> CarveOutcome {
    let mut outcome = CarveOutcome::default();
    for block in blocks {
        carve_block(block, min_area, configured_depth, rng, &mut outcome);
    }
    outcome
}

fn carve_block<R: Rng + ?Sized>(
    block: &[Vec2],
    min_area: f32,
    configured_depth: f32,
    rng: &mut R,
    outcome: &mut CarveOutcome,
) {
    let Some(courtyard) = courtyard_boundary(block, min_area, configured_depth) else {
        outcome.stats.blocks_without_courtyards += 1;
        outcome.lots.extend(subdivide_or_whole(block, min_area, rng));
        return;
    };

    outcome.stats.blocks_with_courtyards += 1;
    for lot in subdivide_or_whole(block, min_area, rng) {
        match classify_lot(&lot, &courtyard) {
            LotClass::Perimeter => outcome.lots.push(lot),
            LotClass::Interior => outcome.stats.discarded_lots += 1,
        }
    }
}

/// Divide mode for a single block: kept whole with probability
/// `chance_no_divide`, otherwise subdivided. A block that yields no pieces is
/// kept whole as well, same as the courtyard fallback.
pub fn divide_block<R: Rng + ?Sized>(
    block: &[Vec2],
    min_area: f32,
    chance_no_divide: f32,
    rng: &mut R,
) -> Vec<Polygon> {
    if rng.gen::<f32>() < chance_no_divide {
        return vec![block.to_vec()];
    }
    subdivide_or_whole(block, min_area, rng)
}

fn subdivide_or_whole<R: Rng + ?Sized>(block: &[Vec2], min_area: f32, rng: &mut R) -> Vec<Polygon> {
    let pieces = subdivide(block, min_area, rng);
    if pieces.is_empty() && block.len() >= 3 {
        vec![block.to_vec()]
    } else {
        pieces
    }
}
