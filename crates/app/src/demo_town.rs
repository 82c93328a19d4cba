//! Demo street network: a noise-jittered grid with a few streets missing,
//! so blocks come in a mix of sizes and shapes.

use bevy::prelude::*;
use fastnoise_lite::{FastNoiseLite, NoiseType};

use lots::blocks::StreetGraph;

pub const DEMO_SEED: i32 = 1337;
pub const DEMO_COLUMNS: usize = 10;
pub const DEMO_ROWS: usize = 7;
pub const DEMO_CELL: f32 = 110.0;
/// Max intersection displacement, world units.
const JITTER: f32 = 28.0;
/// Interior streets whose noise sample is above this are left out.
const MISSING_STREET_THRESHOLD: f32 = 0.45;

pub fn demo_streets(seed: i32) -> StreetGraph {
    let mut jitter = FastNoiseLite::with_seed(seed);
    jitter.set_noise_type(Some(NoiseType::OpenSimplex2));
    jitter.set_frequency(Some(0.35));

    let mut gaps = FastNoiseLite::with_seed(seed.wrapping_add(1));
    gaps.set_noise_type(Some(NoiseType::OpenSimplex2));
    gaps.set_frequency(Some(0.6));

    let mut streets = StreetGraph::new();
    for y in 0..=DEMO_ROWS {
        for x in 0..=DEMO_COLUMNS {
            let (fx, fy) = (x as f32, y as f32);
            let offset = Vec2::new(
                jitter.get_noise_2d(fx, fy),
                jitter.get_noise_2d(fx + 100.0, fy + 100.0),
            ) * JITTER;
            let on_border = x == 0 || y == 0 || x == DEMO_COLUMNS || y == DEMO_ROWS;
            let position = Vec2::new(fx, fy) * DEMO_CELL;
            streets.add_node(if on_border { position } else { position + offset });
        }
    }

    let id = |x: usize, y: usize| y * (DEMO_COLUMNS + 1) + x;
    for y in 0..=DEMO_ROWS {
        for x in 0..=DEMO_COLUMNS {
            let border_row = y == 0 || y == DEMO_ROWS;
            let border_col = x == 0 || x == DEMO_COLUMNS;
            let (fx, fy) = (x as f32, y as f32);
            let keep_horizontal =
                border_row || gaps.get_noise_2d(fx + 0.5, fy) < MISSING_STREET_THRESHOLD;
            let keep_vertical =
                border_col || gaps.get_noise_2d(fx, fy + 0.5) < MISSING_STREET_THRESHOLD;
            if x < DEMO_COLUMNS && keep_horizontal {
                streets.add_edge(id(x, y), id(x + 1, y));
            }
            if y < DEMO_ROWS && keep_vertical {
                streets.add_edge(id(x, y), id(x, y + 1));
            }
        }
    }
    streets
}

/// World-space centre of the demo network.
pub fn demo_centre() -> Vec2 {
    Vec2::new(DEMO_COLUMNS as f32, DEMO_ROWS as f32) * DEMO_CELL * 0.5
}
