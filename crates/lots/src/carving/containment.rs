use bevy::prelude::*;

use super::types::LotClass;
use crate::geometry::{centroid, edge_midpoints, point_in_polygon};

/// Classify a candidate lot against a courtyard boundary.
///
/// A lot is interior when any of these holds:
/// its centroid is inside the courtyard, strictly more than half its
/// vertices are inside, or any edge midpoint is inside.
pub fn classify_lot(lot: &[Vec2], courtyard: &[Vec2]) -> LotClass {
    if centroid_inside(lot, courtyard)
        || majority_of_vertices_inside(lot, courtyard)
        || any_edge_midpoint_inside(lot, courtyard)
    {
        LotClass::Interior
    } else {
        LotClass::Perimeter
    }
}

pub fn centroid_inside(lot: &[Vec2], courtyard: &[Vec2]) -> bool {
    point_in_polygon(centroid(lot), courtyard)
}

pub fn majority_of_vertices_inside(lot: &[Vec2], courtyard: &[Vec2]) -> bool {
    let inside = lot
        .iter()
        .filter(|&&v| point_in_polygon(v, courtyard))
        .count();
    inside * 2 > lot.len()
}

pub fn any_edge_midpoint_inside(lot: &[Vec2], courtyard: &[Vec2]) -> bool {
    edge_midpoints(lot).any(|m| point_in_polygon(m, courtyard))
}
