//! Polygon primitives shared by block discovery, carving and projection.
//!
//! A polygon is an ordered ring of points; the edge from the last vertex back
//! to the first is implicit. Winding is not guaranteed, so every routine here
//! either ignores it or normalizes it first.

use bevy::prelude::*;
use rand::Rng;

/// Ordered ring of points, implicitly closed.
pub type Polygon = Vec<Vec2>;

/// Sine of the angle below which two directions count as parallel.
pub const PARALLEL_EPSILON: f32 = 1e-4;

/// Area / perimeter² of a 1:4 rectangle. Thinner pieces are slivers.
pub const MIN_SHAPE_INDEX: f32 = 0.04;

/// Recursion guard for [`subdivide`].
const MAX_SUBDIVISION_DEPTH: u32 = 32;

/// Iterate the edges of a closed ring, including the closing edge.
pub fn edges(polygon: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    let n = polygon.len();
    (0..n).map(move |i| (polygon[i], polygon[(i + 1) % n]))
}

/// Shoelace area, positive for counter-clockwise rings (y up).
pub fn signed_area(polygon: &[Vec2]) -> f32 {
    if polygon.len() < 3 {
        return 0.0;
    }
    edges(polygon).map(|(a, b)| a.perp_dot(b)).sum::<f32>() * 0.5
}

/// Unsigned area; 0 for fewer than 3 vertices.
pub fn area(polygon: &[Vec2]) -> f32 {
    signed_area(polygon).abs()
}

pub fn perimeter(polygon: &[Vec2]) -> f32 {
    edges(polygon).map(|(a, b)| a.distance(b)).sum()
}

/// Vertex average ("average point"), not the area centroid.
pub fn centroid(polygon: &[Vec2]) -> Vec2 {
    if polygon.is_empty() {
        return Vec2::ZERO;
    }
    polygon.iter().copied().sum::<Vec2>() / polygon.len() as f32
}

pub fn edge_midpoints(polygon: &[Vec2]) -> impl Iterator<Item = Vec2> + '_ {
    edges(polygon).map(|(a, b)| (a + b) * 0.5)
}

/// Ray-casting (even-odd) point-in-polygon test.
/// A horizontal ray from `point` must cross the boundary an odd number of times.
pub fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (polygon[i], polygon[j]);
        if ((pi.y > point.y) != (pj.y > point.y))
            && (point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Intersection of the infinite lines through `p1`-`p2` and `p3`-`p4`.
/// `None` when either line is degenerate or the sine of the angle between
/// them is below [`PARALLEL_EPSILON`], whatever the segment lengths.
pub fn line_intersection(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2) -> Option<Vec2> {
    let d1 = p2 - p1;
    let d2 = p4 - p3;
    let denom = d1.perp_dot(d2);
    if denom.abs() < PARALLEL_EPSILON * d1.length() * d2.length() || denom == 0.0 {
        return None;
    }
    let t = (p3 - p1).perp_dot(d2) / denom;
    Some(p1 + d1 * t)
}

/// Drop repeated points and vertices whose neighbouring edges are collinear
/// (straight runs and spikes). Offsetting needs every corner to turn.
pub fn simplify_ring(polygon: &[Vec2]) -> Polygon {
    let mut ring: Polygon = Vec::with_capacity(polygon.len());
    for &p in polygon {
        if ring
            .last()
            .map_or(true, |&q| q.distance_squared(p) > f32::EPSILON)
        {
            ring.push(p);
        }
    }
    while ring.len() > 1 && ring[0].distance_squared(ring[ring.len() - 1]) <= f32::EPSILON {
        ring.pop();
    }

    let mut i = 0;
    while ring.len() >= 3 && i < ring.len() {
        let n = ring.len();
        let prev = ring[(i + n - 1) % n];
        let next = ring[(i + 1) % n];
        let incoming = (ring[i] - prev).normalize_or_zero();
        let outgoing = (next - ring[i]).normalize_or_zero();
        if incoming.perp_dot(outgoing).abs() < PARALLEL_EPSILON {
            ring.remove(i);
            // The previous corner may have become collinear.
            i = i.saturating_sub(1);
        } else {
            i += 1;
        }
    }
    ring
}

/// Offset a closed ring by a signed distance with mitered corners.
///
/// Negative distances inset, positive distances outset, whatever the winding.
/// Returns `None` when the result would be degenerate: fewer than 3 corners,
/// parallel neighbouring edges, a ring that flipped inside out, or an inset
/// that did not shrink.
pub fn resize(polygon: &[Vec2], distance: f32) -> Option<Polygon> {
    let ring = simplify_ring(polygon);
    let n = ring.len();
    if n < 3 {
        return None;
    }
    let original = signed_area(&ring);
    if original.abs() <= f32::EPSILON {
        return None;
    }
    if distance == 0.0 {
        return Some(ring);
    }

    // Right-hand normal points outward on a counter-clockwise ring.
    let winding = original.signum();
    let shifted: Vec<(Vec2, Vec2)> = edges(&ring)
        .map(|(a, b)| {
            let dir = (b - a).normalize_or_zero();
            let offset = Vec2::new(dir.y, -dir.x) * winding * distance;
            (a + offset, b + offset)
        })
        .collect();

    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let (a0, a1) = shifted[(i + n - 1) % n];
        let (b0, b1) = shifted[i];
        out.push(line_intersection(a0, a1, b0, b1)?);
    }

    // An edge that reversed direction means the offset passed through it.
    let flipped = (0..n).any(|i| {
        let j = (i + 1) % n;
        (out[j] - out[i]).dot(ring[j] - ring[i]) <= 0.0
    });
    if flipped {
        return None;
    }

    let resized = signed_area(&out);
    if resized.signum() != winding || resized.abs() <= f32::EPSILON {
        return None;
    }
    if distance < 0.0 && resized.abs() >= original.abs() {
        return None;
    }
    Some(out)
}

/// Split a ring by the line through `point` with the given `normal`.
/// Returns the pieces on the positive and negative side of the line.
pub fn split_polygon(polygon: &[Vec2], point: Vec2, normal: Vec2) -> (Polygon, Polygon) {
    let mut front = Vec::new();
    let mut back = Vec::new();

    for (v1, v2) in edges(polygon) {
        let d1 = (v1 - point).dot(normal);
        let d2 = (v2 - point).dot(normal);

        if d1 >= 0.0 {
            front.push(v1);
        }
        if d1 <= 0.0 {
            back.push(v1);
        }

        if (d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0) {
            let t = d1 / (d1 - d2);
            let crossing = v1 + (v2 - v1) * t;
            front.push(crossing);
            back.push(crossing);
        }
    }

    (front, back)
}

/// Longest edge of the ring as `(start, end)`.
pub fn longest_edge(polygon: &[Vec2]) -> Option<(Vec2, Vec2)> {
    edges(polygon).max_by(|(a0, a1), (b0, b1)| {
        a0.distance_squared(*a1)
            .total_cmp(&b0.distance_squared(*b1))
    })
}

/// Recursively cut a polygon into pieces no larger than `2 * min_area`.
///
/// - pieces under `0.5 * min_area` are dropped,
/// - slivers thinner than 1:4 are dropped,
/// - anything under `2 * min_area` is kept as-is,
/// - otherwise the polygon is cut perpendicular to its longest side, at a
///   random point between 40% and 60% along it, and both halves recurse.
///
/// Output order is depth-first, front half before back half.
pub fn subdivide<R: Rng + ?Sized>(polygon: &[Vec2], min_area: f32, rng: &mut R) -> Vec<Polygon> {
    let mut pieces = Vec::new();
    subdivide_into(polygon, min_area, rng, &mut pieces, 0);
    pieces
}

fn subdivide_into<R: Rng + ?Sized>(
    polygon: &[Vec2],
    min_area: f32,
    rng: &mut R,
    pieces: &mut Vec<Polygon>,
    depth: u32,
) {
    let area = area(polygon);
    if area < 0.5 * min_area {
        return;
    }
    let perimeter = perimeter(polygon);
    if perimeter <= 0.0 || area / (perimeter * perimeter) < MIN_SHAPE_INDEX {
        return;
    }
    if area < 2.0 * min_area || depth >= MAX_SUBDIVISION_DEPTH {
        pieces.push(polygon.to_vec());
        return;
    }

    let Some((start, end)) = longest_edge(polygon) else {
        pieces.push(polygon.to_vec());
        return;
    };
    let cut = start.lerp(end, rng.gen_range(0.4..0.6));
    let (front, back) = split_polygon(polygon, cut, (end - start).normalize_or_zero());

    if front.len() < 3 || back.len() < 3 {
        pieces.push(polygon.to_vec());
        return;
    }
    subdivide_into(&front, min_area, rng, pieces, depth + 1);
    subdivide_into(&back, min_area, rng, pieces, depth + 1);
}
