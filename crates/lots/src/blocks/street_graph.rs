use std::collections::HashSet;

use bevy::prelude::*;

use crate::geometry::{signed_area, Polygon};

#[derive(Debug, Clone, PartialEq)]
pub struct StreetNode {
    pub position: Vec2,
    pub neighbors: Vec<usize>,
}

/// Undirected street network. Nodes are intersections (or bends), edges are
/// street segments. Blocks are the bounded faces of this planar graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreetGraph {
    nodes: Vec<StreetNode>,
}

impl StreetGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, position: Vec2) -> usize {
        self.nodes.push(StreetNode {
            position,
            neighbors: Vec::new(),
        });
        self.nodes.len() - 1
    }

    /// Connect two nodes in both directions. Self loops, duplicate edges and
    /// unknown indices are ignored. Returns whether an edge was added.
    pub fn add_edge(&mut self, a: usize, b: usize) -> bool {
        if a == b || a >= self.nodes.len() || b >= self.nodes.len() {
            return false;
        }
        if self.nodes[a].neighbors.contains(&b) {
            return false;
        }
        self.nodes[a].neighbors.push(b);
        self.nodes[b].neighbors.push(a);
        true
    }

    /// Add a closed loop of streets through `points`, returning the new node ids.
    pub fn add_ring(&mut self, points: &[Vec2]) -> Vec<usize> {
        let ids: Vec<usize> = points.iter().map(|&p| self.add_node(p)).collect();
        for i in 0..ids.len() {
            self.add_edge(ids[i], ids[(i + 1) % ids.len()]);
        }
        ids
    }

    pub fn nodes(&self) -> &[StreetNode] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.neighbors.len()).sum::<usize>() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Every bounded face of the network with fewer than `max_length` corners.
    ///
    /// Dead-end streets are pruned first since they never enclose anything.
    /// Each face is traced keeping it on the left: arriving at `v` from `u`,
    /// the walk continues along the street that comes next clockwise from
    /// `u` around `v`. Bounded faces come out counter-clockwise and the outer
    /// face clockwise, so only positive-area faces are kept.
    pub fn find_blocks(&self, max_length: usize) -> Vec<Polygon> {
        let adjacency = self.sorted_adjacency();
        let mut visited: HashSet<(usize, usize)> = HashSet::new();
        let mut blocks = Vec::new();

        for start in 0..adjacency.len() {
            for &next in &adjacency[start] {
                if visited.contains(&(start, next)) {
                    continue;
                }
                let face = trace_face(&adjacency, start, next, &mut visited);
                if face.len() < 3 || face.len() >= max_length {
                    continue;
                }
                let polygon: Polygon = face.iter().map(|&i| self.nodes[i].position).collect();
                if signed_area(&polygon) > 0.0 {
                    blocks.push(polygon);
                }
            }
        }
        blocks
    }

    /// Neighbour lists with dead ends pruned, each sorted by ascending angle.
    fn sorted_adjacency(&self) -> Vec<Vec<usize>> {
        let mut adjacency: Vec<Vec<usize>> =
            self.nodes.iter().map(|n| n.neighbors.clone()).collect();

        let mut stack: Vec<usize> = (0..adjacency.len())
            .filter(|&i| adjacency[i].len() == 1)
            .collect();
        while let Some(node) = stack.pop() {
            let Some(&other) = adjacency[node].first() else {
                continue;
            };
            adjacency[node].clear();
            adjacency[other].retain(|&n| n != node);
            if adjacency[other].len() == 1 {
                stack.push(other);
            }
        }

        for (i, neighbors) in adjacency.iter_mut().enumerate() {
            let origin = self.nodes[i].position;
            neighbors.sort_by(|&a, &b| {
                angle_from(origin, self.nodes[a].position)
                    .total_cmp(&angle_from(origin, self.nodes[b].position))
            });
        }
        adjacency
    }
}

fn angle_from(origin: Vec2, target: Vec2) -> f32 {
    let d = target - origin;
    d.y.atan2(d.x)
}

fn trace_face(
    adjacency: &[Vec<usize>],
    start: usize,
    next: usize,
    visited: &mut HashSet<(usize, usize)>,
) -> Vec<usize> {
    let mut face = Vec::new();
    let (mut u, mut v) = (start, next);
    // Each directed edge belongs to exactly one face, so this bounds the walk.
    let limit = adjacency.iter().map(Vec::len).sum::<usize>();

    while visited.insert((u, v)) && face.len() <= limit {
        face.push(u);
        let around = &adjacency[v];
        let Some(back) = around.iter().position(|&n| n == u) else {
            break;
        };
        let w = around[(back + around.len() - 1) % around.len()];
        u = v;
        v = w;
    }
    face
}
