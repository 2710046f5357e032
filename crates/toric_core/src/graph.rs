//! Weighted matching graph built from a syndrome.
//!
//! Vertices are the violated stabilizers, identified by their unit-cell
//! coordinate, and edges carry the toroidal Manhattan distance between them.
//! The graph is the input handed to a matching solver.

use crate::geometry::{Coord, manhattan_toroidal_distance};

/// Undirected weighted edge between two vertex indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeightedEdge {
    /// First endpoint.
    pub u: usize,

    /// Second endpoint.
    pub v: usize,

    /// Non-negative edge weight.
    ///
    /// For syndrome graphs this is the number of qubit flips in the
    /// correction chain joining the two endpoints.
    pub weight: u64,
}

/// Finite undirected weighted graph over unit-cell coordinates.
///
/// Vertex indices are assigned in insertion order. Edges are stored as a flat
/// list, which is what matching solvers consume; no adjacency structure is kept.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchingGraph {
    vertices: Vec<Coord>,
    edges: Vec<WeightedEdge>,
}

impl MatchingGraph {
    /// Creates an empty graph with room for `capacity` vertices.
    ///
    /// Edge storage is sized for a complete graph on that many vertices.
    pub fn new(capacity: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(capacity),
            edges: Vec::with_capacity(capacity * capacity.saturating_sub(1) / 2),
        }
    }

    /// Complete graph over `positions` weighted by toroidal Manhattan distance.
    ///
    /// One edge is added for every unordered pair, so a graph over n
    /// positions has n(n-1)/2 edges. Vertex `i` corresponds to `positions[i]`.
    ///
    /// # Arguments
    ///
    /// * `positions` - Unit-cell coordinates of the violated stabilizers
    /// * `size` - Lattice size L used for the wraparound distance
    pub fn complete(positions: &[Coord], size: usize) -> Self {
        let mut graph = Self::new(positions.len());
        for &pos in positions {
            graph.add_vertex(pos);
        }
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                let dist = manhattan_toroidal_distance(positions[i], positions[j], size);
                graph.add_edge(i, j, dist as u64);
            }
        }
        graph
    }

    /// Adds a vertex and returns its index.
    pub fn add_vertex(&mut self, pos: Coord) -> usize {
        self.vertices.push(pos);
        self.vertices.len() - 1
    }

    /// Adds an undirected edge between two existing vertices.
    ///
    /// (u, v) and (v, u) are equivalent.
    pub fn add_edge(&mut self, u: usize, v: usize, weight: u64) {
        debug_assert!(u < self.vertices.len() && v < self.vertices.len());
        self.edges.push(WeightedEdge { u, v, weight });
    }

    /// Number of vertices.
    pub fn num_nodes(&self) -> usize {
        self.vertices.len()
    }

    /// Coordinate of vertex `idx`.
    pub fn vertex(&self, idx: usize) -> Coord {
        self.vertices[idx]
    }

    /// All vertex coordinates in index order.
    pub fn vertices(&self) -> &[Coord] {
        &self.vertices
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[WeightedEdge] {
        &self.edges
    }

    /// Weight of the edge joining `u` and `v`, if there is one.
    pub fn weight_between(&self, u: usize, v: usize) -> Option<u64> {
        self.edges
            .iter()
            .find(|e| (e.u == u && e.v == v) || (e.u == v && e.v == u))
            .map(|e| e.weight)
    }

    /// Total weight of a set of vertex pairs.
    ///
    /// Returns `None` if any pair is not joined by an edge.
    pub fn matching_weight(&self, pairs: &[(usize, usize)]) -> Option<u64> {
        pairs
            .iter()
            .map(|&(u, v)| self.weight_between(u, v))
            .sum()
    }
}
