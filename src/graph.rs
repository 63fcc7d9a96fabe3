//! Weighted surface graph over a triangle mesh.
//!
//! The primary type is [`SurfaceGraph`], a compressed sparse row (CSR)
//! adjacency structure over the vertices of a triangle mesh, where each edge
//! carries the Euclidean distance between its endpoints. Shortest paths on
//! this graph approximate geodesic distances on the surface.
//!
//! # Construction
//!
//! A graph can be built from a triangle list, an explicit edge list, or a
//! set of edges; all three normalize to the same CSR representation:
//!
//! ```
//! use gravel::graph::SurfaceGraph;
//! use nalgebra::Point3;
//!
//! let points = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let triangles = vec![[0, 1, 2]];
//!
//! let graph = SurfaceGraph::from_triangles(&points, &triangles).unwrap();
//! assert_eq!(graph.num_vertices(), 3);
//! assert_eq!(graph.num_edges(), 3);
//! ```

use std::collections::{BTreeSet, VecDeque};

use nalgebra::Point3;

use crate::error::{RemeshError, Result};

/// Undirected surface graph with per-edge Euclidean lengths.
///
/// Vertex coordinates are copied on construction; the graph is immutable
/// thereafter. Adjacency is stored in compressed form: vertex `v`'s
/// neighbors occupy `adjacency[offsets[v]..offsets[v + 1]]`, each entry a
/// `(neighbor, edge_length)` pair. Every undirected edge appears once in
/// each endpoint's neighbor range; there are no self-loops and no duplicate
/// neighbors.
#[derive(Debug, Clone)]
pub struct SurfaceGraph {
    positions: Vec<Point3<f64>>,
    offsets: Vec<usize>,
    adjacency: Vec<(usize, f64)>,
}

impl SurfaceGraph {
    /// Build a graph from a triangle mesh.
    ///
    /// Every edge of every triangle is inserted in both orientations, then
    /// the edge list is sorted and deduplicated before being packed into
    /// CSR form.
    ///
    /// # Errors
    ///
    /// Returns an error if a triangle references a vertex outside `points`
    /// or repeats a vertex.
    pub fn from_triangles(points: &[Point3<f64>], triangles: &[[usize; 3]]) -> Result<Self> {
        let n = points.len();
        let mut edges: Vec<(usize, usize)> = Vec::with_capacity(6 * triangles.len());
        for (fi, tri) in triangles.iter().enumerate() {
            for &v in tri {
                if v >= n {
                    return Err(RemeshError::InvalidVertexIndex { face: fi, vertex: v });
                }
            }
            if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
                return Err(RemeshError::DegenerateFace { face: fi });
            }
            for k in 0..3 {
                let a = tri[k];
                let b = tri[(k + 1) % 3];
                edges.push((a, b));
                edges.push((b, a));
            }
        }

        Ok(Self::from_directed_edges(points, edges))
    }

    /// Build a graph from an explicit edge list.
    ///
    /// Edges may appear in any orientation and any number of times;
    /// duplicates are merged. Self-loops are stripped.
    ///
    /// # Errors
    ///
    /// Returns an error if an edge references a vertex outside `points`.
    pub fn from_edges(points: &[Point3<f64>], edges: &[(usize, usize)]) -> Result<Self> {
        let n = points.len();
        let mut directed: Vec<(usize, usize)> = Vec::with_capacity(2 * edges.len());
        for (ei, &(a, b)) in edges.iter().enumerate() {
            if a >= n {
                return Err(RemeshError::InvalidEdgeIndex { edge: ei, vertex: a });
            }
            if b >= n {
                return Err(RemeshError::InvalidEdgeIndex { edge: ei, vertex: b });
            }
            if a == b {
                continue;
            }
            directed.push((a, b));
            directed.push((b, a));
        }

        Ok(Self::from_directed_edges(points, directed))
    }

    /// Build a graph from a set of edges.
    ///
    /// Equivalent to [`SurfaceGraph::from_edges`] on the set's contents.
    pub fn from_edge_set(points: &[Point3<f64>], edges: &BTreeSet<(usize, usize)>) -> Result<Self> {
        let list: Vec<(usize, usize)> = edges.iter().copied().collect();
        Self::from_edges(points, &list)
    }

    /// Pack a directed edge list (both orientations present) into CSR form.
    fn from_directed_edges(points: &[Point3<f64>], mut edges: Vec<(usize, usize)>) -> Self {
        let n = points.len();
        edges.sort_unstable();
        edges.dedup();

        let mut offsets = vec![0usize; n + 1];
        for &(a, _) in &edges {
            offsets[a + 1] += 1;
        }
        for i in 0..n {
            offsets[i + 1] += offsets[i];
        }

        // Sorted order groups entries by first endpoint, so a single pass
        // lands each neighbor in its vertex's range.
        let adjacency: Vec<(usize, f64)> = edges
            .iter()
            .map(|&(a, b)| (b, (points[a] - points[b]).norm()))
            .collect();

        Self {
            positions: points.to_vec(),
            offsets,
            adjacency,
        }
    }

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Number of undirected edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.adjacency.len() / 2
    }

    /// Number of neighbors of vertex `v`.
    #[inline]
    pub fn degree(&self, v: usize) -> usize {
        self.offsets[v + 1] - self.offsets[v]
    }

    /// Coordinates of vertex `v`.
    #[inline]
    pub fn position(&self, v: usize) -> Point3<f64> {
        self.positions[v]
    }

    /// All vertex coordinates, in index order.
    #[inline]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// The `k`-th neighbor of vertex `v` as a `(neighbor, edge_length)` pair.
    #[inline]
    pub fn neighbor(&self, v: usize, k: usize) -> (usize, f64) {
        self.adjacency[self.offsets[v] + k]
    }

    /// Iterate over the neighbors of vertex `v` with their edge lengths.
    #[inline]
    pub fn neighbors(&self, v: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.adjacency[self.offsets[v]..self.offsets[v + 1]]
            .iter()
            .copied()
    }

    /// Label every vertex with its connected component.
    ///
    /// Components are numbered in order of their lowest-indexed vertex, so
    /// vertex 0 always belongs to component 0. Edge weights are ignored.
    pub fn connected_components(&self) -> Vec<usize> {
        let n = self.num_vertices();
        let mut labels = vec![usize::MAX; n];
        let mut current = 0;

        for root in 0..n {
            if labels[root] != usize::MAX {
                continue;
            }

            let mut queue = VecDeque::new();
            labels[root] = current;
            queue.push_back(root);
            while let Some(v) = queue.pop_front() {
                for (u, _) in self.neighbors(v) {
                    if labels[u] == usize::MAX {
                        labels[u] = current;
                        queue.push_back(u);
                    }
                }
            }

            current += 1;
        }

        labels
    }

    /// Number of connected components.
    pub fn num_components(&self) -> usize {
        self.connected_components()
            .into_iter()
            .max()
            .map_or(0, |m| m + 1)
    }
}
