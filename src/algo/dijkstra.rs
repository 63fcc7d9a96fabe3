//! Multi-source shortest paths from a seed set.
//!
//! Computes, for every vertex of a [`SurfaceGraph`], the nearest member of a
//! seed set and the geodesic distance to it along graph edges. The result is
//! a Voronoi partition of the vertex set, the primitive underneath
//! farthest-point sampling and the dual mesh construction.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{RemeshError, Result};
use crate::graph::SurfaceGraph;

/// Voronoi partition of a graph's vertices with respect to a seed set.
///
/// Two parallel arrays indexed by vertex: `nearest[v]` is the *rank* of the
/// owning seed in the seed set (`None` for vertices unreachable from every
/// seed), and `distances[v]` is the geodesic distance to that seed
/// (`f64::INFINITY` when unreachable).
#[derive(Debug, Clone)]
pub struct VoronoiPartition {
    pub(crate) nearest: Vec<Option<usize>>,
    pub(crate) distances: Vec<f64>,
}

impl VoronoiPartition {
    /// A partition over `n` vertices with every vertex unreachable.
    pub(crate) fn unreachable(n: usize) -> Self {
        Self {
            nearest: vec![None; n],
            distances: vec![f64::INFINITY; n],
        }
    }

    /// Rank of the seed owning vertex `v`, or `None` if unreachable.
    #[inline]
    pub fn nearest(&self, v: usize) -> Option<usize> {
        self.nearest[v]
    }

    /// Owning seed ranks for all vertices.
    #[inline]
    pub fn nearest_all(&self) -> &[Option<usize>] {
        &self.nearest
    }

    /// Geodesic distance from vertex `v` to its owning seed.
    ///
    /// Returns `f64::INFINITY` if the vertex is unreachable.
    #[inline]
    pub fn distance(&self, v: usize) -> f64 {
        self.distances[v]
    }

    /// Distances for all vertices.
    #[inline]
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    /// Number of vertices covered by the partition.
    #[inline]
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    /// Check if the partition covers no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Check if a vertex is reachable from some seed.
    #[inline]
    pub fn is_reachable(&self, v: usize) -> bool {
        self.nearest[v].is_some()
    }

    /// Count the vertices reachable from some seed.
    pub fn reachable_count(&self) -> usize {
        self.nearest.iter().filter(|r| r.is_some()).count()
    }

    /// The vertex farthest from the seed set, with its distance.
    ///
    /// Unreachable vertices compare greater than any finite distance, so a
    /// partially covered graph reports an unreachable vertex at
    /// `f64::INFINITY`. Ties break to the lowest vertex index. Returns
    /// `None` for an empty partition.
    pub fn farthest(&self) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (v, &d) in self.distances.iter().enumerate() {
            match best {
                Some((_, bd)) if d <= bd => {}
                _ => best = Some((v, d)),
            }
        }
        best
    }
}

/// Entry in the Dijkstra priority queue.
///
/// Ordering is by distance, then by seed rank, then by vertex index, all
/// ascending. The rank component makes equidistant contests resolve to the
/// lower-ranked seed independently of push order, so partitions are
/// reproducible across runs.
#[derive(Debug, Clone, Copy)]
pub(crate) struct QueueEntry {
    pub(crate) distance: f64,
    pub(crate) rank: usize,
    pub(crate) vertex: usize,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance && self.rank == other.rank && self.vertex == other.vertex
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behavior under std's max-heap.
        other
            .distance
            .partial_cmp(&self.distance)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.rank.cmp(&self.rank))
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

/// Partition the graph's vertices by their nearest seed.
///
/// Every seed starts at distance zero with `nearest` equal to its rank (its
/// position in `seeds`). All other vertices receive the rank of the seed
/// with the shortest path to them; when two seeds are exactly equidistant,
/// the lower rank wins. Vertices in components containing no seed stay
/// unreachable.
///
/// # Errors
///
/// Returns an error if a seed is out of range or appears twice.
///
/// # Example
///
/// ```
/// use gravel::algo::dijkstra::seed_partition;
/// use gravel::graph::SurfaceGraph;
/// use nalgebra::Point3;
///
/// let points = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let graph = SurfaceGraph::from_triangles(&points, &[[0, 1, 2]]).unwrap();
///
/// let partition = seed_partition(&graph, &[0, 1]).unwrap();
/// assert_eq!(partition.nearest(0), Some(0));
/// assert_eq!(partition.nearest(1), Some(1));
/// assert_eq!(partition.distance(0), 0.0);
/// ```
pub fn seed_partition(graph: &SurfaceGraph, seeds: &[usize]) -> Result<VoronoiPartition> {
    let n = graph.num_vertices();
    let mut partition = VoronoiPartition::unreachable(n);

    let mut is_seed = vec![false; n];
    let mut heap = BinaryHeap::new();
    for (rank, &s) in seeds.iter().enumerate() {
        if s >= n {
            return Err(RemeshError::SeedOutOfRange { seed: s });
        }
        if is_seed[s] {
            return Err(RemeshError::DuplicateSeed { seed: s });
        }
        is_seed[s] = true;
        partition.distances[s] = 0.0;
        partition.nearest[s] = Some(rank);
        heap.push(QueueEntry {
            distance: 0.0,
            rank,
            vertex: s,
        });
    }

    while let Some(entry) = heap.pop() {
        let v = entry.vertex;

        // Stale if a shorter path, or an equal path through a lower-ranked
        // seed, has claimed the vertex since this entry was pushed.
        if entry.distance > partition.distances[v] || partition.nearest[v] != Some(entry.rank) {
            continue;
        }

        for (u, w) in graph.neighbors(v) {
            let candidate = entry.distance + w;
            // A strictly shorter path always claims the vertex; an equal
            // path claims it only through a lower-ranked seed, and never
            // steals a seed's self-assignment (zero-length edges can make
            // another seed equidistant).
            let claims = match partition.nearest[u] {
                None => true,
                Some(r) => {
                    candidate < partition.distances[u]
                        || (candidate == partition.distances[u] && entry.rank < r && !is_seed[u])
                }
            };
            if claims {
                partition.distances[u] = candidate;
                partition.nearest[u] = Some(entry.rank);
                heap.push(QueueEntry {
                    distance: candidate,
                    rank: entry.rank,
                    vertex: u,
                });
            }
        }
    }

    Ok(partition)
}

/// Grow the partition from a newly promoted seed.
///
/// Bounded incremental update: relaxations propagate only while they
/// strictly improve the stored distance, so the wave touches just the
/// vertices whose owner changes. Existing owners keep equidistant vertices,
/// which is exactly the lower-rank-wins rule since promotion ranks only
/// increase.
pub(crate) fn grow_partition(
    graph: &SurfaceGraph,
    partition: &mut VoronoiPartition,
    seed: usize,
    rank: usize,
) {
    partition.distances[seed] = 0.0;
    partition.nearest[seed] = Some(rank);

    let mut heap = BinaryHeap::new();
    heap.push(QueueEntry {
        distance: 0.0,
        rank,
        vertex: seed,
    });

    while let Some(entry) = heap.pop() {
        let v = entry.vertex;
        if entry.distance > partition.distances[v] {
            continue;
        }

        for (u, w) in graph.neighbors(v) {
            let candidate = entry.distance + w;
            if candidate < partition.distances[u] {
                partition.distances[u] = candidate;
                partition.nearest[u] = Some(rank);
                heap.push(QueueEntry {
                    distance: candidate,
                    rank,
                    vertex: u,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn path_graph(n: usize) -> SurfaceGraph {
        let points: Vec<Point3<f64>> =
            (0..n).map(|i| Point3::new(i as f64, 0.0, 0.0)).collect();
        let edges: Vec<(usize, usize)> = (0..n - 1).map(|i| (i, i + 1)).collect();
        SurfaceGraph::from_edges(&points, &edges).unwrap()
    }

    fn grid_mesh(n: usize) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let mut points = Vec::new();
        let mut triangles = Vec::new();
        for j in 0..=n {
            for i in 0..=n {
                points.push(Point3::new(i as f64, j as f64, 0.0));
            }
        }
        for j in 0..n {
            for i in 0..n {
                let v00 = j * (n + 1) + i;
                let v10 = v00 + 1;
                let v01 = v00 + (n + 1);
                let v11 = v01 + 1;
                triangles.push([v00, v10, v11]);
                triangles.push([v00, v11, v01]);
            }
        }
        (points, triangles)
    }

    #[test]
    fn test_seeds_have_rank_and_zero_distance() {
        let (points, triangles) = grid_mesh(3);
        let graph = SurfaceGraph::from_triangles(&points, &triangles).unwrap();

        let seeds = [5, 0, 12];
        let partition = seed_partition(&graph, &seeds).unwrap();
        for (rank, &s) in seeds.iter().enumerate() {
            assert_eq!(partition.nearest(s), Some(rank));
            assert_eq!(partition.distance(s), 0.0);
        }
    }

    #[test]
    fn test_edge_relaxation_invariant() {
        let (points, triangles) = grid_mesh(4);
        let graph = SurfaceGraph::from_triangles(&points, &triangles).unwrap();
        let partition = seed_partition(&graph, &[0, 24]).unwrap();

        for v in 0..graph.num_vertices() {
            for (u, w) in graph.neighbors(v) {
                assert!(
                    partition.distance(u) <= partition.distance(v) + w + 1e-12,
                    "relaxation violated on edge ({}, {})",
                    v,
                    u
                );
            }
        }
    }

    #[test]
    fn test_equidistant_tie_goes_to_lower_rank() {
        // Path 0 - 1 - 2 with unit edges; vertex 1 is equidistant from both
        // endpoints. The seed listed first must win regardless of position.
        let graph = path_graph(3);

        let partition = seed_partition(&graph, &[2, 0]).unwrap();
        assert_eq!(partition.nearest(1), Some(0)); // seed 2, rank 0

        let partition = seed_partition(&graph, &[0, 2]).unwrap();
        assert_eq!(partition.nearest(1), Some(0)); // seed 0, rank 0
    }

    #[test]
    fn test_unreachable_vertices_stay_unassigned() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(9.0, 9.0, 9.0),
        ];
        let graph = SurfaceGraph::from_edges(&points, &[(0, 1)]).unwrap();
        let partition = seed_partition(&graph, &[0]).unwrap();

        assert_eq!(partition.nearest(2), None);
        assert!(partition.distance(2).is_infinite());
        assert_eq!(partition.reachable_count(), 2);
        assert!(!partition.is_reachable(2));
    }

    #[test]
    fn test_farthest_prefers_unreachable_then_lowest_index() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(9.0, 9.0, 9.0),
            Point3::new(8.0, 8.0, 8.0),
        ];
        let graph = SurfaceGraph::from_edges(&points, &[(0, 1), (2, 3)]).unwrap();
        let partition = seed_partition(&graph, &[0]).unwrap();

        let (v, d) = partition.farthest().unwrap();
        assert_eq!(v, 2);
        assert!(d.is_infinite());
    }

    #[test]
    fn test_coincident_seeds_keep_their_ranks() {
        // Zero-length edge between two seeds: neither may steal the other's
        // self-assignment, and the shared neighbor goes to the lower rank.
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        ];
        let edges = vec![(0, 1), (0, 2), (1, 2)];
        let graph = SurfaceGraph::from_edges(&points, &edges).unwrap();

        let partition = seed_partition(&graph, &[1, 0]).unwrap();
        assert_eq!(partition.nearest(1), Some(0));
        assert_eq!(partition.nearest(0), Some(1));
        assert_eq!(partition.nearest(2), Some(0));
    }

    #[test]
    fn test_invalid_seeds_rejected() {
        let graph = path_graph(3);
        assert!(matches!(
            seed_partition(&graph, &[7]),
            Err(RemeshError::SeedOutOfRange { seed: 7 })
        ));
        assert!(matches!(
            seed_partition(&graph, &[1, 1]),
            Err(RemeshError::DuplicateSeed { seed: 1 })
        ));
    }

    #[test]
    fn test_empty_seed_set() {
        let graph = path_graph(3);
        let partition = seed_partition(&graph, &[]).unwrap();
        assert_eq!(partition.reachable_count(), 0);
        assert!(partition.distances().iter().all(|d| d.is_infinite()));
    }

    #[test]
    fn test_grow_touches_only_improved_region() {
        let graph = path_graph(5);
        let mut partition = seed_partition(&graph, &[0]).unwrap();
        let before: Vec<f64> = partition.distances().to_vec();

        grow_partition(&graph, &mut partition, 4, 1);

        // Vertices 0..=1 keep their old owner; 3..=4 switch; the midpoint 2
        // is equidistant and stays with the earlier seed.
        assert_eq!(partition.nearest(0), Some(0));
        assert_eq!(partition.nearest(1), Some(0));
        assert_eq!(partition.nearest(2), Some(0));
        assert_eq!(partition.nearest(3), Some(1));
        assert_eq!(partition.nearest(4), Some(1));
        for v in 0..5 {
            assert!(partition.distance(v) <= before[v]);
        }
        assert_eq!(partition.distance(4), 0.0);
        assert_eq!(partition.distance(3), 1.0);
    }
}
