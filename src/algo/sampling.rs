//! Geodesic Voronoi farthest-point sampling.
//!
//! Selects a well-spread subset of a graph's vertices by greedily promoting
//! the vertex farthest from the seeds chosen so far, maintaining the Voronoi
//! partition incrementally as each seed is added. The seed set approximates
//! a maximum-min-distance sampling of the surface, and the partition that
//! falls out drives the dual mesh construction downstream.

use crate::algo::dijkstra::{grow_partition, VoronoiPartition};
use crate::algo::Progress;
use crate::error::{RemeshError, Result};
use crate::graph::SurfaceGraph;

/// A farthest-point seed set together with its Voronoi partition.
///
/// Seed order is significant: a seed's position in the list is its *rank*,
/// which is the identity of the corresponding coarse vertex in every
/// downstream structure.
#[derive(Debug, Clone)]
pub struct VoronoiSampling {
    seeds: Vec<usize>,
    partition: VoronoiPartition,
}

impl VoronoiSampling {
    /// The sampled vertices, in promotion order.
    #[inline]
    pub fn seeds(&self) -> &[usize] {
        &self.seeds
    }

    /// Number of seeds actually selected.
    ///
    /// May be less than requested when the graph runs out of distinct
    /// vertices.
    #[inline]
    pub fn num_seeds(&self) -> usize {
        self.seeds.len()
    }

    /// The Voronoi partition induced by the seed set.
    #[inline]
    pub fn partition(&self) -> &VoronoiPartition {
        &self.partition
    }

    /// Decompose into the seed list and the partition.
    pub fn into_parts(self) -> (Vec<usize>, VoronoiPartition) {
        (self.seeds, self.partition)
    }
}

/// Sample `num_samples` vertices by geodesic farthest-point sampling.
///
/// The first seed is the lowest-indexed vertex of the largest connected
/// component. Each subsequent seed is the vertex with the greatest distance
/// to the current seed set (unreachable vertices count as infinitely far, so
/// additional components are seeded before any component is refined; ties
/// break to the lowest vertex index). After each promotion the partition is
/// updated by a bounded Dijkstra wave from the new seed that only overwrites
/// strictly improved distances.
///
/// Stops early once the farthest remaining vertex is at distance zero: the
/// graph cannot supply more distinct samples. Requesting more samples than
/// there are vertices therefore yields one seed per vertex.
///
/// # Errors
///
/// Returns an error if `num_samples` is zero or the graph has no vertices.
///
/// # Example
///
/// ```
/// use gravel::algo::sampling::voronoi_fps;
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
/// let sampling = voronoi_fps(&graph, 3).unwrap();
/// assert_eq!(sampling.seeds(), &[0, 1, 2]);
/// ```
pub fn voronoi_fps(graph: &SurfaceGraph, num_samples: usize) -> Result<VoronoiSampling> {
    voronoi_fps_with_progress(graph, num_samples, &Progress::none())
}

/// Sample with progress reporting.
///
/// Reports one step per promoted seed. See [`voronoi_fps`] for algorithm
/// details.
pub fn voronoi_fps_with_progress(
    graph: &SurfaceGraph,
    num_samples: usize,
    progress: &Progress,
) -> Result<VoronoiSampling> {
    if num_samples == 0 {
        return Err(RemeshError::invalid_param(
            "num_samples",
            num_samples,
            "must be at least 1",
        ));
    }
    let n = graph.num_vertices();
    if n == 0 {
        return Err(RemeshError::EmptyMesh);
    }

    let mut partition = VoronoiPartition::unreachable(n);
    let mut seeds = Vec::with_capacity(num_samples.min(n));

    let root = largest_component_root(graph);
    seeds.push(root);
    grow_partition(graph, &mut partition, root, 0);
    progress.report(1, num_samples, "sampling seeds");

    while seeds.len() < num_samples {
        // farthest() ranks unreachable vertices above every finite distance,
        // so isolated components are claimed before any region is split.
        let (candidate, distance) = match partition.farthest() {
            Some(found) => found,
            None => break,
        };
        if distance == 0.0 {
            break;
        }

        let rank = seeds.len();
        seeds.push(candidate);
        grow_partition(graph, &mut partition, candidate, rank);
        progress.report(seeds.len(), num_samples, "sampling seeds");
    }

    Ok(VoronoiSampling { seeds, partition })
}

/// Lowest-indexed vertex of the largest connected component.
///
/// Component size ties break to the lower component label, which is the one
/// containing the lower vertex index.
fn largest_component_root(graph: &SurfaceGraph) -> usize {
    let labels = graph.connected_components();
    let num_components = labels.iter().max().map_or(0, |m| m + 1);
    if num_components <= 1 {
        return 0;
    }

    let mut sizes = vec![0usize; num_components];
    for &label in &labels {
        sizes[label] += 1;
    }
    let mut best = 0;
    for (label, &size) in sizes.iter().enumerate() {
        if size > sizes[best] {
            best = label;
        }
    }

    // Labels are assigned in order of lowest-index roots, so the first
    // vertex carrying the label is the component's lowest vertex.
    labels
        .iter()
        .position(|&l| l == best)
        .expect("component label must occur")
}
