//! Coarse mesh construction from a Voronoi partition.
//!
//! Turns a farthest-point sampling back into a triangulation: the sampled
//! vertices become the coarse vertex set, and every input triangle whose
//! corners fall into three distinct Voronoi regions witnesses the mutual
//! adjacency of those regions and contributes a coarse triangle.

use std::collections::{HashMap, HashSet};

use nalgebra::{Point3, Vector3};

use crate::algo::dijkstra::VoronoiPartition;
use crate::algo::sampling::VoronoiSampling;
use crate::error::{RemeshError, Result};
use crate::graph::SurfaceGraph;

/// A coarse triangle mesh in face-vertex form.
///
/// Fresh allocation handed to the caller; triangle entries index into
/// `points`.
#[derive(Debug, Clone, PartialEq)]
pub struct CoarseMesh {
    /// Vertex coordinates, one per seed, in seed rank order.
    pub points: Vec<Point3<f64>>,
    /// Triangles as index triples into `points`.
    pub triangles: Vec<[usize; 3]>,
}

impl CoarseMesh {
    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.points.len()
    }

    /// Number of triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }
}

/// Build the Voronoi-dual coarse mesh.
///
/// Coarse vertex `k` takes the coordinates of seed rank `k`. For each input
/// triangle whose three corners belong to three distinct, defined Voronoi
/// regions, the triple of region ranks is emitted as a coarse triangle,
/// inheriting the input triangle's winding. Each unordered triple is emitted
/// once, at its first occurrence in input order, so the output is identical
/// across runs.
///
/// An empty triangle list is a legitimate outcome (the sampling was too
/// coarse to capture any face), not an error.
///
/// # Errors
///
/// Returns an error if a triangle references a vertex outside the graph.
pub fn dual_mesh(
    graph: &SurfaceGraph,
    sampling: &VoronoiSampling,
    triangles: &[[usize; 3]],
) -> Result<CoarseMesh> {
    let n = graph.num_vertices();
    let partition = sampling.partition();

    let points: Vec<Point3<f64>> = sampling.seeds().iter().map(|&s| graph.position(s)).collect();

    let mut seen: HashSet<[usize; 3]> = HashSet::new();
    let mut coarse_triangles = Vec::new();
    for (fi, tri) in triangles.iter().enumerate() {
        for &v in tri {
            if v >= n {
                return Err(RemeshError::InvalidVertexIndex { face: fi, vertex: v });
            }
        }

        let ranks = match dual_ranks(partition, tri) {
            Some(ranks) => ranks,
            None => continue,
        };

        if seen.insert(sorted_triple(ranks)) {
            coarse_triangles.push(ranks);
        }
    }

    Ok(CoarseMesh {
        points,
        triangles: coarse_triangles,
    })
}

/// Make coarse triangle windings consistent with the input surface.
///
/// The dual construction inherits each coarse triangle's winding from the
/// first input triangle that produced it, which can disagree with the local
/// surface orientation. Every input triangle spanning three distinct regions
/// votes with the sign of the dot product between its own normal and the
/// coarse triangle's normal; a coarse triangle whose votes sum negative gets
/// two indices swapped. Voting over all witnesses keeps the result
/// independent of traversal order when witnesses disagree.
///
/// # Errors
///
/// Returns an error if an input triangle references a vertex outside
/// `points`, or a coarse triangle references a vertex outside the coarse
/// mesh.
pub fn reorient_faces(
    coarse: &mut CoarseMesh,
    points: &[Point3<f64>],
    triangles: &[[usize; 3]],
    partition: &VoronoiPartition,
) -> Result<()> {
    for (fi, tri) in coarse.triangles.iter().enumerate() {
        for &k in tri {
            if k >= coarse.points.len() {
                return Err(RemeshError::InvalidVertexIndex { face: fi, vertex: k });
            }
        }
    }

    let mut by_key: HashMap<[usize; 3], usize> = HashMap::new();
    for (ti, tri) in coarse.triangles.iter().enumerate() {
        by_key.insert(sorted_triple(*tri), ti);
    }

    let mut votes = vec![0i64; coarse.triangles.len()];
    for (fi, tri) in triangles.iter().enumerate() {
        for &v in tri {
            if v >= points.len() {
                return Err(RemeshError::InvalidVertexIndex { face: fi, vertex: v });
            }
        }

        let ranks = match dual_ranks(partition, tri) {
            Some(ranks) => ranks,
            None => continue,
        };
        let ti = match by_key.get(&sorted_triple(ranks)) {
            Some(&ti) => ti,
            None => continue,
        };

        let source = triangle_normal(&points[tri[0]], &points[tri[1]], &points[tri[2]]);
        let target = coarse.triangles[ti];
        let dual = triangle_normal(
            &coarse.points[target[0]],
            &coarse.points[target[1]],
            &coarse.points[target[2]],
        );

        let dot = source.dot(&dual);
        if dot > 0.0 {
            votes[ti] += 1;
        } else if dot < 0.0 {
            votes[ti] -= 1;
        }
    }

    for (tri, &vote) in coarse.triangles.iter_mut().zip(&votes) {
        if vote < 0 {
            tri.swap(1, 2);
        }
    }

    Ok(())
}

/// Region ranks of a triangle's corners, if all three are defined and
/// pairwise distinct.
fn dual_ranks(partition: &VoronoiPartition, tri: &[usize; 3]) -> Option<[usize; 3]> {
    let a = partition.nearest(tri[0])?;
    let b = partition.nearest(tri[1])?;
    let c = partition.nearest(tri[2])?;
    if a == b || b == c || a == c {
        return None;
    }
    Some([a, b, c])
}

fn sorted_triple(mut tri: [usize; 3]) -> [usize; 3] {
    tri.sort_unstable();
    tri
}

fn triangle_normal(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Vector3<f64> {
    (b - a).cross(&(c - a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::sampling::voronoi_fps;

    fn single_triangle() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        (points, vec![[0, 1, 2]])
    }

    #[test]
    fn test_single_triangle_dual_is_input() {
        let (points, triangles) = single_triangle();
        let graph = SurfaceGraph::from_triangles(&points, &triangles).unwrap();
        let sampling = voronoi_fps(&graph, 3).unwrap();

        let coarse = dual_mesh(&graph, &sampling, &triangles).unwrap();
        assert_eq!(coarse.points, points);
        assert_eq!(coarse.triangles, vec![[0, 1, 2]]);
    }

    #[test]
    fn test_tetrahedron_dual_is_input() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let triangles = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        let graph = SurfaceGraph::from_triangles(&points, &triangles).unwrap();
        let sampling = voronoi_fps(&graph, 4).unwrap();

        let mut coarse = dual_mesh(&graph, &sampling, &triangles).unwrap();
        assert_eq!(coarse.num_vertices(), 4);
        assert_eq!(coarse.num_triangles(), 4);

        // Seed ranks permute vertex ids; map back through the seed list and
        // compare as orientation-preserving triples.
        let seeds = sampling.seeds();
        reorient_faces(&mut coarse, &points, &triangles, sampling.partition()).unwrap();
        for tri in &coarse.triangles {
            let original = [seeds[tri[0]], seeds[tri[1]], seeds[tri[2]]];
            assert!(
                triangles.iter().any(|t| is_rotation(*t, original)),
                "dual triangle {:?} (original ids {:?}) not in input",
                tri,
                original
            );
        }
    }

    fn is_rotation(a: [usize; 3], b: [usize; 3]) -> bool {
        (0..3).any(|r| (0..3).all(|i| a[i] == b[(i + r) % 3]))
    }

    #[test]
    fn test_partition_coarser_than_triangles_emits_nothing() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(5.0, 0.0, 0.0),
            Point3::new(6.0, 0.0, 0.0),
            Point3::new(5.0, 1.0, 0.0),
        ];
        let triangles = vec![[0, 1, 2], [3, 4, 5]];
        let graph = SurfaceGraph::from_triangles(&points, &triangles).unwrap();
        let sampling = voronoi_fps(&graph, 2).unwrap();

        let coarse = dual_mesh(&graph, &sampling, &triangles).unwrap();
        assert_eq!(coarse.num_vertices(), 2);
        assert!(coarse.triangles.is_empty());
    }

    #[test]
    fn test_dual_triangles_deduplicated_and_in_range() {
        let n = 6;
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
        let graph = SurfaceGraph::from_triangles(&points, &triangles).unwrap();
        let sampling = voronoi_fps(&graph, 9).unwrap();

        let coarse = dual_mesh(&graph, &sampling, &triangles).unwrap();
        assert!(!coarse.triangles.is_empty());
        assert_eq!(coarse.num_vertices(), 9);

        let mut keys: Vec<[usize; 3]> = coarse
            .triangles
            .iter()
            .map(|&t| sorted_triple(t))
            .collect();
        keys.sort_unstable();
        let before = keys.len();
        keys.dedup();
        assert_eq!(keys.len(), before, "duplicate dual triangle");

        for tri in &coarse.triangles {
            assert_ne!(tri[0], tri[1]);
            assert_ne!(tri[1], tri[2]);
            assert_ne!(tri[0], tri[2]);
            for &k in tri {
                assert!(k < coarse.num_vertices());
            }
        }
    }

    #[test]
    fn test_dual_mesh_is_deterministic() {
        let (points, triangles) = single_triangle();
        let graph = SurfaceGraph::from_triangles(&points, &triangles).unwrap();
        let sampling = voronoi_fps(&graph, 3).unwrap();

        let a = dual_mesh(&graph, &sampling, &triangles).unwrap();
        let b = dual_mesh(&graph, &sampling, &triangles).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_reorient_flips_inverted_winding() {
        let (points, triangles) = single_triangle();
        let graph = SurfaceGraph::from_triangles(&points, &triangles).unwrap();
        let sampling = voronoi_fps(&graph, 3).unwrap();
        let mut coarse = dual_mesh(&graph, &sampling, &triangles).unwrap();

        // Sabotage the winding; reorientation must restore it.
        coarse.triangles[0].swap(1, 2);
        reorient_faces(&mut coarse, &points, &triangles, sampling.partition()).unwrap();

        let tri = coarse.triangles[0];
        let normal = triangle_normal(
            &coarse.points[tri[0]],
            &coarse.points[tri[1]],
            &coarse.points[tri[2]],
        );
        let source = triangle_normal(&points[0], &points[1], &points[2]);
        assert!(normal.dot(&source) > 0.0);
    }

    #[test]
    fn test_out_of_range_triangle_rejected() {
        let (points, triangles) = single_triangle();
        let graph = SurfaceGraph::from_triangles(&points, &triangles).unwrap();
        let sampling = voronoi_fps(&graph, 3).unwrap();

        let bad = vec![[0, 1, 9]];
        assert!(matches!(
            dual_mesh(&graph, &sampling, &bad),
            Err(RemeshError::InvalidVertexIndex { face: 0, vertex: 9 })
        ));
    }
}
