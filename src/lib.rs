//! # Gravel
//!
//! Geodesic Voronoi remeshing for triangle meshes.
//!
//! Gravel coarsens a triangle mesh to a target vertex count by sampling the
//! surface with geodesic farthest-point sampling and reconstructing a
//! triangulation from the resulting Voronoi partition. Alongside the coarse
//! mesh it produces a sparse barycentric weight map that transfers
//! per-vertex scalar fields between the two resolutions, which makes it a
//! useful preprocessing stage for shape-correspondence pipelines that solve
//! on a low-resolution proxy and lift results back.
//!
//! ## Pipeline
//!
//! - **Surface graph**: CSR adjacency over mesh vertices with Euclidean
//!   edge lengths ([`graph::SurfaceGraph`])
//! - **Sampling**: farthest-point sampling with incremental Voronoi
//!   partition maintenance ([`algo::sampling::voronoi_fps`])
//! - **Dual mesh**: one coarse vertex per seed, one coarse triangle per
//!   adjacency of three Voronoi regions ([`algo::dual::dual_mesh`])
//! - **Transfer weights**: sparse barycentric map from coarse to original
//!   vertices ([`algo::weights::weight_map`])
//!
//! ## Quick Start
//!
//! ```
//! use gravel::prelude::*;
//! use nalgebra::Point3;
//!
//! let points = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let triangles = vec![[0, 1, 2]];
//!
//! // Build the surface graph and sample 3 vertices.
//! let graph = SurfaceGraph::from_triangles(&points, &triangles).unwrap();
//! let sampling = voronoi_fps(&graph, 3).unwrap();
//!
//! // Reconstruct the coarse mesh and fix triangle orientation.
//! let mut coarse = dual_mesh(&graph, &sampling, &triangles).unwrap();
//! reorient_faces(&mut coarse, &points, &triangles, sampling.partition()).unwrap();
//!
//! // Express every original vertex in coarse barycentric coordinates.
//! let weights = weight_map(&points, &coarse, points.len()).unwrap();
//! assert_eq!(weights.shape(), (3, 3));
//! ```
//!
//! ## File I/O
//!
//! ```no_run
//! use gravel::io;
//!
//! let (points, triangles) = io::load("model.obj").unwrap();
//! io::save("coarse.off", &points, &triangles).unwrap();
//! ```
//!
//! Loading, sampling, reconstruction, and weight computation are all
//! deterministic: two runs over the same input produce identical meshes and
//! identical matrices.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod graph;
pub mod io;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use gravel::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::dijkstra::{seed_partition, VoronoiPartition};
    pub use crate::algo::dual::{dual_mesh, reorient_faces, CoarseMesh};
    pub use crate::algo::evaluate::{evaluate, rescale_to_unit_box, RemeshMetrics};
    pub use crate::algo::resample::{max_edge_length, resample};
    pub use crate::algo::sampling::{voronoi_fps, VoronoiSampling};
    pub use crate::algo::weights::weight_map;
    pub use crate::algo::Progress;
    pub use crate::error::{RemeshError, Result};
    pub use crate::graph::SurfaceGraph;
}

// Re-export nalgebra types for convenience
pub use nalgebra;
