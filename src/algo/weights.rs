//! Sparse barycentric transfer weights between mesh resolutions.
//!
//! Expresses every vertex of the original mesh as a convex combination of at
//! most three coarse vertices, producing a sparse `(n_orig, n_coarse)`
//! matrix. Multiplying the matrix by a per-coarse-vertex scalar field lifts
//! the field back onto the original resolution.

use std::sync::atomic::{AtomicUsize, Ordering};

use nalgebra::Point3;
use rayon::prelude::*;
use sprs::{CsMat, TriMat};

use crate::algo::dual::CoarseMesh;
use crate::algo::Progress;
use crate::error::{RemeshError, Result};

/// Compute the barycentric weight map from the coarse mesh back to the
/// original vertices.
///
/// For each of the first `n_orig` entries of `points` (the vertex set of
/// the *original* input, before any resampling appended vertices), the
/// vertex is anchored at the Euclidean-nearest coarse vertex, projected onto
/// the plane of each coarse triangle incident to that anchor, and assigned
/// the clamped, renormalized barycentric coordinates of the triangle with
/// the smallest projection residual. Vertices whose anchor has no incident
/// triangle fall back to a single unit weight on the anchor itself.
///
/// Every row of the returned matrix is non-negative, has between one and
/// three structural non-zeros (exact zeros are omitted), and sums to one.
///
/// # Errors
///
/// Returns an error if `n_orig` is zero or exceeds `points.len()`, if the
/// coarse mesh has no vertices, or if a coarse triangle is out of range.
pub fn weight_map(
    points: &[Point3<f64>],
    coarse: &CoarseMesh,
    n_orig: usize,
) -> Result<CsMat<f64>> {
    weight_map_with_progress(points, coarse, n_orig, &Progress::none())
}

/// Compute the weight map with progress reporting.
///
/// See [`weight_map`] for algorithm details. Rows are processed in
/// parallel; progress arrives in completion order but the result is
/// identical to the sequential computation.
pub fn weight_map_with_progress(
    points: &[Point3<f64>],
    coarse: &CoarseMesh,
    n_orig: usize,
    progress: &Progress,
) -> Result<CsMat<f64>> {
    if n_orig == 0 {
        return Err(RemeshError::invalid_param(
            "n_orig",
            n_orig,
            "must be at least 1",
        ));
    }
    if n_orig > points.len() {
        return Err(RemeshError::invalid_param(
            "n_orig",
            n_orig,
            "exceeds the number of input vertices",
        ));
    }
    if coarse.points.is_empty() {
        return Err(RemeshError::EmptyMesh);
    }
    for (fi, tri) in coarse.triangles.iter().enumerate() {
        for &k in tri {
            if k >= coarse.points.len() {
                return Err(RemeshError::InvalidVertexIndex { face: fi, vertex: k });
            }
        }
    }

    // Coarse triangles incident to each coarse vertex, in triangle order.
    let mut incident: Vec<Vec<usize>> = vec![Vec::new(); coarse.points.len()];
    for (ti, tri) in coarse.triangles.iter().enumerate() {
        for &k in tri {
            incident[k].push(ti);
        }
    }

    let done = AtomicUsize::new(0);
    let rows: Vec<Vec<(usize, f64)>> = (0..n_orig)
        .into_par_iter()
        .map(|i| {
            let row = weight_row(&points[i], coarse, &incident);
            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            if finished % 1024 == 0 || finished == n_orig {
                progress.report(finished, n_orig, "computing transfer weights");
            }
            row
        })
        .collect();

    let mut matrix = TriMat::new((n_orig, coarse.points.len()));
    for (i, row) in rows.iter().enumerate() {
        for &(k, w) in row {
            matrix.add_triplet(i, k, w);
        }
    }
    Ok(matrix.to_csr())
}

/// Weights for a single original vertex.
fn weight_row(
    p: &Point3<f64>,
    coarse: &CoarseMesh,
    incident: &[Vec<usize>],
) -> Vec<(usize, f64)> {
    let anchor = nearest_coarse_vertex(p, &coarse.points);

    let mut best: Option<([usize; 3], [f64; 3], f64)> = None;
    for &ti in &incident[anchor] {
        let tri = coarse.triangles[ti];
        let coords = clamped_barycentric(
            p,
            &coarse.points[tri[0]],
            &coarse.points[tri[1]],
            &coarse.points[tri[2]],
        );
        if let Some((weights, residual)) = coords {
            // Strict comparison keeps the lowest triangle index on ties.
            let better = match best {
                Some((_, _, best_residual)) => residual < best_residual,
                None => true,
            };
            if better {
                best = Some((tri, weights, residual));
            }
        }
    }

    match best {
        Some((tri, weights, _)) => tri
            .iter()
            .zip(weights.iter())
            .filter(|&(_, &w)| w > 0.0)
            .map(|(&k, &w)| (k, w))
            .collect(),
        None => vec![(anchor, 1.0)],
    }
}

/// Index of the coarse vertex nearest to `p`, ties to the lowest index.
fn nearest_coarse_vertex(p: &Point3<f64>, coarse_points: &[Point3<f64>]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (k, q) in coarse_points.iter().enumerate() {
        let d = (p - q).norm_squared();
        if d < best_dist {
            best_dist = d;
            best = k;
        }
    }
    best
}

/// Barycentric coordinates of `p`'s projection onto the plane of triangle
/// `(a, b, c)`, clamped to the non-negative orthant and renormalized to sum
/// to one, together with the distance from `p` to the resulting surface
/// point.
///
/// Returns `None` for degenerate triangles.
fn clamped_barycentric(
    p: &Point3<f64>,
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
) -> Option<([f64; 3], f64)> {
    let e1 = b - a;
    let e2 = c - a;
    let normal = e1.cross(&e2);
    let area2 = normal.norm();
    if area2 < 1e-12 {
        return None;
    }
    let n = normal / area2;

    let offset = (p - a).dot(&n);
    let proj = p - n * offset;

    let v0 = c - a;
    let v1 = b - a;
    let v2 = proj - a;

    let dot00 = v0.dot(&v0);
    let dot01 = v0.dot(&v1);
    let dot02 = v0.dot(&v2);
    let dot11 = v1.dot(&v1);
    let dot12 = v1.dot(&v2);

    let denom = dot00 * dot11 - dot01 * dot01;
    if denom.abs() < 1e-12 {
        return None;
    }

    // u weights c, v weights b; the remainder weights a.
    let u = (dot11 * dot02 - dot01 * dot12) / denom;
    let v = (dot00 * dot12 - dot01 * dot02) / denom;

    let mut weights = [(1.0 - u - v).max(0.0), v.max(0.0), u.max(0.0)];
    let sum: f64 = weights.iter().sum();
    debug_assert!(sum > 0.0, "clamped barycentric weights sum to zero");
    for w in &mut weights {
        *w /= sum;
    }

    let surface_point =
        Point3::from(a.coords * weights[0] + b.coords * weights[1] + c.coords * weights[2]);
    Some((weights, (p - surface_point).norm()))
}
