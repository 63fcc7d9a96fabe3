//! Remeshing quality evaluation.
//!
//! Compares the coarse mesh against the original surface with symmetric
//! vertex-to-surface distances and per-triangle shape statistics. Meant for
//! diagnostics; rescale both meshes into the unit box first so the numbers
//! are comparable across models.

use nalgebra::Point3;
use rayon::prelude::*;

use crate::algo::{closest_point_in_triangle, triangle_area};
use crate::error::{RemeshError, Result};

/// Distance and triangle-shape statistics for a remeshing.
#[derive(Debug, Clone, PartialEq)]
pub struct RemeshMetrics {
    /// Symmetric Hausdorff distance between the two surfaces, estimated at
    /// mesh vertices.
    pub hausdorff: f64,
    /// Symmetric Chamfer distance (mean of the two directed means).
    pub chamfer: f64,
    /// Smallest coarse triangle area.
    pub min_area: f64,
    /// Largest coarse triangle area.
    pub max_area: f64,
    /// Mean coarse triangle area.
    pub avg_area: f64,
    /// Standard deviation of coarse triangle areas.
    pub std_area: f64,
    /// Smallest coarse triangle quality.
    pub min_quality: f64,
    /// Largest coarse triangle quality.
    pub max_quality: f64,
    /// Mean coarse triangle quality.
    pub avg_quality: f64,
    /// Standard deviation of coarse triangle qualities.
    pub std_quality: f64,
}

/// Translate and uniformly scale points so their bounding box fits the unit
/// cube anchored at the origin.
///
/// Degenerate inputs (empty, or a single repeated point) are translated but
/// left unscaled.
pub fn rescale_to_unit_box(points: &mut [Point3<f64>]) {
    if points.is_empty() {
        return;
    }

    let mut min = points[0];
    let mut max = points[0];
    for p in points.iter() {
        for k in 0..3 {
            min[k] = min[k].min(p[k]);
            max[k] = max[k].max(p[k]);
        }
    }

    let extent = (max - min).amax();
    let scale = if extent > 0.0 { 1.0 / extent } else { 1.0 };
    for p in points.iter_mut() {
        *p = Point3::from((*p - min) * scale);
    }
}

/// Evaluate a coarse remeshing against the original surface.
///
/// Directed distances are measured from each vertex of one mesh to the
/// closest surface point of the other; `hausdorff` is the largest such
/// distance in either direction and `chamfer` the mean of the two
/// directional means. Area and quality statistics cover the coarse
/// triangles, with quality `4 * sqrt(3) * area / (l0^2 + l1^2 + l2^2)`:
/// one for an equilateral triangle, approaching zero for slivers.
///
/// # Errors
///
/// Returns an error if either mesh has no vertices or no triangles, or if a
/// triangle is out of range.
pub fn evaluate(
    orig_points: &[Point3<f64>],
    orig_triangles: &[[usize; 3]],
    coarse_points: &[Point3<f64>],
    coarse_triangles: &[[usize; 3]],
) -> Result<RemeshMetrics> {
    if orig_points.is_empty()
        || orig_triangles.is_empty()
        || coarse_points.is_empty()
        || coarse_triangles.is_empty()
    {
        return Err(RemeshError::EmptyMesh);
    }
    validate(orig_points, orig_triangles)?;
    validate(coarse_points, coarse_triangles)?;

    let forward = directed_distances(orig_points, coarse_points, coarse_triangles);
    let backward = directed_distances(coarse_points, orig_points, orig_triangles);

    let fwd_max = forward.iter().cloned().fold(0.0_f64, f64::max);
    let bwd_max = backward.iter().cloned().fold(0.0_f64, f64::max);
    let hausdorff = fwd_max.max(bwd_max);

    let fwd_mean = forward.iter().sum::<f64>() / forward.len() as f64;
    let bwd_mean = backward.iter().sum::<f64>() / backward.len() as f64;
    let chamfer = 0.5 * (fwd_mean + bwd_mean);

    let areas: Vec<f64> = coarse_triangles
        .iter()
        .map(|tri| {
            triangle_area(
                &coarse_points[tri[0]],
                &coarse_points[tri[1]],
                &coarse_points[tri[2]],
            )
        })
        .collect();
    let qualities: Vec<f64> = coarse_triangles
        .iter()
        .map(|tri| {
            triangle_quality(
                &coarse_points[tri[0]],
                &coarse_points[tri[1]],
                &coarse_points[tri[2]],
            )
        })
        .collect();

    let (min_area, max_area, avg_area, std_area) = stats(&areas);
    let (min_quality, max_quality, avg_quality, std_quality) = stats(&qualities);

    Ok(RemeshMetrics {
        hausdorff,
        chamfer,
        min_area,
        max_area,
        avg_area,
        std_area,
        min_quality,
        max_quality,
        avg_quality,
        std_quality,
    })
}

/// Distance from each point to the closest surface point of a mesh.
fn directed_distances(
    from: &[Point3<f64>],
    to_points: &[Point3<f64>],
    to_triangles: &[[usize; 3]],
) -> Vec<f64> {
    from.par_iter()
        .map(|p| {
            let mut best = f64::INFINITY;
            for tri in to_triangles {
                let q = closest_point_in_triangle(
                    p,
                    &to_points[tri[0]],
                    &to_points[tri[1]],
                    &to_points[tri[2]],
                );
                best = best.min((p - q).norm());
            }
            best
        })
        .collect()
}

/// Normalized triangle shape quality in [0, 1].
fn triangle_quality(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> f64 {
    let l0 = (b - a).norm_squared();
    let l1 = (c - b).norm_squared();
    let l2 = (a - c).norm_squared();
    let denom = l0 + l1 + l2;
    if denom <= 0.0 {
        return 0.0;
    }
    4.0 * 3.0_f64.sqrt() * triangle_area(a, b, c) / denom
}

fn stats(values: &[f64]) -> (f64, f64, f64, f64) {
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64;
    (min, max, mean, variance.sqrt())
}

fn validate(points: &[Point3<f64>], triangles: &[[usize; 3]]) -> Result<()> {
    for (fi, tri) in triangles.iter().enumerate() {
        for &v in tri {
            if v >= points.len() {
                return Err(RemeshError::InvalidVertexIndex { face: fi, vertex: v });
            }
        }
    }
    Ok(())
}
