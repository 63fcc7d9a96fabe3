//! Optional pre-resampling of sparse input meshes.
//!
//! Farthest-point sampling spreads seeds along graph edges, so a mesh whose
//! edges are long compared to the target sample spacing yields a ragged
//! coarse mesh. Splitting long edges beforehand bounds the edge length by
//! the expected spacing of the requested sample count and makes the
//! sampling near-uniform.

use std::collections::HashSet;

use nalgebra::Point3;

use crate::algo::triangle_area;
use crate::error::{RemeshError, Result};

/// Edge length bound for a uniform sampling of `num_samples` sites.
///
/// Models the ideal output as an equilateral tiling of the total surface
/// area with one vertex per sample: a mesh with `n` vertices carries about
/// `2n` equilateral triangles of side `h`, giving
/// `h = sqrt(2 * area / (sqrt(3) * n))`.
///
/// # Errors
///
/// Returns an error if `num_samples` is zero.
pub fn max_edge_length(
    points: &[Point3<f64>],
    triangles: &[[usize; 3]],
    num_samples: usize,
) -> Result<f64> {
    if num_samples == 0 {
        return Err(RemeshError::invalid_param(
            "num_samples",
            num_samples,
            "must be at least 1",
        ));
    }
    validate_triangles(points, triangles)?;

    let area: f64 = triangles
        .iter()
        .map(|tri| triangle_area(&points[tri[0]], &points[tri[1]], &points[tri[2]]))
        .sum();

    Ok((2.0 * area / (3.0_f64.sqrt() * num_samples as f64)).sqrt())
}

/// Split every edge longer than `max_len` at its midpoint, in place.
///
/// Each pass collects the edges exceeding the bound and splits them one by
/// one, replacing both incident triangles with two halves sharing the new
/// midpoint vertex, so the triangulation stays conforming. Passes repeat
/// until no edge exceeds the bound; edges created by a split are examined
/// in the following pass. New vertices are appended after the existing
/// ones, preserving original vertex indices.
///
/// # Errors
///
/// Returns an error if `max_len` is not a positive finite number or a
/// triangle is out of range.
pub fn resample(
    points: &mut Vec<Point3<f64>>,
    triangles: &mut Vec<[usize; 3]>,
    max_len: f64,
) -> Result<()> {
    if !(max_len.is_finite() && max_len > 0.0) {
        return Err(RemeshError::invalid_param(
            "max_len",
            max_len,
            "must be positive and finite",
        ));
    }
    validate_triangles(points, triangles)?;

    loop {
        let mut long_edges: Vec<(usize, usize)> = Vec::new();
        let mut seen: HashSet<(usize, usize)> = HashSet::new();
        for tri in triangles.iter() {
            for k in 0..3 {
                let v0 = tri[k];
                let v1 = tri[(k + 1) % 3];
                let edge = if v0 < v1 { (v0, v1) } else { (v1, v0) };
                if !seen.insert(edge) {
                    continue;
                }
                if (points[v1] - points[v0]).norm() > max_len {
                    long_edges.push(edge);
                }
            }
        }

        if long_edges.is_empty() {
            return Ok(());
        }

        for (v0, v1) in long_edges {
            split_edge(points, triangles, v0, v1);
        }
    }
}

/// Split edge `(v0, v1)` at its midpoint.
fn split_edge(
    points: &mut Vec<Point3<f64>>,
    triangles: &mut Vec<[usize; 3]>,
    v0: usize,
    v1: usize,
) {
    let midpoint = Point3::from((points[v0].coords + points[v1].coords) * 0.5);
    let mid = points.len();
    points.push(midpoint);

    let mut updated: Vec<[usize; 3]> = Vec::with_capacity(triangles.len() + 2);
    for tri in triangles.iter() {
        let mut split_at = None;
        for j in 0..3 {
            let a = tri[j];
            let b = tri[(j + 1) % 3];
            if (a == v0 && b == v1) || (a == v1 && b == v0) {
                split_at = Some(j);
                break;
            }
        }

        match split_at {
            Some(j) => {
                let a = tri[j];
                let b = tri[(j + 1) % 3];
                let c = tri[(j + 2) % 3];
                updated.push([a, mid, c]);
                updated.push([mid, b, c]);
            }
            None => updated.push(*tri),
        }
    }

    *triangles = updated;
}

fn validate_triangles(points: &[Point3<f64>], triangles: &[[usize; 3]]) -> Result<()> {
    for (fi, tri) in triangles.iter().enumerate() {
        for &v in tri {
            if v >= points.len() {
                return Err(RemeshError::InvalidVertexIndex { face: fi, vertex: v });
            }
        }
    }
    Ok(())
}
