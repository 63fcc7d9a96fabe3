//! Remeshing algorithms.
//!
//! The pipeline runs through these modules in order:
//!
//! - **Dijkstra**: multi-source shortest paths over the surface graph,
//!   producing a Voronoi partition of the vertex set
//! - **Sampling**: geodesic farthest-point sampling driving the partition
//! - **Dual**: coarse mesh construction from the partition, with
//!   orientation fixup
//! - **Weights**: sparse barycentric transfer map between resolutions
//! - **Resample**: optional edge-length-bounded refinement of sparse input
//! - **Evaluate**: distance and triangle-quality metrics for the result

pub mod dijkstra;
pub mod dual;
pub mod evaluate;
pub mod resample;
pub mod sampling;
pub mod weights;

mod progress;

pub use progress::Progress;

use nalgebra::Point3;

// ============================================================================
// Shared Helpers - Triangle Geometry
// ============================================================================

/// Area of the triangle spanned by three points.
pub(crate) fn triangle_area(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> f64 {
    (b - a).cross(&(c - a)).norm() * 0.5
}

/// Closest point to `p` on triangle `(a, b, c)`, including its edges.
///
/// Falls back to the centroid for degenerate triangles.
pub(crate) fn closest_point_in_triangle(
    p: &Point3<f64>,
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
) -> Point3<f64> {
    let e1 = b - a;
    let e2 = c - a;
    let normal = e1.cross(&e2);
    let area2 = normal.norm();
    if area2 < 1e-12 {
        return Point3::from((a.coords + b.coords + c.coords) / 3.0);
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
        return Point3::from((a.coords + b.coords + c.coords) / 3.0);
    }

    let u = (dot11 * dot02 - dot01 * dot12) / denom;
    let v = (dot00 * dot12 - dot01 * dot02) / denom;

    if u >= 0.0 && v >= 0.0 && u + v <= 1.0 {
        return proj;
    }

    let candidates = [
        closest_point_on_segment(p, a, b),
        closest_point_on_segment(p, b, c),
        closest_point_on_segment(p, c, a),
    ];
    let mut best = candidates[0];
    let mut best_dist = (candidates[0] - p).norm_squared();
    for &q in &candidates[1..] {
        let d = (q - p).norm_squared();
        if d < best_dist {
            best_dist = d;
            best = q;
        }
    }
    best
}

/// Closest point to `p` on segment `(a, b)`.
pub(crate) fn closest_point_on_segment(
    p: &Point3<f64>,
    a: &Point3<f64>,
    b: &Point3<f64>,
) -> Point3<f64> {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 < 1e-12 {
        return *a;
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    Point3::from(a.coords + ab * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_area() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(2.0, 0.0, 0.0);
        let c = Point3::new(0.0, 2.0, 0.0);
        assert!((triangle_area(&a, &b, &c) - 2.0).abs() < 1e-15);
    }

    #[test]
    fn test_closest_point_interior() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);

        let p = Point3::new(0.25, 0.25, 1.0);
        let q = closest_point_in_triangle(&p, &a, &b, &c);
        assert!((q - Point3::new(0.25, 0.25, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_closest_point_clamps_to_vertex_and_edge() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);

        let q = closest_point_in_triangle(&Point3::new(-1.0, -1.0, 0.0), &a, &b, &c);
        assert!((q - a).norm() < 1e-12);

        let q = closest_point_in_triangle(&Point3::new(0.5, -1.0, 0.0), &a, &b, &c);
        assert!((q - Point3::new(0.5, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_closest_point_on_segment_clamps() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(2.0, 0.0, 0.0);

        let mid = closest_point_on_segment(&Point3::new(1.0, 1.0, 0.0), &a, &b);
        assert!((mid - Point3::new(1.0, 0.0, 0.0)).norm() < 1e-12);

        let start = closest_point_on_segment(&Point3::new(-1.0, 0.0, 0.0), &a, &b);
        assert!((start - a).norm() < 1e-12);

        let end = closest_point_on_segment(&Point3::new(3.0, 0.0, 0.0), &a, &b);
        assert!((end - b).norm() < 1e-12);
    }
}
