//! Object File Format (OFF) support.
//!
//! Plain ASCII OFF: an `OFF` header, a counts line, the vertex block, then
//! the face block. Comment lines (`#`) and blank lines are skipped. Faces
//! with more than three vertices are fan-triangulated on load; per-face
//! color trailers are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::error::{RemeshError, Result};

/// Load a triangle mesh from an OFF file.
///
/// # Example
///
/// ```no_run
/// use gravel::io::off;
///
/// let (points, triangles) = off::load("model.off").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<(Vec<Point3<f64>>, Vec<[usize; 3]>)> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let fail = |message: String| RemeshError::LoadError {
        path: path.to_path_buf(),
        message,
    };

    let mut lines = reader.lines().filter_map(|line| match line {
        Ok(text) => {
            let trimmed = text.trim().to_string();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                None
            } else {
                Some(Ok(trimmed))
            }
        }
        Err(e) => Some(Err(e)),
    });

    let header = lines
        .next()
        .transpose()?
        .ok_or_else(|| fail("empty file".to_string()))?;
    if header != "OFF" {
        return Err(fail(format!("expected OFF header, found '{}'", header)));
    }

    let counts = lines
        .next()
        .transpose()?
        .ok_or_else(|| fail("missing counts line".to_string()))?;
    let mut tokens = counts.split_whitespace();
    let num_vertices: usize = tokens
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| fail("malformed vertex count".to_string()))?;
    let num_faces: usize = tokens
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| fail("malformed face count".to_string()))?;

    let mut points = Vec::with_capacity(num_vertices);
    for i in 0..num_vertices {
        let line = lines
            .next()
            .transpose()?
            .ok_or_else(|| fail(format!("expected {} vertices, found {}", num_vertices, i)))?;
        let mut tokens = line.split_whitespace();
        let mut coords = [0.0f64; 3];
        for coord in &mut coords {
            *coord = tokens
                .next()
                .and_then(|t| t.parse().ok())
                .ok_or_else(|| fail(format!("malformed vertex {}", i)))?;
        }
        points.push(Point3::new(coords[0], coords[1], coords[2]));
    }

    let mut triangles = Vec::with_capacity(num_faces);
    for i in 0..num_faces {
        let line = lines
            .next()
            .transpose()?
            .ok_or_else(|| fail(format!("expected {} faces, found {}", num_faces, i)))?;
        let mut tokens = line.split_whitespace();
        let arity: usize = tokens
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| fail(format!("malformed face {}", i)))?;
        if arity < 3 {
            return Err(fail(format!("face {} has fewer than 3 vertices", i)));
        }

        let mut indices = Vec::with_capacity(arity);
        for _ in 0..arity {
            let v: usize = tokens
                .next()
                .and_then(|t| t.parse().ok())
                .ok_or_else(|| fail(format!("malformed face {}", i)))?;
            if v >= points.len() {
                return Err(fail(format!("face {} index {} out of range", i, v)));
            }
            indices.push(v);
        }
        for k in 1..arity - 1 {
            triangles.push([indices[0], indices[k], indices[k + 1]]);
        }
    }

    Ok((points, triangles))
}

/// Save a triangle mesh to an OFF file.
///
/// # Example
///
/// ```no_run
/// use gravel::io::off;
/// use nalgebra::Point3;
///
/// let points = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// off::save("output.off", &points, &[[0, 1, 2]]).unwrap();
/// ```
pub fn save<P: AsRef<Path>>(
    path: P,
    points: &[Point3<f64>],
    triangles: &[[usize; 3]],
) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| RemeshError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "OFF")?;
    writeln!(writer, "{} {} 0", points.len(), triangles.len())?;
    for p in points {
        writeln!(writer, "{} {} {}", p.x, p.y, p.z)?;
    }
    for tri in triangles {
        writeln!(writer, "3 {} {} {}", tri[0], tri[1], tri[2])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_temp(content: &str) -> tempfile::TempPath {
        let mut file = tempfile::Builder::new()
            .suffix(".off")
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.into_temp_path()
    }

    #[test]
    fn test_load_simple_off() {
        let path = write_temp(
            "OFF\n\
             # a triangle\n\
             3 1 0\n\
             0.0 0.0 0.0\n\
             1.0 0.0 0.0\n\
             0.0 1.0 0.0\n\
             3 0 1 2\n",
        );
        let (points, triangles) = load(&path).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(triangles, vec![[0, 1, 2]]);
    }

    #[test]
    fn test_load_quad_fan_triangulated() {
        let path = write_temp(
            "OFF\n4 1 0\n0 0 0\n1 0 0\n1 1 0\n0 1 0\n4 0 1 2 3\n",
        );
        let (_, triangles) = load(&path).unwrap();
        assert_eq!(triangles, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_load_rejects_bad_header_and_counts() {
        let path = write_temp("PLY\n3 0 0\n");
        assert!(matches!(load(&path), Err(RemeshError::LoadError { .. })));

        let path = write_temp("OFF\n3 1 0\n0 0 0\n1 0 0\n");
        assert!(matches!(load(&path), Err(RemeshError::LoadError { .. })));

        let path = write_temp("OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 5\n");
        assert!(matches!(load(&path), Err(RemeshError::LoadError { .. })));
    }

    #[test]
    fn test_round_trip() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.5),
            Point3::new(0.0, 1.0, -0.5),
            Point3::new(1.0, 1.0, 0.0),
        ];
        let triangles = vec![[0, 1, 2], [1, 3, 2]];

        let path = tempfile::Builder::new()
            .suffix(".off")
            .tempfile()
            .unwrap()
            .into_temp_path();
        save(&path, &points, &triangles).unwrap();
        let (loaded_points, loaded_triangles) = load(&path).unwrap();

        assert_eq!(loaded_points, points);
        assert_eq!(loaded_triangles, triangles);
    }
}
