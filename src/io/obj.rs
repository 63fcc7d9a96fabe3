//! Wavefront OBJ format support.
//!
//! Parsing is delegated to the `tobj` crate; this module adapts its output
//! into face-vertex arrays. Polygonal faces are triangulated by the parser,
//! all objects and groups in the file are merged into one mesh, and
//! normals, texture coordinates, and materials are discarded. Point and
//! line elements are ignored.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::error::{RemeshError, Result};

/// Load a triangle mesh from an OBJ file.
///
/// # Example
///
/// ```no_run
/// use gravel::io::obj;
///
/// let (points, triangles) = obj::load("model.obj").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<(Vec<Point3<f64>>, Vec<[usize; 3]>)> {
    let path = path.as_ref();

    let options = tobj::LoadOptions {
        triangulate: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    };
    let (models, _materials) = tobj::load_obj(path, &options).map_err(|e| {
        RemeshError::LoadError {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    // Merge all models into a single vertex and triangle list, offsetting
    // each model's indices past the vertices gathered so far.
    let mut points: Vec<Point3<f64>> = Vec::new();
    let mut triangles: Vec<[usize; 3]> = Vec::new();
    for model in &models {
        let mesh = &model.mesh;
        let base = points.len();

        for p in mesh.positions.chunks_exact(3) {
            points.push(Point3::new(p[0], p[1], p[2]));
        }
        for tri in mesh.indices.chunks_exact(3) {
            triangles.push([
                base + tri[0] as usize,
                base + tri[1] as usize,
                base + tri[2] as usize,
            ]);
        }
    }

    if points.is_empty() {
        return Err(RemeshError::LoadError {
            path: path.to_path_buf(),
            message: "file contains no geometry".to_string(),
        });
    }

    Ok((points, triangles))
}

/// Save a triangle mesh to an OBJ file.
///
/// `tobj` only parses, so writing is a plain formatter: one `v` record per
/// point, one `f` record per triangle, indices 1-based.
///
/// # Example
///
/// ```no_run
/// use gravel::io::obj;
/// use nalgebra::Point3;
///
/// let points = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// obj::save("output.obj", &points, &[[0, 1, 2]]).unwrap();
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

    for p in points {
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for tri in triangles {
        writeln!(writer, "f {} {} {}", tri[0] + 1, tri[1] + 1, tri[2] + 1)?;
    }

    writer.flush()?;
    Ok(())
}
