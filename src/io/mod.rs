//! Mesh and matrix file I/O.
//!
//! This module provides loading and saving of triangle meshes in face-vertex
//! form, plus an exporter for the sparse weight map.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save |
//! |--------|-----------|------|------|
//! | Wavefront OBJ | `.obj` | ✓ | ✓ |
//! | OFF | `.off` | ✓ | ✓ |
//! | MatrixMarket | `.mtx` | ✗ | ✓ |
//!
//! # Usage
//!
//! ```no_run
//! use gravel::io::{load, save};
//!
//! let (points, triangles) = load("model.obj").unwrap();
//! save("output.off", &points, &triangles).unwrap();
//! ```

pub mod matrix;
pub mod obj;
pub mod off;

use std::path::Path;

use nalgebra::Point3;

use crate::error::{RemeshError, Result};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
    /// Object File Format (OFF).
    Off,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "off" => Some(Format::Off),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

fn format_of<P: AsRef<Path>>(path: P) -> Result<Format> {
    let path = path.as_ref();
    Format::from_path(path).ok_or_else(|| RemeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load a triangle mesh from a file with automatic format detection.
///
/// The format is determined by the file extension. Polygonal faces are
/// triangulated on load.
pub fn load<P: AsRef<Path>>(path: P) -> Result<(Vec<Point3<f64>>, Vec<[usize; 3]>)> {
    match format_of(&path)? {
        Format::Obj => obj::load(path),
        Format::Off => off::load(path),
    }
}

/// Save a triangle mesh to a file with automatic format detection.
///
/// The format is determined by the file extension.
pub fn save<P: AsRef<Path>>(
    path: P,
    points: &[Point3<f64>],
    triangles: &[[usize; 3]],
) -> Result<()> {
    match format_of(&path)? {
        Format::Obj => obj::save(path, points, triangles),
        Format::Off => off::save(path, points, triangles),
    }
}
