//! Error types for gravel.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`RemeshError`].
pub type Result<T> = std::result::Result<T, RemeshError>;

/// Errors that can occur during remeshing operations.
#[derive(Error, Debug)]
pub enum RemeshError {
    /// The input mesh has no vertices or no faces.
    #[error("mesh is empty")]
    EmptyMesh,

    /// A triangle references a vertex index outside the vertex array.
    #[error("triangle {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The triangle index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A triangle has duplicate vertex indices.
    #[error("triangle {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The triangle index.
        face: usize,
    },

    /// An edge references a vertex index outside the vertex array.
    #[error("edge {edge} references invalid vertex index {vertex}")]
    InvalidEdgeIndex {
        /// The edge index.
        edge: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A seed index is outside the graph's vertex range.
    #[error("seed vertex {seed} is out of range")]
    SeedOutOfRange {
        /// The offending seed index.
        seed: usize,
    },

    /// The same vertex appears twice in a seed set.
    #[error("seed vertex {seed} appears more than once")]
    DuplicateSeed {
        /// The repeated seed index.
        seed: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading a mesh or matrix from file.
    #[error("failed to load {}: {message}", path.display())]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving a mesh or matrix to file.
    #[error("failed to save {}: {message}", path.display())]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },
}

impl RemeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        RemeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
