//! MatrixMarket export for the sparse weight map.
//!
//! Writes the `matrix coordinate real general` flavor of the MatrixMarket
//! text format, the lingua franca sparse interchange format that numeric
//! front-ends load directly. Indices are 1-based in the file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use sprs::CsMat;

use crate::error::{RemeshError, Result};

/// Save a sparse matrix in MatrixMarket coordinate format.
///
/// Entries are written in row-major order. Structural zeros, if any, are
/// written as stored.
///
/// # Example
///
/// ```no_run
/// use gravel::io::matrix;
/// use sprs::TriMat;
///
/// let mut m = TriMat::new((2, 3));
/// m.add_triplet(0, 0, 1.0);
/// m.add_triplet(1, 2, 0.5);
/// matrix::save_matrix_market("weights.mtx", &m.to_csr()).unwrap();
/// ```
pub fn save_matrix_market<P: AsRef<Path>>(path: P, matrix: &CsMat<f64>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| RemeshError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "%%MatrixMarket matrix coordinate real general")?;
    let (rows, cols) = matrix.shape();
    writeln!(writer, "{} {} {}", rows, cols, matrix.nnz())?;

    for (row, vec) in matrix.outer_iterator().enumerate() {
        for (col, &value) in vec.iter() {
            writeln!(writer, "{} {} {}", row + 1, col + 1, value)?;
        }
    }

    writer.flush()?;
    Ok(())
}
