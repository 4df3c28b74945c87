//! Plain-text serialization of classification results.
//!
//! Every artifact is a whitespace-separated numeric matrix or vector.
//! Motifs are written W x 4 (one line per motif position, one column per
//! base), the transpose of their internal 4 x W layout. Values use Rust's
//! shortest round-trippable `f64` formatting, so files parse back to the
//! exact bit patterns the engine produced.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::engine::EmSequenceEngine;
use crate::matrix::{Matrix2D, Matrix3D, Matrix4D};
use crate::types::SeqClustError;

/// Writes a rank-2 matrix, one row per line.
///
/// # Errors
///
/// Propagates I/O failures from the writer.
pub fn write_matrix<W: Write>(writer: &mut W, matrix: &Matrix2D<f64>) -> io::Result<()> {
    for row in matrix.rows() {
        write_row(writer, row)?;
    }
    Ok(())
}

/// Writes a 4 x W motif in its serialized W x 4 orientation.
///
/// # Errors
///
/// Propagates I/O failures from the writer.
pub fn write_motif<W: Write>(writer: &mut W, motif: &Matrix2D<f64>) -> io::Result<()> {
    write_matrix(writer, &motif.transposed())
}

/// Writes the posterior tensor as one line per sequence, flattening the
/// (class, shift, orientation) axes in row-major order.
///
/// # Errors
///
/// Propagates I/O failures from the writer.
pub fn write_posterior<W: Write>(writer: &mut W, posterior: &Matrix4D<f64>) -> io::Result<()> {
    let [_, n_class, n_shift, n_flip] = posterior.dim();
    let per_seq = n_class * n_shift * n_flip;
    for row in posterior.as_slice().chunks(per_seq) {
        write_row(writer, row)?;
    }
    Ok(())
}

/// Writes the class-probability tensor as one line per class, flattening
/// the (shift, orientation) axes in row-major order.
///
/// # Errors
///
/// Propagates I/O failures from the writer.
pub fn write_class_prob<W: Write>(writer: &mut W, class_prob: &Matrix3D<f64>) -> io::Result<()> {
    let [_, n_shift, n_flip] = class_prob.dim();
    for row in class_prob.as_slice().chunks(n_shift * n_flip) {
        write_row(writer, row)?;
    }
    Ok(())
}

/// Writes a vector on a single line.
///
/// # Errors
///
/// Propagates I/O failures from the writer.
pub fn write_vector<W: Write>(writer: &mut W, values: &[f64]) -> io::Result<()> {
    write_row(writer, values)
}

fn write_row<W: Write>(writer: &mut W, values: &[f64]) -> io::Result<()> {
    let mut first = true;
    for value in values {
        if first {
            first = false;
        } else {
            write!(writer, " ")?;
        }
        write!(writer, "{}", value)?;
    }
    writeln!(writer)
}

/// Writes the full result set of an engine under a path prefix.
///
/// Produces `<prefix>_motif_<k>.mat` for every class (1-based, background
/// class last when configured), plus `<prefix>_posterior.mat`,
/// `<prefix>_class_prob.mat`, and `<prefix>_class_prob_marginal.mat`.
/// Returns the paths written.
///
/// # Errors
///
/// Returns [`SeqClustError::IoError`] if any file cannot be created or
/// written.
pub fn write_result_files(
    engine: &EmSequenceEngine,
    prefix: &Path,
) -> Result<Vec<PathBuf>, SeqClustError> {
    let mut written = Vec::new();
    let prefix_display = prefix.display();

    for (k, motif) in engine.motifs().iter().enumerate() {
        let path = PathBuf::from(format!("{}_motif_{}.mat", prefix_display, k + 1));
        let mut writer = BufWriter::new(File::create(&path)?);
        write_motif(&mut writer, motif)?;
        writer.flush()?;
        written.push(path);
    }

    let path = PathBuf::from(format!("{}_posterior.mat", prefix_display));
    let mut writer = BufWriter::new(File::create(&path)?);
    write_posterior(&mut writer, &engine.posterior())?;
    writer.flush()?;
    written.push(path);

    let path = PathBuf::from(format!("{}_class_prob.mat", prefix_display));
    let mut writer = BufWriter::new(File::create(&path)?);
    write_class_prob(&mut writer, &engine.class_prob())?;
    writer.flush()?;
    written.push(path);

    let path = PathBuf::from(format!("{}_class_prob_marginal.mat", prefix_display));
    let mut writer = BufWriter::new(File::create(&path)?);
    write_vector(&mut writer, &engine.class_prob_marginal())?;
    writer.flush()?;
    written.push(path);

    Ok(written)
}
