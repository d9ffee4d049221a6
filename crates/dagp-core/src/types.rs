//! Type aliases and matrix helpers.
//!
//! Inputs are always stored one observation per row: an `n × d` matrix holds
//! `n` points of dimension `d`.

use nalgebra::{DMatrix, DVector};

use crate::error::GpError;

/// Row-per-observation input matrix.
pub type Matrix = DMatrix<f64>;

/// Column vector of outputs, means or variances.
pub type Vector = DVector<f64>;

/// Build an input matrix from row vectors.
///
/// # Errors
///
/// Returns [`GpError::EmptyTrainingSet`] for no rows and
/// [`GpError::RaggedRows`] when the rows are not all the same length.
pub fn matrix_from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Matrix, GpError> {
    let first = rows.first().ok_or(GpError::EmptyTrainingSet)?;
    let cols = first.as_ref().len();
    for (row, values) in rows.iter().enumerate() {
        let found = values.as_ref().len();
        if found != cols {
            return Err(GpError::RaggedRows {
                row,
                expected: cols,
                found,
            });
        }
    }
    Ok(Matrix::from_fn(rows.len(), cols, |i, j| rows[i].as_ref()[j]))
}

/// Copy row `i` of `x` into an owned vector.
#[inline]
pub fn row_vec(x: &Matrix, i: usize) -> Vec<f64> {
    x.row(i).iter().copied().collect()
}

/// Stack the rows of `top` above the rows of `bottom`.
///
/// Both matrices must have the same column count.
pub fn vstack(top: &Matrix, bottom: &Matrix) -> Result<Matrix, GpError> {
    if top.ncols() != bottom.ncols() {
        return Err(GpError::DimensionMismatch {
            expected: top.ncols(),
            found: bottom.ncols(),
        });
    }
    let rows = top.nrows() + bottom.nrows();
    Ok(Matrix::from_fn(rows, top.ncols(), |i, j| {
        if i < top.nrows() {
            top[(i, j)]
        } else {
            bottom[(i - top.nrows(), j)]
        }
    }))
}

/// Check that every entry of `values` is finite.
pub fn ensure_finite<'a>(
    values: impl IntoIterator<Item = &'a f64>,
    what: &'static str,
) -> Result<(), GpError> {
    if values.into_iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(GpError::NonFinite(what))
    }
}
