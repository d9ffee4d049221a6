//! Shared aliases and input checks.

use std::sync::Arc;

use dagp_core::types::row_vec;
use dagp_core::{Matrix, Vector};

use crate::error::InputError;

/// A scalar function `ℝ^d → ℝ`, called once per input row.
///
/// Functions are treated as free to call and safe to call repeatedly.
pub type Objective = Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>;

/// Wrap a closure as an [`Objective`].
pub fn objective<F>(f: F) -> Objective
where
    F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Apply `f` to every row of `x`.
pub fn evaluate_rows(f: &Objective, x: &Matrix) -> Vector {
    Vector::from_iterator(x.nrows(), (0..x.nrows()).map(|i| f(&row_vec(x, i))))
}

/// Check that `x` is a non-empty, finite `· × input_dim` matrix.
///
/// Column count is checked first so a mis-shaped empty matrix reports the
/// mismatch.
pub fn check_inputs(x: &Matrix, input_dim: usize) -> Result<(), InputError> {
    if x.ncols() != input_dim {
        return Err(InputError::ColumnMismatch {
            expected: input_dim,
            found: x.ncols(),
        });
    }
    if x.nrows() == 0 {
        return Err(InputError::Empty);
    }
    if x.iter().any(|v| !v.is_finite()) {
        return Err(InputError::NonFinite);
    }
    Ok(())
}

/// Check that `y` is finite and has one value per row of `x`.
pub fn check_outputs(x: &Matrix, y: &Vector) -> Result<(), InputError> {
    if x.nrows() != y.len() {
        return Err(InputError::RowCountMismatch {
            inputs: x.nrows(),
            outputs: y.len(),
        });
    }
    if y.iter().any(|v| !v.is_finite()) {
        return Err(InputError::NonFinite);
    }
    Ok(())
}
