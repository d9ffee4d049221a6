//! Prediction error metrics.

use dagp_core::Vector;

use crate::error::InputError;

/// Mean of squared differences between `predicted` and `truth`.
pub fn mean_squared_error(predicted: &Vector, truth: &Vector) -> Result<f64, InputError> {
    if predicted.len() != truth.len() {
        return Err(InputError::RowCountMismatch {
            inputs: predicted.len(),
            outputs: truth.len(),
        });
    }
    if truth.is_empty() {
        return Err(InputError::Empty);
    }
    if truth.iter().any(|v| !v.is_finite()) {
        return Err(InputError::NonFinite);
    }
    let sum: f64 = predicted
        .iter()
        .zip(truth.iter())
        .map(|(p, t)| (p - t).powi(2))
        .sum();
    Ok(sum / truth.len() as f64)
}
