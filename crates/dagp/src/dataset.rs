//! Training data and the domain it spans.

use dagp_core::types::vstack;
use dagp_core::{Bounds, Matrix, Vector};

use crate::error::{InputError, Result};
use crate::types::{check_inputs, check_outputs};

/// Paired inputs `X (m × d)` and outputs `y (m)`.
///
/// Rows and values always line up; every value is finite.
#[derive(Debug, Clone, PartialEq)]
pub struct FidelityDataset {
    inputs: Matrix,
    outputs: Vector,
}

impl FidelityDataset {
    /// Pair `inputs` with `outputs`.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] for empty or non-finite data, or when the row
    /// and value counts differ.
    pub fn new(inputs: Matrix, outputs: Vector) -> std::result::Result<Self, InputError> {
        check_inputs(&inputs, inputs.ncols())?;
        check_outputs(&inputs, &outputs)?;
        Ok(Self { inputs, outputs })
    }

    /// Append one observation.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] if `point` has the wrong width or either value
    /// is non-finite.
    pub fn push(&mut self, point: &[f64], value: f64) -> Result<()> {
        let row = Matrix::from_row_slice(1, point.len(), point);
        check_inputs(&row, self.input_dim())?;
        if !value.is_finite() {
            return Err(InputError::NonFinite.into());
        }
        self.inputs = vstack(&self.inputs, &row)?;
        let len = self.outputs.len() + 1;
        self.outputs = Vector::from_iterator(len, self.outputs.iter().copied().chain([value]));
        Ok(())
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Always false; kept for API symmetry with [`len`](Self::len).
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Input dimension.
    pub fn input_dim(&self) -> usize {
        self.inputs.ncols()
    }

    /// Input rows.
    pub fn inputs(&self) -> &Matrix {
        &self.inputs
    }

    /// Output values.
    pub fn outputs(&self) -> &Vector {
        &self.outputs
    }
}

/// Component-wise bounds over every input a model has been fitted on.
///
/// Absent until the first observation, then only ever widened.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainBounds(Option<Bounds>);

impl DomainBounds {
    /// Include every row of `x`.
    pub fn observe(&mut self, x: &Matrix) -> Result<()> {
        match &mut self.0 {
            Some(bounds) => bounds.widen(x)?,
            None => self.0 = Some(Bounds::from_rows(x)?),
        }
        Ok(())
    }

    /// Current bounds, if any inputs have been observed.
    pub fn get(&self) -> Option<&Bounds> {
        self.0.as_ref()
    }
}
