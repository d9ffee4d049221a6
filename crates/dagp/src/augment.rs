//! Feature augmentation with shifted low-fidelity predictions.
//!
//! Each raw row `x` is extended with `2n + 1` columns
//! `f_low(x + o_j · tau)` for offsets `o_0 .. o_2n`. The shift is applied to
//! every raw component.

use dagp_core::Matrix;

use crate::config::Config;
use crate::error::{ConfigError, Result};
use crate::low_fidelity::LowFidelityModel;
use crate::types::check_inputs;

/// Produces the shift multipliers for a stencil of half-width `n`.
///
/// Implementations must return exactly `2n + 1` finite values.
pub trait OffsetGenerator: Send + Sync {
    /// Offsets for half-width `n`, in column order.
    fn offsets(&self, n: usize) -> Vec<f64>;
}

/// The integers `-n ..= n` in ascending order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SymmetricOffsets;

impl OffsetGenerator for SymmetricOffsets {
    fn offsets(&self, n: usize) -> Vec<f64> {
        let n = n as i64;
        (-n..=n).map(|k| k as f64).collect()
    }
}

/// Appends shifted low-fidelity predictions to raw inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureAugmenter {
    tau: f64,
    input_dim: usize,
    offsets: Vec<f64>,
}

impl FeatureAugmenter {
    /// Build an augmenter from `config.tau`, `config.n` and `config.input_dim`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OffsetCount`] if the generator does not return
    /// `2n + 1` values, or [`ConfigError::NonFiniteOffset`].
    pub fn new(
        config: &Config,
        generator: &dyn OffsetGenerator,
    ) -> std::result::Result<Self, ConfigError> {
        let offsets = generator.offsets(config.n);
        let expected = config.augmented_dim();
        if offsets.len() != expected {
            return Err(ConfigError::OffsetCount {
                expected,
                found: offsets.len(),
            });
        }
        if offsets.iter().any(|o| !o.is_finite()) {
            return Err(ConfigError::NonFiniteOffset);
        }
        Ok(Self {
            tau: config.tau,
            input_dim: config.input_dim,
            offsets,
        })
    }

    /// Offsets in column order.
    pub fn offsets(&self) -> &[f64] {
        &self.offsets
    }

    /// Number of appended columns.
    pub fn augmented_dim(&self) -> usize {
        self.offsets.len()
    }

    /// Width of augmented rows, `input_dim + 2n + 1`.
    pub fn output_dim(&self) -> usize {
        self.input_dim + self.augmented_dim()
    }

    /// Augment every row of `x`.
    ///
    /// # Errors
    ///
    /// Input checks run before any low-fidelity call; failures of the
    /// low-fidelity model propagate.
    pub fn augment(&self, low: &LowFidelityModel, x: &Matrix) -> Result<Matrix> {
        check_inputs(x, self.input_dim)?;
        let mut out = Matrix::zeros(x.nrows(), self.output_dim());
        out.columns_mut(0, self.input_dim).copy_from(x);
        for (j, &offset) in self.offsets.iter().enumerate() {
            let shifted = x.add_scalar(offset * self.tau);
            let values = low.predict(&shifted)?;
            out.column_mut(self.input_dim + j).copy_from(&values);
        }
        Ok(out)
    }
}
