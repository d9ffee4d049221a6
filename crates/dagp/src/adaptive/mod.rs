//! Uncertainty-driven adaptation of fitted surrogates.
//!
//! Each round runs Select → Evaluate → Retrain:
//! - **Select**: predictive variance on a candidate grid over the current
//!   domain bounds; the first grid point of maximum variance wins
//! - **Evaluate**: the high-fidelity function at that point
//! - **Retrain**: append the pair and refit from scratch on the full set
//!
//! With `eps > 0` the loop stops before Evaluate once the maximum variance
//! drops below `eps`.

mod loop_runner;

pub use loop_runner::{run_adaptation, AdaptConfig, AdaptOutcome, AdaptRound};

use dagp_core::{Bounds, Matrix, Prediction, Vector};

use crate::dataset::FidelityDataset;
use crate::error::Result;
use crate::metrics::mean_squared_error;

/// A fitted surrogate the adaptation loop can drive.
pub trait ActiveModel {
    /// Dimension of raw inputs.
    fn input_dim(&self) -> usize;

    /// Bounds over every input fitted so far.
    fn bounds(&self) -> Option<&Bounds>;

    /// Current high-fidelity training data, absent before the first fit.
    fn dataset(&self) -> Option<&FidelityDataset>;

    /// Predictive mean and variance per row of `x`.
    fn predict(&self, x: &Matrix) -> Result<Prediction>;

    /// The high-fidelity function at `point`.
    fn evaluate_high_fidelity(&self, point: &[f64]) -> f64;

    /// Replace the training data and refit from scratch.
    fn refit(&mut self, dataset: FidelityDataset) -> Result<()>;

    /// Mean squared error of predictive means against `y_test`.
    fn assess_mse(&self, x_test: &Matrix, y_test: &Vector) -> Result<f64> {
        let prediction = self.predict(x_test)?;
        Ok(mean_squared_error(&prediction.mean, y_test)?)
    }

    /// `log2` of [`assess_mse`](Self::assess_mse).
    fn assess_log_mse(&self, x_test: &Matrix, y_test: &Vector) -> Result<f64> {
        Ok(self.assess_mse(x_test, y_test)?.log2())
    }
}
