//! Configuration for data-augmentation models.

use dagp_core::constants::{
    DEFAULT_ADAPT_GRID_POINTS, DEFAULT_HF_RESTARTS, DEFAULT_LF_GRID_POINTS, DEFAULT_LF_RESTARTS,
    DEFAULT_SEED,
};
use dagp_core::{CandidateGrid, KernelFamilies, OptimizerConfig};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Settings shared by a [`DataAugmentationGp`](crate::DataAugmentationGp)
/// and its learned low-fidelity model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Dimension of raw inputs.
    ///
    /// Default: 1
    pub input_dim: usize,

    /// Shift scale applied to raw inputs before querying the low-fidelity
    /// model.
    ///
    /// Default: 0.001
    pub tau: f64,

    /// Half-width of the shift stencil; `2n + 1` augmented columns.
    ///
    /// Default: 1
    ///
    /// `n = 0` augments with the low-fidelity value at `x` only.
    pub n: usize,

    /// Number of adaptation steps the model is built for.
    ///
    /// Default: 0
    ///
    /// A learned low-fidelity model runs `adapt_steps × ratio` refinement
    /// rounds at construction.
    pub adapt_steps: usize,

    /// Likelihood optimizations per high-fidelity fit.
    ///
    /// Default: 6
    pub hf_restarts: usize,

    /// Likelihood optimizations per low-fidelity refinement round.
    ///
    /// Default: 5
    pub lf_restarts: usize,

    /// Candidate points per low-fidelity refinement round.
    ///
    /// Default: 100
    pub lf_grid_points: usize,

    /// Candidate points per high-fidelity adaptation step.
    ///
    /// Default: 200
    pub adapt_grid_points: usize,

    /// Layout of candidate points over the domain bounds.
    ///
    /// Default: [`CandidateGrid::Tensor`]
    pub grid: CandidateGrid,

    /// Kernel families of the composite kernel components.
    pub kernels: KernelFamilies,

    /// Simplex stopping criteria for every likelihood optimization.
    pub optimizer: OptimizerConfig,

    /// Seed for restart perturbations.
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dim: 1,
            tau: 0.001,
            n: 1,
            adapt_steps: 0,
            hf_restarts: DEFAULT_HF_RESTARTS,
            lf_restarts: DEFAULT_LF_RESTARTS,
            lf_grid_points: DEFAULT_LF_GRID_POINTS,
            adapt_grid_points: DEFAULT_ADAPT_GRID_POINTS,
            grid: CandidateGrid::default(),
            kernels: KernelFamilies::default(),
            optimizer: OptimizerConfig::default(),
            seed: DEFAULT_SEED,
        }
    }
}

impl Config {
    /// Create a config for the given shift scale, stencil and input dimension.
    pub fn new(tau: f64, n: usize, input_dim: usize) -> Self {
        Self {
            tau,
            n,
            input_dim,
            ..Default::default()
        }
    }

    /// Set the number of adaptation steps.
    pub fn with_adapt_steps(mut self, adapt_steps: usize) -> Self {
        self.adapt_steps = adapt_steps;
        self
    }

    /// Set the number of likelihood optimizations per high-fidelity fit.
    pub fn with_hf_restarts(mut self, restarts: usize) -> Self {
        self.hf_restarts = restarts;
        self
    }

    /// Set the number of likelihood optimizations per low-fidelity round.
    pub fn with_lf_restarts(mut self, restarts: usize) -> Self {
        self.lf_restarts = restarts;
        self
    }

    /// Set the number of candidate points per adaptation round.
    pub fn with_adapt_grid_points(mut self, points: usize) -> Self {
        self.adapt_grid_points = points;
        self
    }

    /// Set the candidate grid layout.
    pub fn with_grid(mut self, grid: CandidateGrid) -> Self {
        self.grid = grid;
        self
    }

    /// Set the composite kernel families.
    pub fn with_kernels(mut self, kernels: KernelFamilies) -> Self {
        self.kernels = kernels;
        self
    }

    /// Set the simplex stopping criteria.
    pub fn with_optimizer(mut self, optimizer: OptimizerConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Set the restart seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Number of augmented columns, `2n + 1`.
    pub fn augmented_dim(&self) -> usize {
        2 * self.n + 1
    }

    /// Check every setting.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tau.is_finite() && self.tau > 0.0) {
            return Err(ConfigError::InvalidTau(self.tau));
        }
        at_least("input_dim", self.input_dim, 1)?;
        at_least("hf_restarts", self.hf_restarts, 1)?;
        at_least("lf_restarts", self.lf_restarts, 1)?;
        at_least("lf_grid_points", self.lf_grid_points, 1)?;
        at_least("adapt_grid_points", self.adapt_grid_points, 1)?;
        Ok(())
    }
}

pub(crate) fn at_least(name: &'static str, value: usize, min: usize) -> Result<(), ConfigError> {
    if value < min {
        return Err(ConfigError::TooSmall { name, min, value });
    }
    Ok(())
}
