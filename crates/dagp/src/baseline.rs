//! Single-fidelity GP baseline.
//!
//! A plain ARD GP on raw inputs, fitted on high-fidelity data only. Used as
//! the reference the augmented model is compared against.

use std::fmt;

use dagp_core::constants::{DEFAULT_ADAPT_GRID_POINTS, DEFAULT_HF_RESTARTS, DEFAULT_SEED};
use dagp_core::{
    Bounds, CandidateGrid, FitOptions, GaussianProcess, Kernel, KernelFamily, Matrix,
    OptimizerConfig, Prediction, Vector,
};
use tracing::info;

use crate::adaptive::{run_adaptation, ActiveModel, AdaptConfig, AdaptOutcome};
use crate::config::at_least;
use crate::dataset::{DomainBounds, FidelityDataset};
use crate::error::{Error, Result};
use crate::types::{check_inputs, evaluate_rows, objective, Objective};

/// GP regression on raw high-fidelity data.
#[derive(Clone)]
pub struct SingleFidelityGp {
    name: String,
    input_dim: usize,
    f_high: Objective,
    family: KernelFamily,
    options: FitOptions,
    grid: CandidateGrid,
    grid_points: usize,
    dataset: Option<FidelityDataset>,
    bounds: DomainBounds,
    gp: Option<GaussianProcess>,
}

impl SingleFidelityGp {
    /// Create an unfitted baseline for `f_high` on `input_dim` inputs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TooSmall`](crate::ConfigError::TooSmall) for
    /// `input_dim = 0`.
    pub fn new<F>(name: impl Into<String>, input_dim: usize, f_high: F) -> Result<Self>
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        at_least("input_dim", input_dim, 1)?;
        Ok(Self {
            name: name.into(),
            input_dim,
            f_high: objective(f_high),
            family: KernelFamily::Rbf,
            options: FitOptions::default()
                .with_restarts(DEFAULT_HF_RESTARTS)
                .with_seed(DEFAULT_SEED),
            grid: CandidateGrid::default(),
            grid_points: DEFAULT_ADAPT_GRID_POINTS,
            dataset: None,
            bounds: DomainBounds::default(),
            gp: None,
        })
    }

    /// Use `family` for the kernel.
    pub fn with_family(mut self, family: KernelFamily) -> Self {
        self.family = family;
        self
    }

    /// Set the number of likelihood optimizations per fit.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TooSmall`](crate::ConfigError::TooSmall) for
    /// `restarts = 0`.
    pub fn with_restarts(mut self, restarts: usize) -> Result<Self> {
        at_least("restarts", restarts, 1)?;
        self.options.restarts = restarts;
        Ok(self)
    }

    /// Set the simplex stopping criteria.
    pub fn with_optimizer(mut self, optimizer: OptimizerConfig) -> Self {
        self.options.optimizer = optimizer;
        self
    }

    /// Set the restart seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.options.seed = seed;
        self
    }

    /// Set the candidate grid layout used by adaptation.
    pub fn with_grid(mut self, grid: CandidateGrid) -> Self {
        self.grid = grid;
        self
    }

    /// Set the number of candidate points per adaptation round.
    pub fn with_grid_points(mut self, points: usize) -> Self {
        self.grid_points = points;
        self
    }

    /// Make `x` the complete training set and fit.
    pub fn fit(&mut self, x: &Matrix) -> Result<()> {
        check_inputs(x, self.input_dim)?;
        let y = evaluate_rows(&self.f_high, x);
        self.refit(FidelityDataset::new(x.clone(), y)?)
    }

    /// Run `steps` adaptation rounds with early-stop threshold `eps`.
    pub fn adapt(&mut self, steps: usize, eps: f64) -> Result<AdaptOutcome> {
        let config = AdaptConfig {
            steps,
            eps,
            ..self.adapt_config()
        };
        run_adaptation(self, &config)
    }

    /// Adaptation settings with this model's candidate grid.
    pub fn adapt_config(&self) -> AdaptConfig {
        AdaptConfig::default()
            .grid_points(self.grid_points)
            .grid(self.grid)
    }

    /// Predictive mean and variance per row of `x`.
    pub fn predict(&self, x: &Matrix) -> Result<Prediction> {
        check_inputs(x, self.input_dim)?;
        let gp = self.gp.as_ref().ok_or(Error::NotFitted)?;
        Ok(gp.predict(x)?)
    }

    /// Model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fitted GP.
    pub fn gp(&self) -> Option<&GaussianProcess> {
        self.gp.as_ref()
    }
}

impl ActiveModel for SingleFidelityGp {
    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn bounds(&self) -> Option<&Bounds> {
        self.bounds.get()
    }

    fn dataset(&self) -> Option<&FidelityDataset> {
        self.dataset.as_ref()
    }

    fn predict(&self, x: &Matrix) -> Result<Prediction> {
        SingleFidelityGp::predict(self, x)
    }

    fn evaluate_high_fidelity(&self, point: &[f64]) -> f64 {
        (self.f_high)(point)
    }

    fn refit(&mut self, dataset: FidelityDataset) -> Result<()> {
        check_inputs(dataset.inputs(), self.input_dim)?;
        self.bounds.observe(dataset.inputs())?;
        let kernel = Kernel::leaf(self.family, (0..self.input_dim).collect());
        let gp = GaussianProcess::fit(dataset.inputs(), dataset.outputs(), kernel, &self.options)?;
        info!(
            model = %self.name,
            points = dataset.len(),
            noise = gp.noise_variance(),
            "fitted single-fidelity model"
        );
        self.gp = Some(gp);
        self.dataset = Some(dataset);
        Ok(())
    }
}

impl fmt::Debug for SingleFidelityGp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleFidelityGp")
            .field("name", &self.name)
            .field("input_dim", &self.input_dim)
            .field("family", &self.family)
            .field("points", &self.dataset.as_ref().map(FidelityDataset::len))
            .finish_non_exhaustive()
    }
}
