//! Low-fidelity models queried by the feature augmenter.
//!
//! A low-fidelity model is either a closed-form function or a GP trained on a
//! seed dataset. The learned variant refines itself before first use: each
//! round it samples its own predictive mean where its variance is largest,
//! appends that pseudo-observation, and refits from scratch.

use std::fmt;

use dagp_core::types::row_vec;
use dagp_core::{
    Bounds, CandidateGrid, FitOptions, GaussianProcess, GpError, Kernel, KernelFamily, Matrix,
    Vector,
};
use tracing::{debug, info};

use crate::config::Config;
use crate::dataset::FidelityDataset;
use crate::error::Result;
use crate::types::{check_inputs, evaluate_rows, Objective};

/// Where a model's low-fidelity predictions come from.
///
/// Chosen on the builder; exactly one source is allowed.
#[derive(Clone)]
pub enum LowFidelitySource {
    /// A deterministic function.
    ClosedForm(Objective),
    /// Seed data plus the ratio of refinement rounds to adaptation steps.
    Data {
        /// Seed inputs, `input_dim` columns.
        x: Matrix,
        /// Seed outputs, one per row.
        y: Vector,
        /// Refinement rounds per configured adaptation step.
        ratio: usize,
    },
}

impl fmt::Debug for LowFidelitySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LowFidelitySource::ClosedForm(_) => f.write_str("ClosedForm(<fn>)"),
            LowFidelitySource::Data { x, ratio, .. } => f
                .debug_struct("Data")
                .field("points", &x.nrows())
                .field("ratio", ratio)
                .finish(),
        }
    }
}

/// A GP over raw inputs, refined by its own uncertainty sampling.
#[derive(Debug, Clone)]
pub struct LearnedLowFidelity {
    gp: GaussianProcess,
    dataset: FidelityDataset,
    bounds: Bounds,
    rounds: usize,
}

impl LearnedLowFidelity {
    /// Fit on `dataset` and run `rounds` refinement rounds.
    pub fn train(dataset: FidelityDataset, rounds: usize, config: &Config) -> Result<Self> {
        let bounds = Bounds::from_rows(dataset.inputs())?;
        let initial = FitOptions::default()
            .with_optimizer(config.optimizer)
            .with_seed(config.seed);
        let gp = fit_raw(&dataset, config.input_dim, &initial)?;
        info!(
            points = dataset.len(),
            noise = gp.noise_variance(),
            "fitted initial low-fidelity model"
        );

        let mut model = Self {
            gp,
            dataset,
            bounds,
            rounds: 0,
        };
        let refit = initial.with_restarts(config.lf_restarts);
        for round in 0..rounds {
            model.refine(round, config.grid, config.lf_grid_points, &refit)?;
        }
        Ok(model)
    }

    fn refine(
        &mut self,
        round: usize,
        grid: CandidateGrid,
        grid_points: usize,
        options: &FitOptions,
    ) -> Result<()> {
        let candidates = grid.points(&self.bounds, grid_points);
        let prediction = self.gp.predict(&candidates)?;
        let (index, max_variance) = prediction
            .max_variance()
            .ok_or(GpError::NonFinite("low-fidelity variance"))?;
        let point = row_vec(&candidates, index);
        let value = prediction.mean[index];

        let mut dataset = self.dataset.clone();
        dataset.push(&point, value)?;
        self.gp = fit_raw(&dataset, self.bounds.dim(), options)?;
        self.dataset = dataset;
        self.rounds += 1;
        debug!(
            round,
            ?point,
            value,
            max_variance,
            points = self.dataset.len(),
            "refined low-fidelity model"
        );
        Ok(())
    }

    /// Current training data, seed points first.
    pub fn dataset(&self) -> &FidelityDataset {
        &self.dataset
    }

    /// The fitted GP.
    pub fn gp(&self) -> &GaussianProcess {
        &self.gp
    }

    /// Refinement rounds completed.
    pub fn rounds(&self) -> usize {
        self.rounds
    }
}

fn fit_raw(
    dataset: &FidelityDataset,
    input_dim: usize,
    options: &FitOptions,
) -> Result<GaussianProcess> {
    let kernel = Kernel::leaf(KernelFamily::Rbf, (0..input_dim).collect());
    let gp = GaussianProcess::fit(dataset.inputs(), dataset.outputs(), kernel, options)?;
    Ok(gp)
}

/// Source of low-fidelity predictions.
#[derive(Clone)]
pub enum LowFidelityModel {
    /// A deterministic function, evaluated row by row.
    ClosedForm(Objective),
    /// A refined GP; predictions are its posterior means.
    Learned(Box<LearnedLowFidelity>),
}

impl LowFidelityModel {
    /// Build a model from its source.
    ///
    /// Seed data is validated against `config.input_dim` and trained for
    /// `config.adapt_steps × ratio` refinement rounds.
    pub fn from_source(source: LowFidelitySource, config: &Config) -> Result<Self> {
        match source {
            LowFidelitySource::ClosedForm(f) => Ok(LowFidelityModel::ClosedForm(f)),
            LowFidelitySource::Data { x, y, ratio } => {
                check_inputs(&x, config.input_dim)?;
                let dataset = FidelityDataset::new(x, y)?;
                let rounds = config.adapt_steps.saturating_mul(ratio);
                let learned = LearnedLowFidelity::train(dataset, rounds, config)?;
                Ok(LowFidelityModel::Learned(Box::new(learned)))
            }
        }
    }

    /// One mean per row of `x`.
    ///
    /// # Errors
    ///
    /// Only the learned variant can fail, when `x` does not match its input
    /// dimension.
    pub fn predict(&self, x: &Matrix) -> Result<Vector> {
        match self {
            LowFidelityModel::ClosedForm(f) => Ok(evaluate_rows(f, x)),
            LowFidelityModel::Learned(model) => Ok(model.gp.predict(x)?.mean),
        }
    }

    /// Whether predictions come from a trained GP.
    pub fn is_learned(&self) -> bool {
        matches!(self, LowFidelityModel::Learned(_))
    }

    /// The learned model, if any.
    pub fn learned(&self) -> Option<&LearnedLowFidelity> {
        match self {
            LowFidelityModel::Learned(model) => Some(model),
            LowFidelityModel::ClosedForm(_) => None,
        }
    }
}

impl fmt::Debug for LowFidelityModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LowFidelityModel::ClosedForm(_) => f.write_str("ClosedForm(<fn>)"),
            LowFidelityModel::Learned(model) => f.debug_tuple("Learned").field(model).finish(),
        }
    }
}
