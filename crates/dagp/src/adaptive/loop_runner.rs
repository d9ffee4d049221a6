//! Adaptation loop runner.
//!
//! Drives any [`ActiveModel`] through a fixed number of Select → Evaluate →
//! Retrain rounds, or fewer when the variance threshold is reached.

use dagp_core::constants::DEFAULT_ADAPT_GRID_POINTS;
use dagp_core::types::row_vec;
use dagp_core::{CandidateGrid, GpError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::ActiveModel;
use crate::config::at_least;
use crate::dataset::FidelityDataset;
use crate::error::{ConfigError, Error, Result};

/// Configuration for one adaptation run.
#[derive(Debug, Clone)]
pub struct AdaptConfig {
    /// Maximum number of rounds.
    pub steps: usize,

    /// Variance threshold for early stopping; `0` disables it.
    ///
    /// Default: 0.0
    pub eps: f64,

    /// Candidate points per round.
    ///
    /// Default: 200
    pub grid_points: usize,

    /// Layout of candidate points.
    pub grid: CandidateGrid,

    /// Held-out data; when set, each round records the log2-MSE measured at
    /// selection time.
    pub test_set: Option<FidelityDataset>,
}

impl Default for AdaptConfig {
    fn default() -> Self {
        Self {
            steps: 0,
            eps: 0.0,
            grid_points: DEFAULT_ADAPT_GRID_POINTS,
            grid: CandidateGrid::default(),
            test_set: None,
        }
    }
}

impl AdaptConfig {
    /// Run at most `steps` rounds.
    pub fn new(steps: usize) -> Self {
        Self {
            steps,
            ..Self::default()
        }
    }

    /// Builder method to set the early-stop threshold.
    pub fn eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    /// Builder method to set the candidate count.
    pub fn grid_points(mut self, points: usize) -> Self {
        self.grid_points = points;
        self
    }

    /// Builder method to set the candidate layout.
    pub fn grid(mut self, grid: CandidateGrid) -> Self {
        self.grid = grid;
        self
    }

    /// Builder method to track test error per round.
    pub fn test_set(mut self, test_set: FidelityDataset) -> Self {
        self.test_set = Some(test_set);
        self
    }

    fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !(self.eps.is_finite() && self.eps >= 0.0) {
            return Err(ConfigError::InvalidEps(self.eps));
        }
        at_least("grid_points", self.grid_points, 1)
    }
}

/// One completed Select → Evaluate → Retrain round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptRound {
    /// Zero-based round index.
    pub round: usize,
    /// Selected input.
    pub point: Vec<f64>,
    /// High-fidelity value observed there.
    pub value: f64,
    /// Largest predictive variance on the grid at selection time.
    pub max_variance: f64,
    /// log2-MSE on the test set at selection time, when one was given and
    /// the error is non-zero.
    pub log_mse: Option<f64>,
}

/// Outcome of an adaptation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AdaptOutcome {
    /// Every requested round ran.
    Completed {
        /// Rounds in order.
        history: Vec<AdaptRound>,
    },

    /// The maximum variance fell below `eps` before the rounds ran out.
    ConvergedEarly {
        /// Rounds completed before stopping.
        history: Vec<AdaptRound>,
        /// The maximum variance that triggered the stop.
        max_variance: f64,
    },
}

impl AdaptOutcome {
    /// Completed rounds in order.
    pub fn history(&self) -> &[AdaptRound] {
        match self {
            AdaptOutcome::Completed { history } | AdaptOutcome::ConvergedEarly { history, .. } => {
                history
            }
        }
    }

    /// Number of points added to the training set.
    pub fn steps_run(&self) -> usize {
        self.history().len()
    }

    /// Check if the run stopped on the variance threshold.
    pub fn converged_early(&self) -> bool {
        matches!(self, AdaptOutcome::ConvergedEarly { .. })
    }

    /// Selected points in order.
    pub fn points(&self) -> Vec<&[f64]> {
        self.history().iter().map(|r| r.point.as_slice()).collect()
    }
}

/// Run the adaptation loop on a fitted model.
///
/// # Errors
///
/// - [`Error::NotFitted`] if the model has no training data yet
/// - [`ConfigError`] for a negative or non-finite `eps` or an empty grid
/// - any error from prediction or refitting, which ends the run
pub fn run_adaptation<M>(model: &mut M, config: &AdaptConfig) -> Result<AdaptOutcome>
where
    M: ActiveModel + ?Sized,
{
    config.validate()?;
    if model.dataset().is_none() {
        return Err(Error::NotFitted);
    }

    let mut history = Vec::with_capacity(config.steps);
    for round in 0..config.steps {
        // Select
        let bounds = model.bounds().ok_or(Error::NotFitted)?;
        let candidates = config.grid.points(bounds, config.grid_points);
        let prediction = model.predict(&candidates)?;
        let (index, max_variance) = prediction
            .max_variance()
            .ok_or(GpError::NonFinite("predictive variance"))?;
        let log_mse = match &config.test_set {
            Some(test) => Some(model.assess_log_mse(test.inputs(), test.outputs())?),
            None => None,
        }
        .filter(|v| v.is_finite());

        if config.eps > 0.0 && max_variance < config.eps {
            info!(
                round,
                max_variance,
                eps = config.eps,
                "adaptation converged early"
            );
            return Ok(AdaptOutcome::ConvergedEarly {
                history,
                max_variance,
            });
        }

        // Evaluate
        let point = row_vec(&candidates, index);
        let value = model.evaluate_high_fidelity(&point);

        // Retrain
        let mut dataset = model.dataset().ok_or(Error::NotFitted)?.clone();
        dataset.push(&point, value)?;
        model.refit(dataset)?;

        debug!(round, ?point, value, max_variance, ?log_mse, "adaptation round");
        history.push(AdaptRound {
            round,
            point,
            value,
            max_variance,
            log_mse,
        });
    }

    info!(steps = history.len(), "adaptation completed");
    Ok(AdaptOutcome::Completed { history })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dagp_core::{Bounds, Matrix, Prediction, Vector};

    /// Variance equals squared Euclidean distance to the nearest training input.
    struct Nearest {
        dataset: Option<FidelityDataset>,
        bounds: Option<Bounds>,
        refits: usize,
    }

    impl Nearest {
        fn fitted(points: &[f64]) -> Self {
            Self::fitted_rows(Matrix::from_column_slice(points.len(), 1, points))
        }

        fn fitted_rows(x: Matrix) -> Self {
            let y = Vector::from_iterator(x.nrows(), x.row_iter().map(|r| r.norm_squared()));
            Self {
                bounds: Some(Bounds::from_rows(&x).unwrap()),
                dataset: Some(FidelityDataset::new(x, y).unwrap()),
                refits: 0,
            }
        }
    }

    impl ActiveModel for Nearest {
        fn input_dim(&self) -> usize {
            self.dataset.as_ref().map_or(1, FidelityDataset::input_dim)
        }

        fn bounds(&self) -> Option<&Bounds> {
            self.bounds.as_ref()
        }

        fn dataset(&self) -> Option<&FidelityDataset> {
            self.dataset.as_ref()
        }

        fn predict(&self, x: &Matrix) -> Result<Prediction> {
            let data = self.dataset.as_ref().ok_or(Error::NotFitted)?;
            let variance = Vector::from_iterator(
                x.nrows(),
                x.row_iter().map(|candidate| {
                    data.inputs()
                        .row_iter()
                        .map(|t| (&candidate - &t).norm_squared())
                        .fold(f64::INFINITY, f64::min)
                }),
            );
            Ok(Prediction {
                mean: Vector::zeros(x.nrows()),
                variance,
            })
        }

        fn evaluate_high_fidelity(&self, point: &[f64]) -> f64 {
            point.iter().map(|p| p * p).sum()
        }

        fn refit(&mut self, dataset: FidelityDataset) -> Result<()> {
            self.dataset = Some(dataset);
            self.refits += 1;
            Ok(())
        }
    }

    #[test]
    fn test_selects_largest_gap() {
        let mut model = Nearest::fitted(&[0.0, 0.2, 1.0]);
        let outcome = run_adaptation(&mut model, &AdaptConfig::new(1).grid_points(11)).unwrap();
        assert_eq!(outcome.steps_run(), 1);
        let round = &outcome.history()[0];
        assert!((round.point[0] - 0.6).abs() < 1e-12);
        assert!((round.value - 0.36).abs() < 1e-12);
        assert_eq!(model.refits, 1);
        assert_eq!(model.dataset.as_ref().unwrap().len(), 4);
    }

    #[test]
    fn test_ties_pick_first_occurrence() {
        let mut model = Nearest::fitted(&[0.0, 0.5, 1.0]);
        let outcome = run_adaptation(&mut model, &AdaptConfig::new(1).grid_points(5)).unwrap();
        // 0.25 and 0.75 are both 0.25 away from data; the earlier one wins.
        let round = &outcome.history()[0];
        assert_eq!(round.point, vec![0.25]);
        assert_eq!(round.max_variance, 0.0625);
    }

    #[test]
    fn test_default_grid_searches_whole_box() {
        let x = Matrix::from_row_slice(2, 2, &[0.0, 0.0, 1.0, 1.0]);
        let mut model = Nearest::fitted_rows(x.clone());
        let outcome = run_adaptation(&mut model, &AdaptConfig::new(1)).unwrap();
        // The corners off the data diagonal are farthest from both inputs.
        let round = &outcome.history()[0];
        assert_eq!(round.point, vec![0.0, 1.0]);
        assert_eq!(round.max_variance, 1.0);

        let mut diagonal = Nearest::fitted_rows(x);
        let config = AdaptConfig::new(1).grid(CandidateGrid::Diagonal);
        let outcome = run_adaptation(&mut diagonal, &config).unwrap();
        let point = &outcome.history()[0].point;
        assert_eq!(point[0], point[1]);
        assert!(outcome.history()[0].max_variance <= 0.5);
    }

    #[test]
    fn test_early_stop_before_evaluate() {
        let mut model = Nearest::fitted(&[0.0, 0.5, 1.0]);
        let outcome =
            run_adaptation(&mut model, &AdaptConfig::new(10).eps(0.2).grid_points(5)).unwrap();
        assert!(outcome.converged_early());
        assert_eq!(outcome.steps_run(), 0);
        assert_eq!(model.refits, 0);
    }

    #[test]
    fn test_early_stop_after_completed_rounds() {
        let mut model = Nearest::fitted(&[0.0, 0.75, 1.0]);
        let config = AdaptConfig::new(10).eps(0.01).grid_points(5);
        let outcome = run_adaptation(&mut model, &config).unwrap();
        // Rounds 0 and 1 fill 0.25 then 0.5; round 2 sees zero variance.
        assert_eq!(outcome.points(), vec![&[0.25][..], &[0.5][..]]);
        assert_eq!(outcome.steps_run(), 2);
        assert_eq!(
            outcome,
            AdaptOutcome::ConvergedEarly {
                history: outcome.history().to_vec(),
                max_variance: 0.0,
            }
        );
        assert_eq!(model.refits, 2);
        assert_eq!(model.dataset.as_ref().unwrap().len(), 5);
    }

    #[test]
    fn test_zero_eps_runs_all_steps() {
        let mut model = Nearest::fitted(&[0.0, 1.0]);
        let outcome = run_adaptation(&mut model, &AdaptConfig::new(4).grid_points(9)).unwrap();
        assert!(!outcome.converged_early());
        assert_eq!(outcome.steps_run(), 4);
        assert_eq!(model.dataset.as_ref().unwrap().len(), 6);
    }

    #[test]
    fn test_unfitted_model_rejected() {
        let mut model = Nearest {
            dataset: None,
            bounds: None,
            refits: 0,
        };
        assert_eq!(
            run_adaptation(&mut model, &AdaptConfig::new(0)).unwrap_err(),
            Error::NotFitted
        );
    }

    #[test]
    fn test_invalid_eps_rejected() {
        let mut model = Nearest::fitted(&[0.0, 1.0]);
        let err = run_adaptation(&mut model, &AdaptConfig::new(1).eps(-1.0)).unwrap_err();
        assert_eq!(err, Error::Config(ConfigError::InvalidEps(-1.0)));
    }

    #[test]
    fn test_records_log_mse_with_test_set() {
        let mut model = Nearest::fitted(&[0.0, 1.0]);
        let test = FidelityDataset::new(
            Matrix::from_row_slice(2, 1, &[0.0, 1.0]),
            Vector::from_vec(vec![1.0, 1.0]),
        )
        .unwrap();
        let config = AdaptConfig::new(2).grid_points(5).test_set(test);
        let outcome = run_adaptation(&mut model, &config).unwrap();
        // Means are zero, so the squared error is 1 and log2(1) = 0.
        for round in outcome.history() {
            assert_eq!(round.log_mse, Some(0.0));
        }
    }

    #[test]
    fn test_zero_test_error_records_no_log_mse() {
        let mut model = Nearest::fitted(&[0.0, 1.0]);
        let test = FidelityDataset::new(Matrix::zeros(2, 1), Vector::zeros(2)).unwrap();
        let config = AdaptConfig::new(1).grid_points(5).test_set(test);
        let outcome = run_adaptation(&mut model, &config).unwrap();
        assert_eq!(outcome.history()[0].log_mse, None);
    }
}
