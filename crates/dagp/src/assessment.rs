//! Side-by-side comparison of surrogates on a shared test set.

use std::collections::{BTreeMap, HashSet};

use dagp_core::{Matrix, Vector};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::adaptive::{run_adaptation, ActiveModel, AdaptConfig, AdaptOutcome};
use crate::baseline::SingleFidelityGp;
use crate::dataset::FidelityDataset;
use crate::error::{ConfigError, Result};
use crate::model::DataAugmentationGp;
use crate::types::check_inputs;

/// A named, fittable, adaptable surrogate.
pub trait Surrogate: ActiveModel {
    /// Unique name within a comparison.
    fn name(&self) -> &str;

    /// Make `x` the complete training set and fit.
    fn fit(&mut self, x: &Matrix) -> Result<()>;

    /// Candidate grid settings this model adapts with.
    fn adapt_config(&self) -> AdaptConfig;

    /// Run at most `steps` rounds with early-stop threshold `eps` on the
    /// model's own candidate grid, recording test error when `test_set` is
    /// given.
    fn adapt(
        &mut self,
        steps: usize,
        eps: f64,
        test_set: Option<FidelityDataset>,
    ) -> Result<AdaptOutcome> {
        let config = AdaptConfig {
            steps,
            eps,
            test_set,
            ..self.adapt_config()
        };
        run_adaptation(self, &config)
    }
}

impl Surrogate for DataAugmentationGp {
    fn name(&self) -> &str {
        DataAugmentationGp::name(self)
    }

    fn fit(&mut self, x: &Matrix) -> Result<()> {
        DataAugmentationGp::fit(self, x)
    }

    fn adapt_config(&self) -> AdaptConfig {
        DataAugmentationGp::adapt_config(self)
    }
}

impl Surrogate for SingleFidelityGp {
    fn name(&self) -> &str {
        SingleFidelityGp::name(self)
    }

    fn fit(&mut self, x: &Matrix) -> Result<()> {
        SingleFidelityGp::fit(self, x)
    }

    fn adapt_config(&self) -> AdaptConfig {
        SingleFidelityGp::adapt_config(self)
    }
}

/// Per-model summary in an [`AssessmentReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelReport {
    /// Model name.
    pub name: String,
    /// High-fidelity training points.
    pub training_points: usize,
    /// Test-set MSE.
    pub mse: f64,
    /// Test-set log2-MSE, absent when the MSE is exactly zero.
    pub log_mse: Option<f64>,
    /// Last adaptation run, if any.
    pub adaptation: Option<AdaptOutcome>,
}

/// Serializable result of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReport {
    /// Comparison title.
    pub title: String,
    /// Number of test points.
    pub test_points: usize,
    /// One entry per model, in registration order.
    pub models: Vec<ModelReport>,
}

/// Fits, adapts and scores several surrogates against one test set.
pub struct MethodAssessment {
    models: Vec<Box<dyn Surrogate>>,
    test: FidelityDataset,
    title: String,
    adaptations: BTreeMap<String, AdaptOutcome>,
}

impl MethodAssessment {
    /// Register `models` for comparison on `(x_test, y_test)`.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptyModelList`] for no models
    /// - [`ConfigError::InputDimMismatch`] if input dimensions differ
    /// - [`ConfigError::DuplicateModelName`] if names repeat
    /// - [`InputError`](crate::InputError) for a malformed test set
    pub fn new(
        models: Vec<Box<dyn Surrogate>>,
        x_test: Matrix,
        y_test: Vector,
        title: impl Into<String>,
    ) -> Result<Self> {
        let expected = models
            .first()
            .ok_or(ConfigError::EmptyModelList)?
            .input_dim();
        let mut names = HashSet::new();
        for model in &models {
            if model.input_dim() != expected {
                return Err(ConfigError::InputDimMismatch {
                    name: model.name().to_string(),
                    expected,
                    found: model.input_dim(),
                }
                .into());
            }
            if !names.insert(model.name()) {
                return Err(ConfigError::DuplicateModelName(model.name().to_string()).into());
            }
        }
        check_inputs(&x_test, expected)?;
        let test = FidelityDataset::new(x_test, y_test)?;
        Ok(Self {
            models,
            test,
            title: title.into(),
            adaptations: BTreeMap::new(),
        })
    }

    /// Registered models, in order.
    pub fn models(&self) -> &[Box<dyn Surrogate>] {
        &self.models
    }

    /// Comparison title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Fit every model on `x_train`.
    pub fn fit_models(&mut self, x_train: &Matrix) -> Result<()> {
        for model in &mut self.models {
            model.fit(x_train)?;
        }
        Ok(())
    }

    /// Adapt every model for `steps` rounds with threshold `eps`.
    ///
    /// Each model searches its own candidate grid.
    pub fn adapt_models(&mut self, steps: usize, eps: f64) -> Result<()> {
        self.adapt_all(steps, eps, false)
    }

    /// Adapt every model for `steps` rounds without early stopping, recording
    /// the test-set log2-MSE at each round.
    pub fn adapt_models_tracking_error(&mut self, steps: usize) -> Result<()> {
        self.adapt_all(steps, 0.0, true)
    }

    fn adapt_all(&mut self, steps: usize, eps: f64, track_error: bool) -> Result<()> {
        for model in &mut self.models {
            let test_set = track_error.then(|| self.test.clone());
            let outcome = model.adapt(steps, eps, test_set)?;
            info!(
                title = %self.title,
                model = model.name(),
                steps = outcome.steps_run(),
                converged_early = outcome.converged_early(),
                "adapted model"
            );
            self.adaptations.insert(model.name().to_string(), outcome);
        }
        Ok(())
    }

    /// Last adaptation outcome per model.
    pub fn adaptations(&self) -> &BTreeMap<String, AdaptOutcome> {
        &self.adaptations
    }

    /// Test-set MSE per model.
    pub fn mses(&self) -> Result<BTreeMap<String, f64>> {
        self.score(|m, x, y| m.assess_mse(x, y))
    }

    /// Test-set log2-MSE per model.
    pub fn log_mses(&self) -> Result<BTreeMap<String, f64>> {
        self.score(|m, x, y| m.assess_log_mse(x, y))
    }

    fn score<F>(&self, metric: F) -> Result<BTreeMap<String, f64>>
    where
        F: Fn(&dyn Surrogate, &Matrix, &Vector) -> Result<f64>,
    {
        self.models
            .iter()
            .map(|m| -> Result<(String, f64)> {
                let value = metric(m.as_ref(), self.test.inputs(), self.test.outputs())?;
                Ok((m.name().to_string(), value))
            })
            .collect()
    }

    /// Summarize every model.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFitted`](crate::Error::NotFitted) if any model has
    /// not been fitted.
    pub fn report(&self) -> Result<AssessmentReport> {
        let models = self
            .models
            .iter()
            .map(|m| -> Result<ModelReport> {
                let mse = m.assess_mse(self.test.inputs(), self.test.outputs())?;
                Ok(ModelReport {
                    name: m.name().to_string(),
                    training_points: m.dataset().map_or(0, FidelityDataset::len),
                    mse,
                    log_mse: Some(mse.log2()).filter(|v| v.is_finite()),
                    adaptation: self.adaptations.get(m.name()).cloned(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(AssessmentReport {
            title: self.title.clone(),
            test_points: self.test.len(),
            models,
        })
    }
}
