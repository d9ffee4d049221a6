//! The data-augmentation high-fidelity model.
//!
//! Raw inputs are extended with shifted low-fidelity predictions and fed to a
//! GP with the composite kernel `k₁(aug) · k₂(raw) + k₃(raw)`. The training
//! set is owned by the model: [`fit`](DataAugmentationGp::fit) replaces it,
//! adaptation appends to it, and every change triggers a full refit.

use std::fmt;
use std::sync::Arc;

use dagp_core::{Bounds, FitOptions, GaussianProcess, Kernel, Matrix, Prediction, Vector};
use tracing::info;

use crate::adaptive::{run_adaptation, ActiveModel, AdaptConfig, AdaptOutcome};
use crate::augment::{FeatureAugmenter, OffsetGenerator, SymmetricOffsets};
use crate::config::Config;
use crate::dataset::{DomainBounds, FidelityDataset};
use crate::error::{ConfigError, Error, Result};
use crate::low_fidelity::{LowFidelityModel, LowFidelitySource};
use crate::types::{check_inputs, evaluate_rows, objective, Objective};

const DEFAULT_NAME: &str = "nargp";

/// Builder for [`DataAugmentationGp`].
///
/// Exactly one low-fidelity source must be given: a closed form via
/// [`low_fidelity_fn`](Self::low_fidelity_fn), or seed data via
/// [`low_fidelity_data`](Self::low_fidelity_data).
pub struct DataAugmentationGpBuilder {
    name: String,
    config: Config,
    f_high: Option<Objective>,
    f_low: Option<Objective>,
    lf_data: Option<(Matrix, Vector, usize)>,
    offsets: Arc<dyn OffsetGenerator>,
}

impl Default for DataAugmentationGpBuilder {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            config: Config::default(),
            f_high: None,
            f_low: None,
            lf_data: None,
            offsets: Arc::new(SymmetricOffsets),
        }
    }
}

impl DataAugmentationGpBuilder {
    /// Model name used in comparisons and reports.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replace every setting at once.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Shift scale.
    pub fn tau(mut self, tau: f64) -> Self {
        self.config.tau = tau;
        self
    }

    /// Stencil half-width.
    pub fn n(mut self, n: usize) -> Self {
        self.config.n = n;
        self
    }

    /// Raw input dimension.
    pub fn input_dim(mut self, input_dim: usize) -> Self {
        self.config.input_dim = input_dim;
        self
    }

    /// Default number of adaptation steps.
    pub fn adapt_steps(mut self, steps: usize) -> Self {
        self.config.adapt_steps = steps;
        self
    }

    /// The expensive function being modelled.
    pub fn high_fidelity<F>(mut self, f: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        self.f_high = Some(objective(f));
        self
    }

    /// A closed-form low-fidelity function.
    pub fn low_fidelity_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        self.f_low = Some(objective(f));
        self
    }

    /// Seed data for a learned low-fidelity model, refined for
    /// `adapt_steps × ratio` rounds at build time.
    pub fn low_fidelity_data(mut self, x: Matrix, y: Vector, ratio: usize) -> Self {
        self.lf_data = Some((x, y, ratio));
        self
    }

    /// Offset generator for the augmentation stencil.
    pub fn offsets(mut self, generator: impl OffsetGenerator + 'static) -> Self {
        self.offsets = Arc::new(generator);
        self
    }

    /// Validate settings, train a learned low-fidelity model if requested,
    /// and return an unfitted model.
    ///
    /// # Errors
    ///
    /// - [`ConfigError`] for invalid settings, a missing high-fidelity
    ///   function, or zero or two low-fidelity sources
    /// - [`Error::Input`] for malformed seed data
    /// - [`Error::Regression`] if the learned low-fidelity model fails to fit
    pub fn build(self) -> Result<DataAugmentationGp> {
        self.config.validate()?;
        let f_high = self.f_high.ok_or(ConfigError::MissingHighFidelity)?;
        let source = match (self.f_low, self.lf_data) {
            (Some(f), None) => LowFidelitySource::ClosedForm(f),
            (None, Some((x, y, ratio))) => LowFidelitySource::Data { x, y, ratio },
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingLowFidelity.into()),
            (None, None) => return Err(ConfigError::MissingLowFidelity.into()),
        };
        let augmenter = FeatureAugmenter::new(&self.config, self.offsets.as_ref())?;
        let low_fidelity = LowFidelityModel::from_source(source, &self.config)?;

        Ok(DataAugmentationGp {
            name: self.name,
            config: self.config,
            f_high,
            low_fidelity,
            augmenter,
            dataset: None,
            bounds: DomainBounds::default(),
            gp: None,
        })
    }
}

/// Multi-fidelity GP over low-fidelity-augmented inputs.
#[derive(Clone)]
pub struct DataAugmentationGp {
    name: String,
    config: Config,
    f_high: Objective,
    low_fidelity: LowFidelityModel,
    augmenter: FeatureAugmenter,
    dataset: Option<FidelityDataset>,
    bounds: DomainBounds,
    gp: Option<GaussianProcess>,
}

impl DataAugmentationGp {
    /// Start building a model.
    pub fn builder() -> DataAugmentationGpBuilder {
        DataAugmentationGpBuilder::default()
    }

    /// Make `x` the complete training set and fit.
    ///
    /// Outputs are computed with the high-fidelity function row by row; the
    /// domain bounds are widened to include `x`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Input`] for malformed `x` and propagates any
    /// regression failure. On error the previous fit is kept, although the
    /// bounds may already be widened.
    pub fn fit(&mut self, x: &Matrix) -> Result<()> {
        check_inputs(x, self.config.input_dim)?;
        let y = evaluate_rows(&self.f_high, x);
        let dataset = FidelityDataset::new(x.clone(), y)?;
        self.refit(dataset)
    }

    /// Run `steps` adaptation rounds with early-stop threshold `eps`.
    ///
    /// Candidate grids use the configured size and layout.
    pub fn adapt(&mut self, steps: usize, eps: f64) -> Result<AdaptOutcome> {
        let config = AdaptConfig {
            steps,
            eps,
            ..self.adapt_config()
        };
        self.adapt_with(&config)
    }

    /// Run the adaptation loop with explicit settings.
    pub fn adapt_with(&mut self, config: &AdaptConfig) -> Result<AdaptOutcome> {
        run_adaptation(self, config)
    }

    /// Adaptation settings derived from this model's config.
    pub fn adapt_config(&self) -> AdaptConfig {
        AdaptConfig::new(self.config.adapt_steps)
            .grid_points(self.config.adapt_grid_points)
            .grid(self.config.grid)
    }

    /// Predictive mean and variance per row of `x`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Input`] for malformed `x` and [`Error::NotFitted`]
    /// before the first fit.
    pub fn predict(&self, x: &Matrix) -> Result<Prediction> {
        check_inputs(x, self.config.input_dim)?;
        let gp = self.gp.as_ref().ok_or(Error::NotFitted)?;
        let augmented = self.augmenter.augment(&self.low_fidelity, x)?;
        Ok(gp.predict(&augmented)?)
    }

    /// Predictive means per row of `x`.
    pub fn predict_means(&self, x: &Matrix) -> Result<Vector> {
        Ok(self.predict(x)?.mean)
    }

    /// Predictive variances per row of `x`.
    pub fn predict_variance(&self, x: &Matrix) -> Result<Vector> {
        Ok(self.predict(x)?.variance)
    }

    /// Mean squared error of predictive means on a test set.
    pub fn assess_mse(&self, x_test: &Matrix, y_test: &Vector) -> Result<f64> {
        ActiveModel::assess_mse(self, x_test, y_test)
    }

    /// `log2` of [`assess_mse`](Self::assess_mse).
    pub fn assess_log_mse(&self, x_test: &Matrix, y_test: &Vector) -> Result<f64> {
        ActiveModel::assess_log_mse(self, x_test, y_test)
    }

    /// Model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw input dimension.
    pub fn input_dim(&self) -> usize {
        self.config.input_dim
    }

    /// Settings the model was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Low-fidelity model used for augmentation.
    pub fn low_fidelity(&self) -> &LowFidelityModel {
        &self.low_fidelity
    }

    /// The feature augmenter.
    pub fn augmenter(&self) -> &FeatureAugmenter {
        &self.augmenter
    }

    /// Domain bounds over every fitted input.
    pub fn bounds(&self) -> Option<&Bounds> {
        self.bounds.get()
    }

    /// High-fidelity training inputs.
    pub fn training_inputs(&self) -> Option<&Matrix> {
        self.dataset.as_ref().map(FidelityDataset::inputs)
    }

    /// High-fidelity training outputs.
    pub fn training_outputs(&self) -> Option<&Vector> {
        self.dataset.as_ref().map(FidelityDataset::outputs)
    }

    /// Augmented training inputs the GP was fitted on.
    pub fn augmented_training_inputs(&self) -> Option<&Matrix> {
        self.gp.as_ref().map(GaussianProcess::training_inputs)
    }

    /// Fitted composite kernel.
    pub fn kernel(&self) -> Option<&Kernel> {
        self.gp.as_ref().map(GaussianProcess::kernel)
    }

    /// Fitted GP.
    pub fn gp(&self) -> Option<&GaussianProcess> {
        self.gp.as_ref()
    }

    fn fit_options(&self) -> FitOptions {
        FitOptions::default()
            .with_restarts(self.config.hf_restarts)
            .with_optimizer(self.config.optimizer)
            .with_seed(self.config.seed)
    }
}

impl ActiveModel for DataAugmentationGp {
    fn input_dim(&self) -> usize {
        self.config.input_dim
    }

    fn bounds(&self) -> Option<&Bounds> {
        self.bounds.get()
    }

    fn dataset(&self) -> Option<&FidelityDataset> {
        self.dataset.as_ref()
    }

    fn predict(&self, x: &Matrix) -> Result<Prediction> {
        DataAugmentationGp::predict(self, x)
    }

    fn evaluate_high_fidelity(&self, point: &[f64]) -> f64 {
        (self.f_high)(point)
    }

    fn refit(&mut self, dataset: FidelityDataset) -> Result<()> {
        check_inputs(dataset.inputs(), self.config.input_dim)?;
        self.bounds.observe(dataset.inputs())?;
        let augmented = self.augmenter.augment(&self.low_fidelity, dataset.inputs())?;
        let kernel = Kernel::augmented(
            self.config.input_dim,
            self.augmenter.augmented_dim(),
            self.config.kernels,
        );
        let gp = GaussianProcess::fit(&augmented, dataset.outputs(), kernel, &self.fit_options())?;
        info!(
            model = %self.name,
            points = dataset.len(),
            nll = -gp.log_marginal_likelihood(),
            noise = gp.noise_variance(),
            kernel = %gp.kernel(),
            "fitted high-fidelity model"
        );
        self.gp = Some(gp);
        self.dataset = Some(dataset);
        Ok(())
    }
}

impl fmt::Debug for DataAugmentationGp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataAugmentationGp")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("low_fidelity", &self.low_fidelity)
            .field("points", &self.dataset.as_ref().map(FidelityDataset::len))
            .field("bounds", &self.bounds.get())
            .finish_non_exhaustive()
    }
}
