//! Exact Gaussian process regression with a Gaussian likelihood.
//!
//! ## Model
//!
//! y = f(x) + ε,  f ~ GP(0, k),  ε ~ N(0, σ²_n)
//!
//! ## Fit
//!
//! Hyperparameters (all kernel parameters plus σ²_n, in log space) minimize
//! the negative log marginal likelihood
//!
//! −log p(y | X) = ½ yᵀ(K + σ²_n I)⁻¹y + ½ log|K + σ²_n I| + (n/2) log 2π
//!
//! via Nelder–Mead from several starting points. Restart 0 starts from the
//! kernel's current hyperparameters; every later restart perturbs that start
//! with standard normal noise drawn from a seeded `Xoshiro256PlusPlus`. The
//! restart with the lowest objective wins, converged or not.
//!
//! ## Predict
//!
//! Computed via Cholesky solves (no explicit inverse):
//!
//! - mean:     k*ᵀ α,                  α = (K + σ²_n I)⁻¹ y
//! - variance: k** − vᵀv + σ²_n,       v = L⁻¹ k*
//!
//! The returned variance is that of a new noisy observation, clamped at zero.

use nalgebra::{Cholesky, Dyn};
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::constants::{
    DEFAULT_NOISE_VARIANCE, DEFAULT_SEED, INFEASIBLE_OBJECTIVE, INITIAL_JITTER, LOG_2PI,
    MAX_JITTER_ATTEMPTS, MAX_LOG_PARAM, MIN_LOG_NOISE,
};
use crate::error::GpError;
use crate::kernel::Kernel;
use crate::optimize::{nelder_mead, OptimizerConfig};
use crate::types::{ensure_finite, Matrix, Vector};

/// Options controlling hyperparameter optimization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Number of optimizations; restart 0 uses the initial hyperparameters.
    ///
    /// Default: 1. Zero skips optimization entirely.
    pub restarts: usize,

    /// Simplex stopping criteria.
    pub optimizer: OptimizerConfig,

    /// Seed for restart perturbations.
    pub seed: u64,

    /// Starting Gaussian noise variance.
    ///
    /// Default: 1.0
    pub initial_noise_variance: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            restarts: 1,
            optimizer: OptimizerConfig::default(),
            seed: DEFAULT_SEED,
            initial_noise_variance: DEFAULT_NOISE_VARIANCE,
        }
    }
}

impl FitOptions {
    /// Set the number of optimizations.
    pub fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts;
        self
    }

    /// Set the restart seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the simplex stopping criteria.
    pub fn with_optimizer(mut self, optimizer: OptimizerConfig) -> Self {
        self.optimizer = optimizer;
        self
    }
}

/// Predictive mean and variance per query row.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Posterior mean.
    pub mean: Vector,
    /// Predictive variance (latent variance plus noise), non-negative.
    pub variance: Vector,
}

impl Prediction {
    /// Number of predicted rows.
    pub fn len(&self) -> usize {
        self.mean.len()
    }

    /// Whether no rows were predicted.
    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }

    /// Index and value of the largest variance, first occurrence on ties.
    pub fn max_variance(&self) -> Option<(usize, f64)> {
        argmax_first(self.variance.as_slice())
    }
}

/// Index of the first maximum of `values`, ignoring NaN.
pub fn argmax_first(values: &[f64]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best
}

/// A fitted Gaussian process.
#[derive(Debug, Clone)]
pub struct GaussianProcess {
    kernel: Kernel,
    noise_variance: f64,
    x_train: Matrix,
    y_train: Vector,
    cholesky: Cholesky<f64, Dyn>,
    alpha: Vector,
    log_marginal_likelihood: f64,
    jitter: f64,
}

impl GaussianProcess {
    /// Fit hyperparameters by maximizing the marginal likelihood.
    ///
    /// The kernel's current hyperparameters seed restart 0; its structure is
    /// kept as given.
    ///
    /// # Errors
    ///
    /// Input validation errors, or [`GpError::NotPositiveDefinite`] if even the
    /// best hyperparameters produce a covariance that cannot be factored.
    pub fn fit(
        x: &Matrix,
        y: &Vector,
        kernel: Kernel,
        options: &FitOptions,
    ) -> Result<Self, GpError> {
        validate_training(x, y, &kernel)?;

        let n_kernel = kernel.n_params();
        let mut start = kernel.log_params();
        start.push(options.initial_noise_variance.max(f64::MIN_POSITIVE).ln());

        let mut work = kernel.clone();
        let mut objective = |theta: &[f64]| -> f64 {
            if work.set_log_params(&theta[..n_kernel]).is_err() {
                return f64::INFINITY;
            }
            let noise = noise_from_log(theta[n_kernel]);
            match factor(&work, noise, x) {
                Ok((chol, _)) => negative_log_likelihood(&chol, y),
                Err(_) => INFEASIBLE_OBJECTIVE,
            }
        };

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(options.seed);
        let mut best: Option<(Vec<f64>, f64)> = None;

        for restart in 0..options.restarts {
            let x0: Vec<f64> = if restart == 0 {
                start.clone()
            } else {
                start
                    .iter()
                    .map(|s| s + rng.sample::<f64, _>(StandardNormal))
                    .collect()
            };
            let result = nelder_mead(&mut objective, &x0, &options.optimizer);
            tracing::debug!(
                restart,
                nll = result.value,
                iterations = result.iterations,
                converged = result.converged,
                "hyperparameter restart finished"
            );
            let improved = best.as_ref().map_or(true, |(_, v)| result.value < *v);
            if improved {
                best = Some((result.x, result.value));
            }
        }

        let theta = best.map_or(start, |(theta, _)| theta);
        let mut kernel = kernel;
        kernel.set_log_params(&theta[..n_kernel])?;
        Self::with_hyperparameters(x, y, kernel, noise_from_log(theta[n_kernel]))
    }

    /// Condition on data with fixed hyperparameters (no optimization).
    ///
    /// # Errors
    ///
    /// Input validation errors or [`GpError::NotPositiveDefinite`].
    pub fn with_hyperparameters(
        x: &Matrix,
        y: &Vector,
        kernel: Kernel,
        noise_variance: f64,
    ) -> Result<Self, GpError> {
        validate_training(x, y, &kernel)?;
        let (cholesky, jitter) = factor(&kernel, noise_variance, x)?;
        if jitter > 0.0 {
            tracing::warn!(jitter, "covariance needed diagonal jitter to factor");
        }
        let alpha = cholesky.solve(y);
        let log_marginal_likelihood = -negative_log_likelihood(&cholesky, y);
        Ok(Self {
            kernel,
            noise_variance,
            x_train: x.clone(),
            y_train: y.clone(),
            cholesky,
            alpha,
            log_marginal_likelihood,
            jitter,
        })
    }

    /// Predictive mean and variance at each row of `x`.
    ///
    /// # Errors
    ///
    /// [`GpError::DimensionMismatch`] if `x` is not as wide as the training inputs,
    /// [`GpError::NonFinite`] for NaN/∞ inputs.
    pub fn predict(&self, x: &Matrix) -> Result<Prediction, GpError> {
        if x.ncols() != self.x_train.ncols() {
            return Err(GpError::DimensionMismatch {
                expected: self.x_train.ncols(),
                found: x.ncols(),
            });
        }
        ensure_finite(x.iter(), "prediction inputs")?;

        let k_star = self.kernel.evaluate_unchecked(x, &self.x_train);
        let mean = &k_star * &self.alpha;

        let v = self
            .cholesky
            .l_dirty()
            .solve_lower_triangular(&k_star.transpose())
            .ok_or(GpError::NotPositiveDefinite {
                max_jitter: self.jitter,
            })?;
        let k_diag = self.kernel.evaluate_diagonal_unchecked(x);
        let variance = Vector::from_fn(x.nrows(), |i, _| {
            let explained: f64 = v.column(i).iter().map(|e| e * e).sum();
            (k_diag[i] - explained + self.noise_variance).max(0.0)
        });

        Ok(Prediction { mean, variance })
    }

    /// Fitted kernel.
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Fitted Gaussian noise variance σ²_n.
    pub fn noise_variance(&self) -> f64 {
        self.noise_variance
    }

    /// Log marginal likelihood at the fitted hyperparameters.
    pub fn log_marginal_likelihood(&self) -> f64 {
        self.log_marginal_likelihood
    }

    /// Training inputs the model is conditioned on.
    pub fn training_inputs(&self) -> &Matrix {
        &self.x_train
    }

    /// Training outputs the model is conditioned on.
    pub fn training_outputs(&self) -> &Vector {
        &self.y_train
    }
}

fn validate_training(x: &Matrix, y: &Vector, kernel: &Kernel) -> Result<(), GpError> {
    if x.nrows() == 0 {
        return Err(GpError::EmptyTrainingSet);
    }
    if x.nrows() != y.len() {
        return Err(GpError::LengthMismatch {
            inputs: x.nrows(),
            outputs: y.len(),
        });
    }
    let required = kernel.required_columns();
    if x.ncols() < required {
        return Err(GpError::DimensionMismatch {
            expected: required,
            found: x.ncols(),
        });
    }
    ensure_finite(x.iter(), "training inputs")?;
    ensure_finite(y.iter(), "training outputs")?;
    Ok(())
}

fn noise_from_log(log_noise: f64) -> f64 {
    log_noise.clamp(MIN_LOG_NOISE, MAX_LOG_PARAM).exp()
}

/// Factor `K + σ²_n I`, escalating diagonal jitter tenfold on failure.
fn factor(kernel: &Kernel, noise: f64, x: &Matrix) -> Result<(Cholesky<f64, Dyn>, f64), GpError> {
    let mut k = kernel.evaluate_unchecked(x, x);
    for i in 0..k.nrows() {
        k[(i, i)] += noise;
    }
    if let Some(chol) = Cholesky::new(k.clone()) {
        return Ok((chol, 0.0));
    }

    let mut jitter = INITIAL_JITTER;
    for _ in 0..MAX_JITTER_ATTEMPTS {
        let mut jittered = k.clone();
        for i in 0..jittered.nrows() {
            jittered[(i, i)] += jitter;
        }
        if let Some(chol) = Cholesky::new(jittered) {
            return Ok((chol, jitter));
        }
        jitter *= 10.0;
    }
    Err(GpError::NotPositiveDefinite {
        max_jitter: jitter / 10.0,
    })
}

fn negative_log_likelihood(chol: &Cholesky<f64, Dyn>, y: &Vector) -> f64 {
    let alpha = chol.solve(y);
    let half_log_det: f64 = chol.l_dirty().diagonal().iter().map(|d| d.ln()).sum();
    let n = y.len() as f64;
    let value = 0.5 * y.dot(&alpha) + half_log_det + 0.5 * n * LOG_2PI;
    if value.is_finite() {
        value
    } else {
        INFEASIBLE_OBJECTIVE
    }
}
