//! Stationary base kernels with ARD length-scales.

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_LOG_PARAM, MIN_LOG_PARAM};
use crate::types::{Matrix, Vector};

const SQRT_3: f64 = 1.732_050_807_568_877_2;
const SQRT_5: f64 = 2.236_067_977_499_79;

/// Covariance family of a [`BaseKernel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KernelFamily {
    /// Squared exponential: `σ² exp(-r²/2)`.
    #[default]
    Rbf,

    /// Matérn 3/2: `σ² (1 + √3 r) exp(-√3 r)`.
    Matern32,

    /// Matérn 5/2: `σ² (1 + √5 r + 5r²/3) exp(-√5 r)`.
    Matern52,
}

impl KernelFamily {
    /// Covariance as a function of the squared scaled distance `r²`.
    #[inline]
    fn correlation(self, r_sq: f64) -> f64 {
        match self {
            KernelFamily::Rbf => (-0.5 * r_sq).exp(),
            KernelFamily::Matern32 => {
                let s = SQRT_3 * r_sq.sqrt();
                (1.0 + s) * (-s).exp()
            }
            KernelFamily::Matern52 => {
                let s = SQRT_5 * r_sq.sqrt();
                (1.0 + s + 5.0 / 3.0 * r_sq) * (-s).exp()
            }
        }
    }

    /// Short lowercase name used in kernel descriptions.
    pub fn name(self) -> &'static str {
        match self {
            KernelFamily::Rbf => "rbf",
            KernelFamily::Matern32 => "matern32",
            KernelFamily::Matern52 => "matern52",
        }
    }
}

impl std::fmt::Display for KernelFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A stationary kernel acting on a subset of input columns.
///
/// `k(u, v) = σ² ρ(r²)` with `r² = Σ_d ((u_d - v_d) / ℓ_d)²` over the active
/// columns only. Each active column carries its own length-scale ℓ_d.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseKernel {
    family: KernelFamily,
    active_dims: Vec<usize>,
    variance: f64,
    lengthscales: Vec<f64>,
}

impl BaseKernel {
    /// Create a kernel over `active_dims` with unit variance and unit length-scales.
    pub fn new(family: KernelFamily, active_dims: Vec<usize>) -> Self {
        let lengthscales = vec![1.0; active_dims.len()];
        Self {
            family,
            active_dims,
            variance: 1.0,
            lengthscales,
        }
    }

    /// Covariance family.
    pub fn family(&self) -> KernelFamily {
        self.family
    }

    /// Input columns this kernel reads.
    pub fn active_dims(&self) -> &[usize] {
        &self.active_dims
    }

    /// Signal variance σ².
    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// One length-scale per active column.
    pub fn lengthscales(&self) -> &[f64] {
        &self.lengthscales
    }

    /// Number of hyperparameters: variance plus one length-scale per column.
    pub fn n_params(&self) -> usize {
        1 + self.lengthscales.len()
    }

    /// Smallest input width this kernel can be evaluated on.
    pub fn required_columns(&self) -> usize {
        self.active_dims.iter().max().map_or(0, |&d| d + 1)
    }

    /// Append `[ln σ², ln ℓ_1, …]` to `out`.
    pub fn push_log_params(&self, out: &mut Vec<f64>) {
        out.push(self.variance.ln());
        out.extend(self.lengthscales.iter().map(|l| l.ln()));
    }

    /// Read `n_params()` log values from the front of `params`, returning the rest.
    ///
    /// Values are clamped to the log-space box so exponentiation stays finite.
    pub fn take_log_params<'a>(&mut self, params: &'a [f64]) -> &'a [f64] {
        let (mine, rest) = params.split_at(self.n_params());
        self.variance = mine[0].clamp(MIN_LOG_PARAM, MAX_LOG_PARAM).exp();
        for (l, &p) in self.lengthscales.iter_mut().zip(&mine[1..]) {
            *l = p.clamp(MIN_LOG_PARAM, MAX_LOG_PARAM).exp();
        }
        rest
    }

    #[inline]
    fn scaled_sq_dist(&self, u: &Matrix, i: usize, v: &Matrix, j: usize) -> f64 {
        self.active_dims
            .iter()
            .zip(&self.lengthscales)
            .map(|(&d, &l)| {
                let diff = (u[(i, d)] - v[(j, d)]) / l;
                diff * diff
            })
            .sum()
    }

    /// Pairwise covariance between the rows of `u` and `v`.
    ///
    /// Callers guarantee both matrices have at least `required_columns()` columns.
    pub(crate) fn evaluate(&self, u: &Matrix, v: &Matrix) -> Matrix {
        Matrix::from_fn(u.nrows(), v.nrows(), |i, j| {
            self.variance * self.family.correlation(self.scaled_sq_dist(u, i, v, j))
        })
    }

    /// `k(u_i, u_i)` for every row; constant σ² for stationary kernels.
    pub(crate) fn evaluate_diagonal(&self, u: &Matrix) -> Vector {
        Vector::from_element(u.nrows(), self.variance)
    }
}

impl std::fmt::Display for BaseKernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{:?}", self.family, self.active_dims)
    }
}
