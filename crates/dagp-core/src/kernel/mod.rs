//! Covariance kernels and their composition tree.
//!
//! Kernels are built structurally from [`BaseKernel`] leaves:
//!
//! - [`Kernel::sum`]: `k₁(u, v) + k₂(u, v)`
//! - [`Kernel::product`]: `k₁(u, v) · k₂(u, v)`
//! - [`Kernel::power`]: `k(u, v)^p`, element-wise
//!
//! The builders only assemble structure; numeric work happens in
//! [`Kernel::evaluate`] and [`Kernel::evaluate_diagonal`], implemented once per
//! variant.
//!
//! Hyperparameters are exposed as one flat vector in log space, ordered by a
//! depth-first walk over the leaves (left operand first). Optimizers work on
//! that vector unconstrained; positivity holds by construction.

mod base;
mod composite;

pub use base::{BaseKernel, KernelFamily};
pub use composite::KernelFamilies;

use crate::error::GpError;
use crate::types::{Matrix, Vector};

/// A covariance function assembled from base kernels.
#[derive(Debug, Clone, PartialEq)]
pub enum Kernel {
    /// A single stationary kernel.
    Leaf(BaseKernel),
    /// Sum of two kernels.
    Sum(Box<Kernel>, Box<Kernel>),
    /// Product of two kernels.
    Product(Box<Kernel>, Box<Kernel>),
    /// Element-wise integer power of a kernel.
    Power(Box<Kernel>, u32),
}

impl Kernel {
    /// A leaf kernel over `active_dims` with unit hyperparameters.
    pub fn leaf(family: KernelFamily, active_dims: Vec<usize>) -> Self {
        Kernel::Leaf(BaseKernel::new(family, active_dims))
    }

    /// `self + other`.
    pub fn sum(self, other: Kernel) -> Self {
        Kernel::Sum(Box::new(self), Box::new(other))
    }

    /// `self * other`.
    pub fn product(self, other: Kernel) -> Self {
        Kernel::Product(Box::new(self), Box::new(other))
    }

    /// `self ^ exponent`.
    pub fn power(self, exponent: u32) -> Self {
        Kernel::Power(Box::new(self), exponent)
    }

    /// All leaves in hyperparameter order.
    pub fn leaves(&self) -> Vec<&BaseKernel> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a BaseKernel>) {
        match self {
            Kernel::Leaf(k) => out.push(k),
            Kernel::Sum(a, b) | Kernel::Product(a, b) => {
                a.collect_leaves(out);
                b.collect_leaves(out);
            }
            Kernel::Power(k, _) => k.collect_leaves(out),
        }
    }

    /// Smallest input width the kernel can be evaluated on.
    pub fn required_columns(&self) -> usize {
        self.leaves()
            .iter()
            .map(|k| k.required_columns())
            .max()
            .unwrap_or(0)
    }

    /// Total number of hyperparameters across all leaves.
    pub fn n_params(&self) -> usize {
        self.leaves().iter().map(|k| k.n_params()).sum()
    }

    /// Flat log-space hyperparameter vector.
    pub fn log_params(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.n_params());
        for leaf in self.leaves() {
            leaf.push_log_params(&mut out);
        }
        out
    }

    /// Overwrite all hyperparameters from a flat log-space vector.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::LengthMismatch`] if `params.len() != n_params()`.
    pub fn set_log_params(&mut self, params: &[f64]) -> Result<(), GpError> {
        let expected = self.n_params();
        if params.len() != expected {
            return Err(GpError::LengthMismatch {
                inputs: expected,
                outputs: params.len(),
            });
        }
        let rest = self.take_log_params(params);
        debug_assert!(rest.is_empty());
        Ok(())
    }

    fn take_log_params<'a>(&mut self, params: &'a [f64]) -> &'a [f64] {
        match self {
            Kernel::Leaf(k) => k.take_log_params(params),
            Kernel::Sum(a, b) | Kernel::Product(a, b) => {
                let rest = a.take_log_params(params);
                b.take_log_params(rest)
            }
            Kernel::Power(k, _) => k.take_log_params(params),
        }
    }

    fn check_columns(&self, cols: usize) -> Result<(), GpError> {
        let expected = self.required_columns();
        if cols < expected {
            return Err(GpError::DimensionMismatch {
                expected,
                found: cols,
            });
        }
        Ok(())
    }

    /// Pairwise covariance matrix `K[i, j] = k(u_i, v_j)`.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::DimensionMismatch`] if `u` and `v` differ in width or
    /// are narrower than [`Kernel::required_columns`].
    pub fn evaluate(&self, u: &Matrix, v: &Matrix) -> Result<Matrix, GpError> {
        if u.ncols() != v.ncols() {
            return Err(GpError::DimensionMismatch {
                expected: u.ncols(),
                found: v.ncols(),
            });
        }
        self.check_columns(u.ncols())?;
        Ok(self.evaluate_unchecked(u, v))
    }

    /// Per-row variance `k(u_i, u_i)`.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::DimensionMismatch`] if `u` is too narrow.
    pub fn evaluate_diagonal(&self, u: &Matrix) -> Result<Vector, GpError> {
        self.check_columns(u.ncols())?;
        Ok(self.evaluate_diagonal_unchecked(u))
    }

    pub(crate) fn evaluate_unchecked(&self, u: &Matrix, v: &Matrix) -> Matrix {
        match self {
            Kernel::Leaf(k) => k.evaluate(u, v),
            Kernel::Sum(a, b) => a.evaluate_unchecked(u, v) + b.evaluate_unchecked(u, v),
            Kernel::Product(a, b) => a
                .evaluate_unchecked(u, v)
                .component_mul(&b.evaluate_unchecked(u, v)),
            Kernel::Power(k, p) => {
                let exponent = *p as i32;
                k.evaluate_unchecked(u, v).map(|c| c.powi(exponent))
            }
        }
    }

    pub(crate) fn evaluate_diagonal_unchecked(&self, u: &Matrix) -> Vector {
        match self {
            Kernel::Leaf(k) => k.evaluate_diagonal(u),
            Kernel::Sum(a, b) => {
                a.evaluate_diagonal_unchecked(u) + b.evaluate_diagonal_unchecked(u)
            }
            Kernel::Product(a, b) => a
                .evaluate_diagonal_unchecked(u)
                .component_mul(&b.evaluate_diagonal_unchecked(u)),
            Kernel::Power(k, p) => {
                let exponent = *p as i32;
                k.evaluate_diagonal_unchecked(u).map(|c| c.powi(exponent))
            }
        }
    }
}

impl std::fmt::Display for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kernel::Leaf(k) => write!(f, "{k}"),
            Kernel::Sum(a, b) => write!(f, "({a} + {b})"),
            Kernel::Product(a, b) => write!(f, "({a} * {b})"),
            Kernel::Power(k, p) => write!(f, "{k}^{p}"),
        }
    }
}
