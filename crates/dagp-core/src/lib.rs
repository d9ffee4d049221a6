//! Numerical core for multi-fidelity Gaussian process surrogates.
//!
//! This crate provides the building blocks the `dagp` engine is assembled from:
//!
//! - [`kernel`]: stationary ARD kernels and an explicit composition tree
//!   (sum, product, power), including the augmented-input covariance
//!   `k₁(aug) · k₂(raw) + k₃(raw)`
//! - [`gp`]: exact GP regression with random-restart marginal-likelihood fitting
//! - [`optimize`]: Nelder–Mead minimization over log-space hyperparameters
//! - [`grid`]: domain bounds and candidate grids for uncertainty sampling
//!
//! # Usage
//!
//! ```ignore
//! use dagp_core::{
//!     gp::{FitOptions, GaussianProcess},
//!     kernel::{Kernel, KernelFamily},
//!     types::{Matrix, Vector},
//! };
//!
//! let x = Matrix::from_row_slice(3, 1, &[0.0, 0.5, 1.0]);
//! let y = Vector::from_vec(vec![0.0, 0.25, 1.0]);
//! let kernel = Kernel::leaf(KernelFamily::Rbf, vec![0]);
//! let gp = GaussianProcess::fit(&x, &y, kernel, &FitOptions::default())?;
//! let prediction = gp.predict(&x)?;
//! ```

pub mod constants;
pub mod error;
pub mod gp;
pub mod grid;
pub mod kernel;
pub mod optimize;
pub mod types;

// Re-export commonly used items at crate root
pub use error::GpError;
pub use gp::{argmax_first, FitOptions, GaussianProcess, Prediction};
pub use grid::{linspace, Bounds, CandidateGrid};
pub use kernel::{BaseKernel, Kernel, KernelFamilies, KernelFamily};
pub use optimize::{nelder_mead, Minimum, OptimizerConfig};
pub use types::{matrix_from_rows, Matrix, Vector};
