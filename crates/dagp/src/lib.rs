//! Multi-fidelity Gaussian process surrogates by data augmentation.
//!
//! An expensive high-fidelity function is modelled with a GP whose inputs are
//! extended by shifted predictions of a cheap low-fidelity model. The
//! surrogate is then refined by evaluating the high-fidelity function where
//! its predictive variance is largest.
//!
//! # Example
//!
//! ```no_run
//! use std::f64::consts::PI;
//!
//! use dagp::{DataAugmentationGp, Matrix};
//!
//! let mut model = DataAugmentationGp::builder()
//!     .tau(0.001)
//!     .n(1)
//!     .input_dim(1)
//!     .high_fidelity(|x| (x[0] - 2f64.sqrt()) * (8.0 * PI * x[0]).sin().powi(2))
//!     .low_fidelity_fn(|x| (8.0 * PI * x[0]).sin())
//!     .build()?;
//!
//! model.fit(&Matrix::from_row_slice(3, 1, &[0.0, 0.5, 1.0]))?;
//! let outcome = model.adapt(10, 0.0)?;
//! let prediction = model.predict(&Matrix::from_row_slice(1, 1, &[0.25]))?;
//! println!("{} rounds, mean {}", outcome.steps_run(), prediction.mean[0]);
//! # Ok::<(), dagp::Error>(())
//! ```

pub mod adaptive;
pub mod assessment;
pub mod augment;
pub mod baseline;
pub mod config;
pub mod dataset;
pub mod error;
pub mod low_fidelity;
pub mod metrics;
pub mod model;
pub mod output;
pub mod types;

// Re-exports for convenience
pub use adaptive::{run_adaptation, ActiveModel, AdaptConfig, AdaptOutcome, AdaptRound};
pub use assessment::{AssessmentReport, MethodAssessment, ModelReport, Surrogate};
pub use augment::{FeatureAugmenter, OffsetGenerator, SymmetricOffsets};
pub use baseline::SingleFidelityGp;
pub use config::Config;
pub use dataset::{DomainBounds, FidelityDataset};
pub use error::{ConfigError, Error, InputError, Result};
pub use low_fidelity::{LearnedLowFidelity, LowFidelityModel, LowFidelitySource};
pub use model::{DataAugmentationGp, DataAugmentationGpBuilder};
pub use types::{objective, Objective};

pub use dagp_core::{
    matrix_from_rows, Bounds, CandidateGrid, Kernel, KernelFamilies, KernelFamily, Matrix,
    OptimizerConfig, Prediction, Vector,
};
