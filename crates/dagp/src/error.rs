//! Error types for model construction, inputs, and fitting.

use dagp_core::GpError;
use thiserror::Error;

/// Invalid construction-time configuration.
///
/// Detected eagerly (in `build()` or `new()`), never recoverable by the
/// engine itself: the caller has to reconstruct with valid settings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Both a closed-form low-fidelity function and seed data were supplied.
    #[error("low-fidelity model given both as a closed form and as seed data")]
    ConflictingLowFidelity,

    /// Neither a closed-form low-fidelity function nor seed data was supplied.
    #[error("no low-fidelity model: provide a closed form or seed data")]
    MissingLowFidelity,

    /// No high-fidelity function was supplied.
    #[error("no high-fidelity function provided")]
    MissingHighFidelity,

    /// `tau` must be finite and strictly positive.
    #[error("tau must be finite and > 0, got {0}")]
    InvalidTau(f64),

    /// `eps` must be finite and non-negative.
    #[error("eps must be finite and >= 0, got {0}")]
    InvalidEps(f64),

    /// A count-like setting is below its minimum.
    #[error("{name} must be >= {min}, got {value}")]
    TooSmall {
        /// Setting name.
        name: &'static str,
        /// Smallest accepted value.
        min: usize,
        /// Value supplied.
        value: usize,
    },

    /// The offset generator did not return `2n + 1` values.
    #[error("offset generator produced {found} offsets, expected {expected}")]
    OffsetCount {
        /// `2n + 1`.
        expected: usize,
        /// Number returned.
        found: usize,
    },

    /// The offset generator returned NaN or infinity.
    #[error("offset generator produced a non-finite offset")]
    NonFiniteOffset,

    /// A comparison needs at least one model.
    #[error("assessment needs at least one model")]
    EmptyModelList,

    /// Models under comparison must share one input dimension.
    #[error("model '{name}' has input_dim {found}, expected {expected}")]
    InputDimMismatch {
        /// Offending model.
        name: String,
        /// Input dimension of the first model.
        expected: usize,
        /// Input dimension of the offending model.
        found: usize,
    },

    /// Two models under comparison share a name.
    #[error("duplicate model name '{0}'")]
    DuplicateModelName(String),
}

/// Malformed input matrices, detected before any model computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputError {
    /// Input has no rows.
    #[error("input must be non-empty")]
    Empty,

    /// Input column count differs from the model's `input_dim`.
    #[error("expected {expected} input columns, found {found}")]
    ColumnMismatch {
        /// The model's `input_dim`.
        expected: usize,
        /// Columns supplied.
        found: usize,
    },

    /// Input contained NaN or infinity.
    #[error("input contains non-finite values")]
    NonFinite,

    /// Inputs and outputs differ in row count.
    #[error("{inputs} input rows but {outputs} output values")]
    RowCountMismatch {
        /// Number of input rows.
        inputs: usize,
        /// Number of output values.
        outputs: usize,
    },
}

/// Any failure surfaced by the engine.
///
/// There are no retries and no partial recovery: every failure propagates to
/// the caller as-is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid input matrix.
    #[error("invalid input: {0}")]
    Input(#[from] InputError),

    /// Failure inside regression (factorization, shape checks).
    #[error("regression failed: {0}")]
    Regression(#[from] GpError),

    /// Prediction or adaptation requested before the first `fit`.
    #[error("model has not been fitted")]
    NotFitted,
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
