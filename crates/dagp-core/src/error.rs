//! Error types for regression and matrix construction.

use thiserror::Error;

/// Error returned by kernel evaluation, matrix construction and GP fitting.
///
/// Optimizer non-convergence is deliberately absent: the best hyperparameters
/// found before the stopping criterion are always accepted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GpError {
    /// A fit was requested with zero training rows.
    #[error("training set is empty")]
    EmptyTrainingSet,

    /// Input columns do not match what the kernel or model expects.
    #[error("expected {expected} input columns, found {found}")]
    DimensionMismatch {
        /// Columns the kernel or model was built for.
        expected: usize,
        /// Columns actually supplied.
        found: usize,
    },

    /// Input rows and output values disagree in count.
    #[error("{inputs} input rows but {outputs} output values")]
    LengthMismatch {
        /// Number of input rows.
        inputs: usize,
        /// Number of output values.
        outputs: usize,
    },

    /// A row-major input had rows of different lengths.
    #[error("row {row} has {found} values, expected {expected}")]
    RaggedRows {
        /// Offending row index.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },

    /// Input or output contained NaN or infinity.
    #[error("non-finite value in {0}")]
    NonFinite(&'static str),

    /// The covariance stayed indefinite after jitter escalation.
    #[error("covariance matrix is not positive definite (jitter up to {max_jitter:e})")]
    NotPositiveDefinite {
        /// Largest diagonal jitter that was tried.
        max_jitter: f64,
    },
}
