//! Numerical constants used throughout the crate.

/// Default deterministic seed for restart perturbations.
///
/// Same seed + same data = same fitted hyperparameters.
/// The value `0x6E61726770` is "nargp" encoded in ASCII.
pub const DEFAULT_SEED: u64 = 0x6E61726770;

/// Natural log of 2*pi, used in the Gaussian log marginal likelihood.
pub const LOG_2PI: f64 = 1.8378770664093453;

// =============================================================================
// Default fitting constants
// =============================================================================

/// Optimizations run when fitting the high-fidelity model.
pub const DEFAULT_HF_RESTARTS: usize = 6;

/// Optimizations run on every low-fidelity refinement refit.
pub const DEFAULT_LF_RESTARTS: usize = 5;

/// Candidate grid size used by the low-fidelity self-refinement.
pub const DEFAULT_LF_GRID_POINTS: usize = 100;

/// Candidate grid size used by the high-fidelity adaptation loop.
pub const DEFAULT_ADAPT_GRID_POINTS: usize = 200;

/// Initial Gaussian noise variance before optimization.
pub const DEFAULT_NOISE_VARIANCE: f64 = 1.0;

// =============================================================================
// Log-space hyperparameter box
// =============================================================================

/// Lower clamp for any log hyperparameter (exp(-18) ≈ 1.5e-8).
pub const MIN_LOG_PARAM: f64 = -18.0;

/// Upper clamp for any log hyperparameter (exp(12) ≈ 1.6e5).
pub const MAX_LOG_PARAM: f64 = 12.0;

/// Lower clamp for the log noise variance (exp(-23) ≈ 1e-10).
pub const MIN_LOG_NOISE: f64 = -23.0;

// =============================================================================
// Cholesky jitter escalation
// =============================================================================

/// First jitter added to the covariance diagonal when factorization fails.
pub const INITIAL_JITTER: f64 = 1e-10;

/// Maximum number of tenfold jitter escalations before giving up.
pub const MAX_JITTER_ATTEMPTS: usize = 8;

/// Value returned by the objective when the covariance cannot be factored.
pub const INFEASIBLE_OBJECTIVE: f64 = 1e300;
