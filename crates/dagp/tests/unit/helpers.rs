//! Shared fixtures.

use dagp::{Config, DataAugmentationGpBuilder, Matrix, OptimizerConfig};

/// Config with fewer restarts and iterations so tests stay fast.
pub fn quick_config(tau: f64, n: usize, input_dim: usize) -> Config {
    Config::new(tau, n, input_dim)
        .with_hf_restarts(2)
        .with_lf_restarts(2)
        .with_optimizer(OptimizerConfig::default().with_max_iterations(200))
}

/// `f_high = x²`, `f_low = x`, `tau = 0.1`, `n = 0`.
pub fn square_builder() -> DataAugmentationGpBuilder {
    dagp::DataAugmentationGp::builder()
        .config(quick_config(0.1, 0, 1))
        .high_fidelity(|x| x[0] * x[0])
        .low_fidelity_fn(|x| x[0])
}

/// Column matrix from values.
pub fn column(values: &[f64]) -> Matrix {
    Matrix::from_column_slice(values.len(), 1, values)
}
