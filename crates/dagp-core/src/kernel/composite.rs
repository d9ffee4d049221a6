//! The augmented-input covariance `k₁(aug) · k₂(raw) + k₃(raw)`.
//!
//! Inputs are laid out as `[raw_0 … raw_{d-1}, aug_0 … aug_{m-1}]`. The product
//! term lets the correlation learned over the augmented columns vary with the
//! raw location; the additive term keeps a trend purely in the raw columns.

use serde::{Deserialize, Serialize};

use super::{Kernel, KernelFamily};

/// Base-kernel families for the three sub-kernels of [`Kernel::augmented`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KernelFamilies {
    /// Family of `k₁`, over the augmented columns.
    pub augmented: KernelFamily,
    /// Family of `k₂`, over the raw columns, multiplied with `k₁`.
    pub raw_product: KernelFamily,
    /// Family of `k₃`, over the raw columns, added on top.
    pub raw_additive: KernelFamily,
}

impl KernelFamilies {
    /// Use `family` for all three sub-kernels.
    pub fn uniform(family: KernelFamily) -> Self {
        Self {
            augmented: family,
            raw_product: family,
            raw_additive: family,
        }
    }
}

impl Kernel {
    /// Build `k₁(aug) * k₂(raw) + k₃(raw)` for `input_dim` raw columns followed
    /// by `augmented_dim` augmented columns.
    pub fn augmented(input_dim: usize, augmented_dim: usize, families: KernelFamilies) -> Self {
        let raw: Vec<usize> = (0..input_dim).collect();
        let aug: Vec<usize> = (input_dim..input_dim + augmented_dim).collect();

        let k1 = Kernel::leaf(families.augmented, aug);
        let k2 = Kernel::leaf(families.raw_product, raw.clone());
        let k3 = Kernel::leaf(families.raw_additive, raw);
        k1.product(k2).sum(k3)
    }
}
