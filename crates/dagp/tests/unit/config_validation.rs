//! Builder and configuration validation.

use dagp::{ConfigError, DataAugmentationGp, Error, Matrix, OffsetGenerator, Vector};

use crate::helpers::{quick_config, square_builder};

#[test]
fn both_low_fidelity_sources_rejected() {
    let err = square_builder()
        .low_fidelity_data(Matrix::zeros(3, 1), Vector::zeros(3), 1)
        .build()
        .unwrap_err();
    assert_eq!(err, Error::Config(ConfigError::ConflictingLowFidelity));
}

#[test]
fn no_low_fidelity_source_rejected() {
    let err = DataAugmentationGp::builder()
        .high_fidelity(|x| x[0])
        .build()
        .unwrap_err();
    assert_eq!(err, Error::Config(ConfigError::MissingLowFidelity));
}

#[test]
fn zero_input_dim_rejected() {
    let err = square_builder().input_dim(0).build().unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::TooSmall {
            name: "input_dim",
            ..
        })
    ));
}

#[test]
fn non_finite_tau_rejected() {
    let err = square_builder().tau(f64::NAN).build().unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::InvalidTau(_))));
}

struct TwoOffsets;

impl OffsetGenerator for TwoOffsets {
    fn offsets(&self, _n: usize) -> Vec<f64> {
        vec![-1.0, 1.0]
    }
}

#[test]
fn offset_generator_length_checked() {
    let err = square_builder()
        .n(1)
        .offsets(TwoOffsets)
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        Error::Config(ConfigError::OffsetCount {
            expected: 3,
            found: 2
        })
    );
}

#[test]
fn custom_offsets_used_in_column_order() {
    struct Reversed;
    impl OffsetGenerator for Reversed {
        fn offsets(&self, n: usize) -> Vec<f64> {
            let n = n as i64;
            (-n..=n).rev().map(|k| k as f64).collect()
        }
    }
    let model = DataAugmentationGp::builder()
        .config(quick_config(0.5, 1, 1))
        .high_fidelity(|x| x[0])
        .low_fidelity_fn(|x| x[0])
        .offsets(Reversed)
        .build()
        .unwrap();
    assert_eq!(model.augmenter().offsets(), &[1.0, 0.0, -1.0]);
}
