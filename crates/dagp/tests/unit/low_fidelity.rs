//! Models built on a learned low-fidelity GP.

use dagp::{DataAugmentationGp, Error, Matrix, Vector};

use crate::helpers::{column, quick_config};

fn seed() -> (Matrix, Vector) {
    let x = column(&[0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    let y = Vector::from_iterator(6, x.iter().map(|v| (4.0 * v).sin()));
    (x, y)
}

#[test]
fn refinement_rounds_scale_with_ratio() {
    let (x, y) = seed();
    let model = DataAugmentationGp::builder()
        .config(quick_config(0.01, 1, 1).with_adapt_steps(2))
        .high_fidelity(|x| (4.0 * x[0]).sin() * x[0])
        .low_fidelity_data(x, y, 3)
        .build()
        .unwrap();
    let learned = model.low_fidelity().learned().unwrap();
    assert_eq!(learned.rounds(), 6);
    assert_eq!(learned.dataset().len(), 12);
}

#[test]
fn learned_model_fits_and_adapts() {
    let (x, y) = seed();
    let mut model = DataAugmentationGp::builder()
        .config(quick_config(0.01, 1, 1).with_adapt_steps(1))
        .high_fidelity(|x| (4.0 * x[0]).sin() * x[0])
        .low_fidelity_data(x, y, 1)
        .build()
        .unwrap();
    assert!(model.low_fidelity().is_learned());
    model.fit(&column(&[0.0, 0.5, 1.0])).unwrap();
    assert_eq!(model.augmented_training_inputs().unwrap().ncols(), 4);
    let outcome = model.adapt_with(&model.adapt_config()).unwrap();
    assert_eq!(outcome.steps_run(), 1);
    assert_eq!(model.training_inputs().unwrap().nrows(), 4);
}

#[test]
fn malformed_seed_data_rejected() {
    let err = DataAugmentationGp::builder()
        .config(quick_config(0.01, 1, 1))
        .high_fidelity(|x| x[0])
        .low_fidelity_data(Matrix::zeros(3, 2), Vector::zeros(3), 1)
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::Input(_)));

    let err = DataAugmentationGp::builder()
        .config(quick_config(0.01, 1, 1))
        .high_fidelity(|x| x[0])
        .low_fidelity_data(column(&[0.0, 1.0]), Vector::zeros(3), 1)
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::Input(_)));
}
