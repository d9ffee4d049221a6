//! Fit, predict and adapt on small problems.

use dagp::{AdaptConfig, CandidateGrid, DataAugmentationGp, Error, InputError, Matrix, Vector};

use crate::helpers::{column, quick_config, square_builder};

#[test]
fn square_with_identity_low_fidelity() {
    let mut model = square_builder().build().unwrap();
    model.fit(&column(&[-1.0, 0.0, 1.0])).unwrap();

    assert_eq!(
        model.augmented_training_inputs().unwrap(),
        &Matrix::from_row_slice(3, 2, &[-1.0, -1.0, 0.0, 0.0, 1.0, 1.0])
    );
    assert_eq!(model.training_outputs().unwrap().as_slice(), &[1.0, 0.0, 1.0]);
    let bounds = model.bounds().unwrap();
    assert_eq!(bounds.lower(), &[-1.0]);
    assert_eq!(bounds.upper(), &[1.0]);

    let outcome = model.adapt(2, 0.0).unwrap();
    assert!(!outcome.converged_early());
    assert_eq!(outcome.steps_run(), 2);
    assert_eq!(model.training_inputs().unwrap().nrows(), 5);
    for round in outcome.history() {
        assert!((-1.0..=1.0).contains(&round.point[0]));
        assert_eq!(round.value, round.point[0] * round.point[0]);
    }
    // Selected points stay inside the bounds, so the bounds are unchanged.
    let bounds = model.bounds().unwrap();
    assert_eq!((bounds.lower()[0], bounds.upper()[0]), (-1.0, 1.0));
}

#[test]
fn predictions_are_finite_and_variances_non_negative() {
    let mut model = square_builder().build().unwrap();
    model.fit(&column(&[-1.0, -0.5, 0.0, 0.5, 1.0])).unwrap();
    let x = column(&[-0.75, -0.25, 0.25, 0.75]);
    let prediction = model.predict(&x).unwrap();
    assert_eq!(prediction.len(), 4);
    assert!(prediction.mean.iter().all(|m| m.is_finite()));
    assert!(prediction.variance.iter().all(|v| *v >= 0.0));
    assert_eq!(model.predict_means(&x).unwrap(), prediction.mean);
    assert_eq!(model.predict_variance(&x).unwrap(), prediction.variance);
}

#[test]
fn column_mismatch_rejected() {
    let mut model = square_builder().build().unwrap();
    assert_eq!(
        model.fit(&Matrix::zeros(3, 2)).unwrap_err(),
        Error::Input(InputError::ColumnMismatch {
            expected: 1,
            found: 2
        })
    );
    model.fit(&column(&[-1.0, 0.0, 1.0])).unwrap();
    assert_eq!(
        model.predict(&Matrix::zeros(2, 3)).unwrap_err(),
        Error::Input(InputError::ColumnMismatch {
            expected: 1,
            found: 3
        })
    );
}

#[test]
fn empty_and_non_finite_inputs_rejected() {
    let mut model = square_builder().build().unwrap();
    assert_eq!(
        model.fit(&Matrix::zeros(0, 1)).unwrap_err(),
        Error::Input(InputError::Empty)
    );
    assert_eq!(
        model.fit(&column(&[0.0, f64::INFINITY])).unwrap_err(),
        Error::Input(InputError::NonFinite)
    );
}

#[test]
fn adapt_before_fit_rejected() {
    let mut model = square_builder().build().unwrap();
    assert_eq!(model.adapt(1, 0.0).unwrap_err(), Error::NotFitted);
}

#[test]
fn large_eps_stops_before_first_evaluation() {
    let mut model = square_builder().build().unwrap();
    model.fit(&column(&[-1.0, 0.0, 1.0])).unwrap();
    let outcome = model.adapt(5, 1e9).unwrap();
    assert!(outcome.converged_early());
    assert_eq!(outcome.steps_run(), 0);
    assert_eq!(model.training_inputs().unwrap().nrows(), 3);
}

#[test]
fn assess_log_mse_is_log2_of_mse() {
    let mut model = square_builder().build().unwrap();
    model.fit(&column(&[-1.0, -0.5, 0.0, 0.5, 1.0])).unwrap();
    let x_test = column(&[-0.8, 0.3, 0.9]);
    let y_test = Vector::from_iterator(3, x_test.iter().map(|x| x * x));
    let mse = model.assess_mse(&x_test, &y_test).unwrap();
    let log_mse = model.assess_log_mse(&x_test, &y_test).unwrap();
    assert!(mse >= 0.0);
    assert!((log_mse - mse.log2()).abs() < 1e-12);
}

#[test]
fn closed_form_model_is_deterministic() {
    let build = || {
        let mut model = square_builder().n(1).build().unwrap();
        model.fit(&column(&[-1.0, 0.0, 1.0])).unwrap();
        model.adapt(1, 0.0).unwrap();
        model
    };
    let a = build();
    let b = build();
    let x = column(&[-0.6, 0.1, 0.7]);
    assert_eq!(a.training_inputs(), b.training_inputs());
    assert_eq!(a.predict(&x).unwrap(), b.predict(&x).unwrap());
}

#[test]
fn two_dimensional_tensor_grid() {
    let config = quick_config(0.01, 1, 2).with_grid(CandidateGrid::Tensor);
    let mut model = DataAugmentationGp::builder()
        .config(config)
        .high_fidelity(|x| x[0] * x[1])
        .low_fidelity_fn(|x| x[0] + x[1])
        .build()
        .unwrap();
    let x = Matrix::from_row_slice(4, 2, &[0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0]);
    model.fit(&x).unwrap();
    assert_eq!(model.augmented_training_inputs().unwrap().ncols(), 5);

    let config = model.adapt_config().grid_points(25);
    let outcome = model.adapt_with(&AdaptConfig { steps: 1, ..config }).unwrap();
    let point = &outcome.history()[0].point;
    assert_eq!(point.len(), 2);
    assert!(model.bounds().unwrap().contains(point));
    assert_eq!(model.training_inputs().unwrap().nrows(), 5);
}

#[test]
fn model_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DataAugmentationGp>();
    assert_send_sync::<dagp::SingleFidelityGp>();
}
