//! Comparing the augmented model against the single-fidelity baseline.

use dagp::output::{to_json, to_json_pretty};
use dagp::{
    matrix_from_rows, AssessmentReport, CandidateGrid, ConfigError, DataAugmentationGp, Error,
    MethodAssessment, SingleFidelityGp, Surrogate, Vector,
};

use crate::helpers::{column, quick_config, square_builder};

fn models() -> Vec<Box<dyn Surrogate>> {
    let nargp = square_builder().name("nargp").build().unwrap();
    let gp = SingleFidelityGp::new("gp", 1, |x| x[0] * x[0])
        .unwrap()
        .with_restarts(2)
        .unwrap();
    vec![Box::new(nargp), Box::new(gp)]
}

/// 2-D models that search a 7-point diagonal instead of the default grid.
fn diagonal_models() -> (DataAugmentationGp, SingleFidelityGp) {
    let config = quick_config(0.1, 0, 2)
        .with_grid(CandidateGrid::Diagonal)
        .with_adapt_grid_points(7);
    let nargp = DataAugmentationGp::builder()
        .name("nargp")
        .config(config)
        .high_fidelity(|x| x[0] * x[1])
        .low_fidelity_fn(|x| x[0] + x[1])
        .build()
        .unwrap();
    let gp = SingleFidelityGp::new("gp", 2, |x| x[0] * x[1])
        .unwrap()
        .with_restarts(2)
        .unwrap()
        .with_grid(CandidateGrid::Diagonal)
        .with_grid_points(7);
    (nargp, gp)
}

fn test_set() -> (dagp::Matrix, Vector) {
    let x = column(&[-0.9, -0.3, 0.2, 0.8]);
    let y = Vector::from_iterator(4, x.iter().map(|v| v * v));
    (x, y)
}

#[test]
fn duplicate_names_rejected() {
    let (x, y) = test_set();
    let mut models = models();
    models.push(Box::new(SingleFidelityGp::new("gp", 1, |x| x[0]).unwrap()));
    let err = MethodAssessment::new(models, x, y, "dup").err().unwrap();
    assert_eq!(
        err,
        Error::Config(ConfigError::DuplicateModelName("gp".to_string()))
    );
}

#[test]
fn input_dim_mismatch_names_the_model() {
    let (x, y) = test_set();
    let mut models = models();
    models.push(Box::new(SingleFidelityGp::new("wide", 3, |x| x[0]).unwrap()));
    let err = MethodAssessment::new(models, x, y, "dims").err().unwrap();
    assert_eq!(
        err,
        Error::Config(ConfigError::InputDimMismatch {
            name: "wide".to_string(),
            expected: 1,
            found: 3
        })
    );
}

#[test]
fn fit_adapt_and_report() {
    let (x, y) = test_set();
    let mut assessment = MethodAssessment::new(models(), x, y, "x squared").unwrap();
    assessment.fit_models(&column(&[-1.0, 0.0, 1.0])).unwrap();
    assessment.adapt_models(2, 0.0).unwrap();

    let mses = assessment.mses().unwrap();
    assert_eq!(mses.len(), 2);
    assert!(mses.values().all(|m| m.is_finite() && *m >= 0.0));

    let report = assessment.report().unwrap();
    assert_eq!(report.title, "x squared");
    assert_eq!(report.test_points, 4);
    let names: Vec<_> = report.models.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["nargp", "gp"]);
    for model in &report.models {
        assert_eq!(model.training_points, 5);
        assert_eq!(model.adaptation.as_ref().unwrap().steps_run(), 2);
    }

    let json = to_json(&report).unwrap();
    assert!(json.contains("\"name\":\"nargp\""));
    let back: AssessmentReport = serde_json::from_str(&to_json_pretty(&report).unwrap()).unwrap();
    assert_eq!(back.title, report.title);
    assert_eq!(back.models.len(), 2);
    assert_eq!(back.models[1].training_points, 5);
}

#[test]
fn harness_adapts_on_each_model_grid() {
    let x_train = matrix_from_rows(&[
        vec![0.0, 0.0],
        vec![1.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 1.0],
    ])
    .unwrap();

    let (mut nargp, mut gp) = diagonal_models();
    nargp.fit(&x_train).unwrap();
    gp.fit(&x_train).unwrap();
    let direct = [
        nargp.adapt(1, 0.0).unwrap().history()[0].point.clone(),
        gp.adapt(1, 0.0).unwrap().history()[0].point.clone(),
    ];

    let (nargp, gp) = diagonal_models();
    let x_test = matrix_from_rows(&[vec![0.25, 0.75], vec![0.5, 0.5]]).unwrap();
    let y_test = Vector::from_vec(vec![0.1875, 0.25]);
    let mut assessment =
        MethodAssessment::new(vec![Box::new(nargp), Box::new(gp)], x_test, y_test, "grid")
            .unwrap();
    assessment.fit_models(&x_train).unwrap();
    assessment.adapt_models(1, 0.0).unwrap();

    for (name, expected) in ["nargp", "gp"].into_iter().zip(&direct) {
        let point = &assessment.adaptations()[name].history()[0].point;
        assert_eq!(point, expected, "{name}");
        assert_eq!(point[0], point[1], "{name} left the diagonal");
        let scaled = point[0] * 6.0;
        assert!((scaled - scaled.round()).abs() < 1e-9, "{name} not on the 7-point grid");
    }
}
