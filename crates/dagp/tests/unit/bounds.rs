//! Domain bounds track every fitted input.

use dagp::Matrix;
use proptest::prelude::*;

use crate::helpers::{column, square_builder};

#[test]
fn refits_only_widen_bounds() {
    let mut model = square_builder().build().unwrap();
    model.fit(&column(&[0.0, 0.5])).unwrap();
    model.fit(&column(&[-2.0, 0.25])).unwrap();
    model.fit(&column(&[0.1, 0.2])).unwrap();
    let bounds = model.bounds().unwrap();
    assert_eq!((bounds.lower()[0], bounds.upper()[0]), (-2.0, 0.5));
}

#[test]
fn components_widen_independently() {
    let mut model = dagp::DataAugmentationGp::builder()
        .config(crate::helpers::quick_config(0.1, 0, 2))
        .high_fidelity(|x| x[0] - x[1])
        .low_fidelity_fn(|x| x[0])
        .build()
        .unwrap();
    model
        .fit(&Matrix::from_row_slice(2, 2, &[0.0, 10.0, 1.0, 20.0]))
        .unwrap();
    model
        .fit(&Matrix::from_row_slice(2, 2, &[-1.0, 15.0, 0.5, 12.0]))
        .unwrap();
    let bounds = model.bounds().unwrap();
    assert_eq!(bounds.lower(), &[-1.0, 10.0]);
    assert_eq!(bounds.upper(), &[1.0, 20.0]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// After any sequence of fits the bounds equal the global extremes.
    #[test]
    fn bounds_equal_global_extremes(
        batches in prop::collection::vec(prop::collection::vec(-5.0f64..5.0, 2..5), 1..4)
    ) {
        let mut model = square_builder()
            .config(crate::helpers::quick_config(0.1, 0, 1).with_hf_restarts(1))
            .build()
            .unwrap();
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for batch in &batches {
            model.fit(&column(batch)).unwrap();
            lo = batch.iter().copied().fold(lo, f64::min);
            hi = batch.iter().copied().fold(hi, f64::max);
            let bounds = model.bounds().unwrap();
            prop_assert_eq!(bounds.lower()[0], lo);
            prop_assert_eq!(bounds.upper()[0], hi);
        }
    }
}
