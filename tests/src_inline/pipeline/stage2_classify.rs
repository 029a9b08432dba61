use super::*;
use crate::model::palette::EDUCATION_BLUES;
use crate::model::profile::ChartProfile;
use proptest::prelude::*;

#[test]
fn test_classify_examples() {
    assert_eq!(classify(0.0, 100.0, 5, 100.0).unwrap().get(), 5);
    assert_eq!(classify(0.0, 100.0, 5, 0.0).unwrap().get(), 1);
    assert_eq!(classify(0.0, 100.0, 5, 50.0).unwrap().get(), 3);
    assert_eq!(classify(0.0, 100.0, 5, 19.999).unwrap().get(), 1);
    assert_eq!(classify(0.0, 100.0, 5, 20.0).unwrap().get(), 2);
}

#[test]
fn test_classify_errors() {
    assert_eq!(
        classify(10.0, 0.0, 5, 5.0),
        Err(ClassifyError::InvalidDomain { min: 10.0, max: 0.0 })
    );
    assert_eq!(
        classify(0.0, 10.0, 0, 5.0),
        Err(ClassifyError::InvalidBucketCount)
    );
    assert!(matches!(
        classify(0.0, 10.0, 5, 10.5),
        Err(ClassifyError::OutOfRange { .. })
    ));
    assert!(matches!(
        classify(0.0, 10.0, 5, -0.1),
        Err(ClassifyError::OutOfRange { .. })
    ));
    assert!(matches!(
        classify(0.0, 10.0, 5, f64::NAN),
        Err(ClassifyError::OutOfRange { .. })
    ));
}

#[test]
fn test_classify_degenerate_domain() {
    assert_eq!(classify(3.0, 3.0, 7, 3.0).unwrap().get(), 7);
}

#[test]
fn test_wide_domain_does_not_overflow() {
    assert_eq!(classify(-1e308, 1e308, 4, 0.9e308).unwrap().get(), 4);
    assert_eq!(classify(-1e308, 1e308, 4, -0.9e308).unwrap().get(), 1);
    assert_eq!(classify(-1e308, 1e308, 4, 0.0).unwrap().get(), 3);

    let ticks = tick_values(-1e308, 1e308, 4).unwrap();
    assert_eq!(ticks.len(), 5);
    assert_eq!(ticks[0], -1e308);
    assert_eq!(ticks[2], 0.0);
    assert_eq!(ticks[4], 1e308);
    for w in ticks.windows(2) {
        assert!(w[0] < w[1]);
    }
}

#[test]
fn test_tick_values_rounding() {
    let ticks = tick_values(2.6, 75.1, 7).unwrap();
    assert_eq!(ticks.len(), 8);
    assert_eq!(ticks[0], 2.6);
    assert_eq!(ticks[7], 75.1);
    // 2.6 + 72.5 / 7 = 12.957...
    assert_eq!(ticks[1], 13.0);
}

#[test]
fn test_tick_values_exact_half_rounds_up() {
    // 0.25 and 0.75 are exact binary ties.
    let ticks = tick_values(0.25, 0.75, 1).unwrap();
    assert_eq!(ticks, vec![0.3, 0.8]);
    let ticks = tick_values(-0.75, -0.25, 1).unwrap();
    assert_eq!(ticks, vec![-0.8, -0.3]);
}

#[test]
fn test_scaled_ticks_divide_after_rounding() {
    let ticks = scaled_tick_values(0.0, 50.0, 2, 100.0).unwrap();
    assert_eq!(ticks, vec![0.0, 0.25, 0.5]);
}

#[test]
fn test_extent() {
    assert_eq!(extent(vec![3.0, f64::NAN, -1.0, 7.5]).unwrap(), (-1.0, 7.5));
    assert_eq!(extent(Vec::<f64>::new()), Err(ClassifyError::EmptyDataset));
    assert_eq!(extent(vec![f64::NAN]), Err(ClassifyError::EmptyDataset));
}

#[test]
fn test_classifier_colors_and_legend() {
    let classifier = Classifier::from_values(vec![2.6, 30.0, 75.1], EDUCATION_BLUES).unwrap();
    assert_eq!(classifier.bucket_count(), 7);
    assert_eq!(classifier.color(2.6).unwrap(), "#CEE8F0");
    assert_eq!(classifier.color(75.1).unwrap(), "#1A4858");

    let profile = ChartProfile::education_v1();
    let legend = classifier.legend(&profile.legend).unwrap();
    assert_eq!(legend.cells.len(), 7);
    assert_eq!(legend.ticks.len(), 8);
    assert!((legend.cells[1].x - 250.0 / 7.0).abs() < 1e-9);
    assert_eq!(legend.ticks[0].label, "3%");
    assert_eq!(legend.ticks[0].position, 0.0);
    assert!((legend.ticks[7].position - 250.0).abs() < 1e-9);
    assert!((legend.ticks[7].value - 0.751).abs() < 1e-12);
}

#[test]
fn test_classifier_rejects_empty_palette() {
    assert_eq!(
        Classifier::new(0.0, 1.0, &[]).unwrap_err(),
        ClassifyError::InvalidBucketCount
    );
}

proptest! {
    #[test]
    fn classify_stays_in_range(
        min in -1000.0f64..1000.0,
        span in 0.0f64..1000.0,
        t in 0.0f64..=1.0,
        n in 1u32..32,
    ) {
        let max = min + span;
        let value = (min + span * t).min(max);
        let bucket = classify(min, max, n, value).unwrap().get();
        prop_assert!(bucket >= 1 && bucket <= n);
        prop_assert_eq!(classify(min, max, n, max).unwrap().get(), n);
    }

    #[test]
    fn classify_is_monotonic(
        min in -100.0f64..100.0,
        span in 0.001f64..100.0,
        a in 0.0f64..=1.0,
        b in 0.0f64..=1.0,
        n in 1u32..16,
    ) {
        let max = min + span;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let x = (min + span * lo).min(max);
        let y = (min + span * hi).min(max);
        prop_assert!(classify(min, max, n, x).unwrap() <= classify(min, max, n, y).unwrap());
    }

    #[test]
    fn ticks_are_ordered_and_complete(
        min in -500.0f64..500.0,
        span in 0.0f64..500.0,
        n in 1u32..20,
    ) {
        let max = min + span;
        let ticks = tick_values(min, max, n).unwrap();
        prop_assert_eq!(ticks.len(), n as usize + 1);
        for w in ticks.windows(2) {
            prop_assert!(w[0] <= w[1]);
        }
        prop_assert!((ticks[0] - min).abs() <= 0.05 + 1e-9);
        prop_assert!((ticks[n as usize] - max).abs() <= 0.05 + 1e-9);
    }
}
