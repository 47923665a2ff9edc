use polars::prelude::*;
use rstest::rstest;
use std::str::FromStr;
use stock_forecast::models::linear::{LinearRegression, RidgeRegression};
use stock_forecast::models::{ModelKind, Predictor, TrainOptions};
use stock_forecast::series::{DemandSeries, DemandSeriesConfig};
use stock_forecast::StockError;

/// A small frame where the target is an exact linear function of the
/// features: y = 3 + 2*a - b
fn linear_frame(n: usize) -> (DataFrame, Series) {
    let a: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let b: Vec<f64> = (0..n).map(|i| ((i * 7) % 13) as f64).collect();
    let y: Vec<f64> = a.iter().zip(&b).map(|(a, b)| 3.0 + 2.0 * a - b).collect();

    let df = DataFrame::new(vec![Series::new("a", a), Series::new("b", b)]).unwrap();
    (df, Series::new("y", y))
}

#[test]
fn test_model_kind_parses_selector_strings() {
    assert_eq!(ModelKind::from_str("linear").unwrap(), ModelKind::Linear);
    assert_eq!(ModelKind::from_str("ridge").unwrap(), ModelKind::Ridge);
    assert_eq!(ModelKind::from_str("rf").unwrap(), ModelKind::RandomForest);
    assert_eq!(
        ModelKind::from_str("random_forest").unwrap(),
        ModelKind::RandomForest
    );
    assert_eq!(
        ModelKind::from_str("gb").unwrap(),
        ModelKind::GradientBoosting
    );

    let unknown = ModelKind::from_str("svm");
    assert!(matches!(unknown, Err(StockError::InvalidParameter(_))));
}

#[test]
fn test_predict_before_train_fails() {
    let predictor = Predictor::new(ModelKind::Linear);
    let result = predictor.predict(&[1.0, 2.0]);
    assert!(matches!(result, Err(StockError::NotTrained)));
}

#[test]
fn test_importance_before_train_fails() {
    let predictor = Predictor::new(ModelKind::RandomForest);
    let result = predictor.feature_importance();
    assert!(matches!(result, Err(StockError::NotTrained)));
}

#[test]
fn test_linear_recovers_exact_relationship() {
    let (x, y) = linear_frame(60);
    let mut predictor = Predictor::new(ModelKind::Linear);
    let metrics = predictor.train(&x, &y, &TrainOptions::default()).unwrap();

    assert!(metrics.mse < 1e-6);
    assert!(metrics.r2 > 0.999);

    // y(10, 5) = 3 + 20 - 5
    let predicted = predictor.predict(&[10.0, 5.0]).unwrap();
    assert!((predicted - 18.0).abs() < 1e-6);
}

#[test]
fn test_train_is_deterministic_per_seed() {
    let (x, y) = linear_frame(60);
    let opts = TrainOptions::default();

    for kind in [
        ModelKind::Linear,
        ModelKind::Ridge,
        ModelKind::RandomForest,
        ModelKind::GradientBoosting,
    ] {
        let mut first = Predictor::new(kind);
        let mut second = Predictor::new(kind);

        let m1 = first.train(&x, &y, &opts).unwrap();
        let m2 = second.train(&x, &y, &opts).unwrap();

        assert_eq!(m1.mse.to_bits(), m2.mse.to_bits(), "kind {}", kind);
        assert_eq!(m1.r2.to_bits(), m2.r2.to_bits(), "kind {}", kind);
    }
}

#[rstest]
#[case(ModelKind::RandomForest)]
#[case(ModelKind::GradientBoosting)]
fn test_tree_ensembles_fit_synthetic_demand(#[case] kind: ModelKind) {
    let series = DemandSeries::generate(&DemandSeriesConfig {
        noise_std: 2.0,
        ..Default::default()
    })
    .unwrap();

    let mut predictor = Predictor::new(kind);
    let metrics = predictor
        .train(
            &series.features_frame().unwrap(),
            &series.target(),
            &TrainOptions::default(),
        )
        .unwrap();

    assert!(metrics.r2 > 0.5, "r2 was {}", metrics.r2);
    assert!(metrics.rmse >= 0.0);
}

#[test]
fn test_retraining_overwrites_previous_state() {
    let (x, y) = linear_frame(40);
    let mut predictor = Predictor::new(ModelKind::Linear);

    predictor.train(&x, &y, &TrainOptions::default()).unwrap();
    let before = predictor.predict(&[10.0, 5.0]).unwrap();

    // Shifted target: y + 100
    let shifted = Series::new(
        "y",
        (0..40)
            .map(|i| {
                let a = i as f64;
                let b = ((i * 7) % 13) as f64;
                103.0 + 2.0 * a - b
            })
            .collect::<Vec<f64>>(),
    );
    predictor.train(&x, &shifted, &TrainOptions::default()).unwrap();
    let after = predictor.predict(&[10.0, 5.0]).unwrap();

    assert!((after - before - 100.0).abs() < 1e-6);
}

#[test]
fn test_predict_rejects_wrong_feature_count() {
    let (x, y) = linear_frame(40);
    let mut predictor = Predictor::new(ModelKind::Linear);
    predictor.train(&x, &y, &TrainOptions::default()).unwrap();

    let result = predictor.predict(&[1.0]);
    assert!(matches!(result, Err(StockError::InvalidParameter(_))));
}

#[test]
fn test_importance_preserves_feature_order() {
    let (x, y) = linear_frame(60);
    let mut predictor = Predictor::new(ModelKind::Linear);
    predictor.train(&x, &y, &TrainOptions::default()).unwrap();

    let importance = predictor.feature_importance().unwrap();
    let names: Vec<&str> = importance.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);

    // |coef_a| = 2, |coef_b| = 1
    assert!((importance[0].1 - 2.0).abs() < 1e-6);
    assert!((importance[1].1 - 1.0).abs() < 1e-6);
}

#[rstest]
#[case(ModelKind::RandomForest)]
#[case(ModelKind::GradientBoosting)]
fn test_tree_importances_normalized(#[case] kind: ModelKind) {
    let series = DemandSeries::generate(&DemandSeriesConfig::default()).unwrap();
    let mut predictor = Predictor::new(kind);
    predictor
        .train(
            &series.features_frame().unwrap(),
            &series.target(),
            &TrainOptions::default(),
        )
        .unwrap();

    let importance = predictor.feature_importance().unwrap();
    assert_eq!(importance.len(), 3);

    let total: f64 = importance.iter().map(|(_, v)| v).sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert!(importance.iter().all(|(_, v)| *v >= 0.0));
}

#[test]
fn test_bad_test_fraction_rejected() {
    let (x, y) = linear_frame(40);
    let mut predictor = Predictor::new(ModelKind::Linear);

    for fraction in [0.0, 1.0, -0.5, 2.0] {
        let opts = TrainOptions {
            test_fraction: fraction,
            ..Default::default()
        };
        let result = predictor.train(&x, &y, &opts);
        assert!(matches!(result, Err(StockError::InvalidParameter(_))));
    }
}

#[test]
fn test_ridge_shrinks_coefficients_towards_zero() {
    let x: Vec<Vec<f64>> = (0..30).map(|i| vec![i as f64]).collect();
    let y: Vec<f64> = (0..30).map(|i| 5.0 * i as f64).collect();

    let mut ols = LinearRegression::new();
    ols.fit(&x, &y).unwrap();

    let mut ridge = RidgeRegression::new(100.0).unwrap();
    ridge.fit(&x, &y).unwrap();

    assert!((ols.coefficients()[0] - 5.0).abs() < 1e-6);
    assert!(ridge.coefficients()[0].abs() < ols.coefficients()[0].abs());
    assert!(ridge.coefficients()[0] > 0.0);
}

#[test]
fn test_singular_design_reports_math_error() {
    // Two identical constant columns make the normal equations singular.
    let x: Vec<Vec<f64>> = vec![vec![1.0, 1.0]; 20];
    let y: Vec<f64> = (0..20).map(|i| i as f64).collect();

    let mut model = LinearRegression::new();
    let result = model.fit(&x, &y);
    assert!(matches!(result, Err(StockError::MathError(_))));
}
