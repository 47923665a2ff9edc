use polars::prelude::*;
use pretty_assertions::assert_eq;
use stock_forecast::abc::{self, AbcClass, AbcThresholds};
use stock_forecast::data::column_as_f64;
use stock_forecast::StockError;

fn assortment() -> DataFrame {
    let product = Series::new("product", vec!["P1", "P2", "P3", "P4", "P5"]);
    let value = Series::new("value", vec![1000.0, 500.0, 200.0, 100.0, 50.0]);
    DataFrame::new(vec![product, value]).unwrap()
}

#[test]
fn test_all_three_classes_assigned() {
    let result = abc::classify(&assortment(), "value", &AbcThresholds::default()).unwrap();

    let classes = result
        .table
        .column("abc_class")
        .unwrap()
        .utf8()
        .unwrap()
        .into_iter()
        .flatten()
        .map(|s| s.to_string())
        .collect::<Vec<_>>();

    assert!(classes.contains(&"A".to_string()));
    assert!(classes.contains(&"B".to_string()));
    assert!(classes.contains(&"C".to_string()));
}

#[test]
fn test_output_sorted_descending_by_value() {
    let product = Series::new("product", vec!["X", "Y", "Z"]);
    let value = Series::new("value", vec![50.0, 100.0, 10.0]);
    let df = DataFrame::new(vec![product, value]).unwrap();

    let result = abc::classify(&df, "value", &AbcThresholds::default()).unwrap();
    let sorted = column_as_f64(&result.table, "value").unwrap();

    assert_eq!(sorted, vec![100.0, 50.0, 10.0]);
}

#[test]
fn test_cumulative_percentages_at_boundaries() {
    let product = Series::new("product", vec!["A", "B", "C"]);
    let value = Series::new("value", vec![80.0, 15.0, 5.0]);
    let df = DataFrame::new(vec![product, value]).unwrap();

    let result = abc::classify(&df, "value", &AbcThresholds::default()).unwrap();
    let cumulative = column_as_f64(&result.table, "cumulative_pct").unwrap();

    assert!(cumulative[0] <= 80.0 + 1e-9);
    assert!(cumulative[1] <= 95.0 + 1e-9);
    assert!((cumulative[2] - 100.0).abs() < 1e-9);
}

#[test]
fn test_cumulative_percentage_monotonic_with_ties() {
    let value = Series::new("value", vec![30.0, 30.0, 30.0, 10.0]);
    let df = DataFrame::new(vec![value]).unwrap();

    let result = abc::classify(&df, "value", &AbcThresholds::default()).unwrap();
    let cumulative = column_as_f64(&result.table, "cumulative_pct").unwrap();

    for pair in cumulative.windows(2) {
        assert!(pair[1] >= pair[0]);
    }
}

#[test]
fn test_summary_aggregates_per_class() {
    let result = abc::classify(&assortment(), "value", &AbcThresholds::default()).unwrap();

    let total_value: f64 = result.summary.iter().map(|s| s.total_value).sum();
    let total_count: usize = result.summary.iter().map(|s| s.item_count).sum();
    let total_pct: f64 = result.summary.iter().map(|s| s.pct_of_total).sum();

    assert_eq!(total_count, 5);
    assert!((total_value - 1850.0).abs() < 1e-9);
    assert!((total_pct - 100.0).abs() < 1e-9);

    // Classes come out in A, B, C order.
    let order: Vec<AbcClass> = result.summary.iter().map(|s| s.class).collect();
    let mut sorted = order.clone();
    sorted.sort_by_key(|c| match c {
        AbcClass::A => 0,
        AbcClass::B => 1,
        AbcClass::C => 2,
    });
    assert_eq!(order, sorted);
}

#[test]
fn test_empty_frame_classifies_to_empty_result() {
    let value = Series::new("value", Vec::<f64>::new());
    let df = DataFrame::new(vec![value]).unwrap();

    let result = abc::classify(&df, "value", &AbcThresholds::default()).unwrap();

    assert_eq!(result.table.height(), 0);
    assert!(result.summary.is_empty());
}

#[test]
fn test_missing_column_propagates_lookup_error() {
    let result = abc::classify(&assortment(), "no_such_column", &AbcThresholds::default());
    assert!(matches!(result, Err(StockError::PolarsError(_))));
}

#[test]
fn test_invalid_thresholds_rejected() {
    assert!(AbcThresholds::new(0.0, 0.95).is_err());
    assert!(AbcThresholds::new(0.95, 0.80).is_err());
    assert!(AbcThresholds::new(0.80, 1.5).is_err());
    assert!(AbcThresholds::new(0.80, 0.95).is_ok());

    let bad = AbcThresholds { a: 0.9, b: 0.5 };
    let result = abc::classify(&assortment(), "value", &bad);
    assert!(matches!(result, Err(StockError::InvalidParameter(_))));
}
