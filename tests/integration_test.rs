use polars::prelude::TakeRandomUtf8;
use std::io::Write;
use stock_forecast::abc::{self, AbcThresholds};
use stock_forecast::eoq::{self, EoqOptions};
use stock_forecast::models::{ModelKind, Predictor, TrainOptions};
use stock_forecast::series::{DemandSeries, DemandSeriesConfig};
use stock_forecast::{DataLoader, StockError};
use tempfile::NamedTempFile;

fn write_assortment_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();

    writeln!(file, "sku,annual_value").unwrap();
    writeln!(file, "SKU-001,12000").unwrap();
    writeln!(file, "SKU-002,6500").unwrap();
    writeln!(file, "SKU-003,2400").unwrap();
    writeln!(file, "SKU-004,900").unwrap();
    writeln!(file, "SKU-005,400").unwrap();
    writeln!(file, "SKU-006,150").unwrap();

    file
}

#[test]
fn test_full_planning_workflow() {
    // 1. Generate a year of synthetic demand
    let series = DemandSeries::generate(&DemandSeriesConfig {
        noise_std: 3.0,
        ..Default::default()
    })
    .unwrap();
    assert_eq!(series.len(), 365);

    // 2. Train a demand model and check it learned something
    let mut predictor = Predictor::new(ModelKind::GradientBoosting);
    let metrics = predictor
        .train(
            &series.features_frame().unwrap(),
            &series.target(),
            &TrainOptions::default(),
        )
        .unwrap();
    assert!(metrics.r2 > 0.5);

    // 3. Predict tomorrow's demand and scale to an annual figure
    let tomorrow = predictor.predict(&[365.0, 1.0, 1.0]).unwrap();
    assert!(tomorrow > 0.0);
    let annual_demand = tomorrow * 365.0;

    // 4. Size the order with the classic EOQ model
    let lot = eoq::classic(
        annual_demand,
        2.5,
        50.0,
        &EoqOptions {
            lead_time_days: 7.0,
            ..Default::default()
        },
    )
    .unwrap();
    assert!(lot.order_quantity > 0.0);
    assert!(lot.reorder_point > 0.0);

    // 5. Classify the assortment loaded from CSV
    let csv = write_assortment_csv();
    let assortment = DataLoader::from_csv(csv.path()).unwrap();
    let classified = abc::classify(&assortment, "annual_value", &AbcThresholds::default()).unwrap();

    assert_eq!(classified.table.height(), 6);
    assert!(!classified.summary.is_empty());

    // The largest item carries more than half the value, so it must be class A.
    let first_class = classified
        .table
        .column("abc_class")
        .unwrap()
        .utf8()
        .unwrap()
        .get(0)
        .unwrap();
    assert_eq!(first_class, "A");
}

#[test]
fn test_missing_csv_reports_io_error() {
    let result = DataLoader::from_csv("/nonexistent/assortment.csv");
    assert!(matches!(result, Err(StockError::IoError(_))));
}

#[test]
fn test_error_messages_render() {
    let err = eoq::classic(0.0, 2.5, 10.0, &EoqOptions::default()).unwrap_err();
    assert!(err.to_string().contains("Invalid parameter"));

    let err = Predictor::new(ModelKind::Ridge).predict(&[1.0]).unwrap_err();
    assert!(err.to_string().contains("not been trained"));
}
