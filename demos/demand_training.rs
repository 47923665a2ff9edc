//! Generate a synthetic demand series and compare the four model kinds.

use stock_forecast::models::{ModelKind, Predictor, TrainOptions};
use stock_forecast::series::{DemandSeries, DemandSeriesConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Stock Forecast: Demand Model Comparison");
    println!("=======================================\n");

    let config = DemandSeriesConfig {
        periods: 730,
        noise_std: 4.0,
        ..Default::default()
    };
    let series = DemandSeries::generate(&config)?;
    println!(
        "Generated {} days of demand starting {}\n",
        series.len(),
        series.records()[0].date
    );

    let features = series.features_frame()?;
    let target = series.target();
    let opts = TrainOptions::default();

    for kind in [
        ModelKind::Linear,
        ModelKind::Ridge,
        ModelKind::RandomForest,
        ModelKind::GradientBoosting,
    ] {
        let mut predictor = Predictor::new(kind);
        let metrics = predictor.train(&features, &target, &opts)?;

        println!("Model: {}", kind);
        println!("{}", metrics);

        // Next day after the series: day index 730, January, first quarter
        let next = predictor.predict(&[730.0, 1.0, 1.0])?;
        println!("  next-day demand: {:.2}", next);

        let importance = predictor.feature_importance()?;
        let formatted: Vec<String> = importance
            .iter()
            .map(|(name, score)| format!("{}={:.3}", name, score))
            .collect();
        println!("  importance: {}\n", formatted.join(", "));
    }

    Ok(())
}
