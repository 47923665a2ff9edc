//! Synthetic daily demand series for forecasting experiments
//!
//! Generates trend + seasonality + gaussian noise series and derives the
//! calendar features the demand predictor trains on. Also provides simple
//! smoothing and decomposition helpers for exploratory use.

use crate::error::{Result, StockError};
use chrono::{Datelike, Days, NaiveDate};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Normal;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Parameters of the synthetic demand generator
///
/// The seed is explicit so that repeated generation with the same
/// configuration yields the same series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandSeriesConfig {
    /// Number of daily periods to generate
    pub periods: usize,
    /// Demand level on day zero, before trend and seasonality
    pub baseline: f64,
    /// Linear trend per day
    pub trend: f64,
    /// Amplitude of the yearly seasonal component
    pub seasonal_amplitude: f64,
    /// Standard deviation of the gaussian noise term
    pub noise_std: f64,
    /// Date of the first record
    pub start_date: NaiveDate,
    /// Seed for the noise draws
    pub seed: u64,
}

impl Default for DemandSeriesConfig {
    fn default() -> Self {
        Self {
            periods: 365,
            baseline: 100.0,
            trend: 0.1,
            seasonal_amplitude: 10.0,
            noise_std: 5.0,
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            seed: 42,
        }
    }
}

/// One day of synthetic demand with its derived calendar features
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandRecord {
    /// Calendar date of the observation
    pub date: NaiveDate,
    /// Demand for the day, never negative
    pub demand: f64,
    /// Zero-based day index within the series
    pub day_index: u32,
    /// Calendar month, 1..=12
    pub month: u32,
    /// Calendar quarter, 1..=4
    pub quarter: u32,
}

/// A fully materialized synthetic demand series
#[derive(Debug, Clone)]
pub struct DemandSeries {
    records: Vec<DemandRecord>,
}

impl DemandSeries {
    /// Generate a series from the given configuration
    ///
    /// Demand follows `baseline + trend * t + amplitude * sin(2*pi*t/365)`
    /// plus gaussian noise, floored at zero.
    pub fn generate(config: &DemandSeriesConfig) -> Result<Self> {
        if config.periods == 0 {
            return Err(StockError::InvalidParameter(
                "Number of periods must be positive".to_string(),
            ));
        }
        if config.noise_std < 0.0 {
            return Err(StockError::InvalidParameter(
                "Noise standard deviation must not be negative".to_string(),
            ));
        }

        let noise = Normal::new(0.0, config.noise_std)
            .map_err(|e| StockError::InvalidParameter(format!("Invalid noise term: {}", e)))?;
        let mut rng = StdRng::seed_from_u64(config.seed);

        let mut records = Vec::with_capacity(config.periods);
        for t in 0..config.periods {
            let date = config
                .start_date
                .checked_add_days(Days::new(t as u64))
                .ok_or_else(|| {
                    StockError::InvalidParameter("Series extends beyond calendar range".to_string())
                })?;

            let level = config.baseline
                + config.trend * t as f64
                + config.seasonal_amplitude * (2.0 * PI * t as f64 / 365.0).sin();
            let demand = (level + rng.sample(noise)).max(0.0);

            records.push(DemandRecord {
                date,
                demand,
                day_index: t as u32,
                month: date.month(),
                quarter: (date.month() - 1) / 3 + 1,
            });
        }

        Ok(Self { records })
    }

    /// The generated records in day order
    pub fn records(&self) -> &[DemandRecord] {
        &self.records
    }

    /// The demand values in day order
    pub fn demand_values(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.demand).collect()
    }

    /// Number of days in the series
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the series holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Calendar feature table (`day`, `month`, `quarter`) for model training
    pub fn features_frame(&self) -> Result<DataFrame> {
        let day = Series::new(
            "day",
            self.records
                .iter()
                .map(|r| r.day_index as f64)
                .collect::<Vec<_>>(),
        );
        let month = Series::new(
            "month",
            self.records
                .iter()
                .map(|r| r.month as f64)
                .collect::<Vec<_>>(),
        );
        let quarter = Series::new(
            "quarter",
            self.records
                .iter()
                .map(|r| r.quarter as f64)
                .collect::<Vec<_>>(),
        );

        Ok(DataFrame::new(vec![day, month, quarter])?)
    }

    /// Target series (`demand`) for model training
    pub fn target(&self) -> Series {
        Series::new("demand", self.demand_values())
    }

    /// Materialize the whole series as a table for the presentation layer
    ///
    /// Dates are stored as epoch milliseconds.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let date = Series::new(
            "date",
            self.records
                .iter()
                .map(|r| {
                    r.date
                        .and_time(chrono::NaiveTime::default())
                        .and_utc()
                        .timestamp_millis()
                })
                .collect::<Vec<i64>>(),
        );
        let demand = Series::new("demand", self.demand_values());

        let mut df = DataFrame::new(vec![date, demand])?;
        let features = self.features_frame()?;
        for col in features.get_columns() {
            df.with_column(col.clone())?;
        }

        Ok(df)
    }
}

/// Trailing moving average with a warm-up ramp
///
/// The first `window - 1` points average over the data available so far, so
/// the output has the same length as the input.
pub fn moving_average(values: &[f64], window: usize) -> Result<Vec<f64>> {
    if window == 0 {
        return Err(StockError::InvalidParameter(
            "Window size must be positive".to_string(),
        ));
    }

    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        let start = (i + 1).saturating_sub(window);
        let slice = &values[start..=i];
        out.push(slice.iter().sum::<f64>() / slice.len() as f64);
    }

    Ok(out)
}

/// Additive decomposition of a series into trend, seasonal and residual parts
///
/// The trend is a trailing moving average over a quarter of the period, the
/// seasonal part is the per-phase mean of the detrended series, and the
/// residual is whatever remains.
pub fn decompose(values: &[f64], period: usize) -> Result<(Vec<f64>, Vec<f64>, Vec<f64>)> {
    if period < 2 {
        return Err(StockError::InvalidParameter(
            "Seasonal period must be at least 2".to_string(),
        ));
    }

    let trend = moving_average(values, (period / 4).max(1))?;
    let detrended: Vec<f64> = values.iter().zip(&trend).map(|(v, t)| v - t).collect();

    // Mean of the detrended values at each phase of the cycle.
    let mut phase_sums = vec![0.0; period];
    let mut phase_counts = vec![0usize; period];
    for (i, v) in detrended.iter().enumerate() {
        phase_sums[i % period] += v;
        phase_counts[i % period] += 1;
    }
    let phase_means: Vec<f64> = phase_sums
        .iter()
        .zip(&phase_counts)
        .map(|(s, &c)| if c > 0 { s / c as f64 } else { 0.0 })
        .collect();

    let seasonal: Vec<f64> = (0..values.len()).map(|i| phase_means[i % period]).collect();
    let residual: Vec<f64> = detrended
        .iter()
        .zip(&seasonal)
        .map(|(d, s)| d - s)
        .collect();

    Ok((trend, seasonal, residual))
}
