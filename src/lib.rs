//! # Stock Forecast
//!
//! A Rust library for inventory optimization and demand forecasting.
//!
//! ## Features
//!
//! - EOQ lot-sizing models (classic, backorders, quantity discounts,
//!   finite production rate)
//! - ABC / Pareto classification of inventory items
//! - Synthetic daily demand series with calendar features
//! - Demand predictors (linear, ridge, random forest, gradient boosting)
//!   with held-out evaluation metrics and feature importances
//!
//! The crate is a pure computational core: it never reads a terminal,
//! renders output or logs. Presentation layers (a CLI agent, a dashboard)
//! collect parameters, call in and format the returned records.
//!
//! ## Quick Start
//!
//! ```rust
//! use stock_forecast::eoq::{self, EoqOptions};
//! use stock_forecast::models::{ModelKind, Predictor, TrainOptions};
//! use stock_forecast::series::{DemandSeries, DemandSeriesConfig};
//!
//! # fn run() -> stock_forecast::Result<()> {
//! // Optimal order size for an item
//! let lot = eoq::classic(1000.0, 2.5, 10.0, &EoqOptions::default())?;
//! assert!(lot.order_quantity > 0.0);
//!
//! // Train a demand model on a synthetic series
//! let series = DemandSeries::generate(&DemandSeriesConfig::default())?;
//! let mut predictor = Predictor::new(ModelKind::Linear);
//! let metrics = predictor.train(
//!     &series.features_frame()?,
//!     &series.target(),
//!     &TrainOptions::default(),
//! )?;
//! assert!(metrics.rmse >= 0.0);
//!
//! // Predict demand one day past the series (day index, month, quarter)
//! let demand = predictor.predict(&[365.0, 1.0, 1.0])?;
//! # let _ = demand;
//! # Ok(())
//! # }
//! # run().unwrap();
//! ```

pub mod abc;
pub mod data;
pub mod eoq;
pub mod error;
pub mod metrics;
pub mod models;
pub mod series;

// Re-export commonly used types
pub use crate::abc::{AbcClass, AbcClassification, AbcThresholds};
pub use crate::data::DataLoader;
pub use crate::eoq::{EoqOptions, EoqResult, PriceBreak};
pub use crate::error::{Result, StockError};
pub use crate::metrics::Metrics;
pub use crate::models::{ModelKind, Predictor, TrainOptions};
pub use crate::series::{DemandSeries, DemandSeriesConfig};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
