//! Demand prediction pipeline
//!
//! A [`Predictor`] wraps one of a fixed set of regression model kinds behind
//! a single train/predict/importance surface. Dispatch is a tagged enum
//! with one variant per kind, so the availability of feature importances is
//! answered by an exhaustive match rather than runtime probing.

use crate::data::{feature_matrix, series_as_f64};
use crate::error::{Result, StockError};
use crate::metrics::{evaluate, Metrics};
use polars::prelude::{DataFrame, Series};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod boosting;
pub mod forest;
pub mod linear;
pub mod tree;

use boosting::{BoostingConfig, GradientBoosting};
use forest::{ForestConfig, RandomForest};
use linear::{LinearRegression, RidgeRegression};

/// Default ridge penalty, matching the common library default
const DEFAULT_RIDGE_ALPHA: f64 = 1.0;

/// The fixed set of supported regression model kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    /// Ordinary least squares
    Linear,
    /// Least squares with an L2 penalty
    Ridge,
    /// Bootstrap ensemble of regression trees
    RandomForest,
    /// Boosted shallow regression trees
    GradientBoosting,
}

impl ModelKind {
    /// Whether the kind exposes per-feature importances
    ///
    /// Linear models report absolute coefficients; the tree ensembles
    /// report native impurity-based importances.
    pub fn supports_importance(&self) -> bool {
        match self {
            ModelKind::Linear
            | ModelKind::Ridge
            | ModelKind::RandomForest
            | ModelKind::GradientBoosting => true,
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelKind::Linear => "linear",
            ModelKind::Ridge => "ridge",
            ModelKind::RandomForest => "random_forest",
            ModelKind::GradientBoosting => "gradient_boosting",
        };
        f.write_str(name)
    }
}

impl FromStr for ModelKind {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "linear" => Ok(ModelKind::Linear),
            "ridge" => Ok(ModelKind::Ridge),
            "rf" | "random_forest" => Ok(ModelKind::RandomForest),
            "gb" | "gradient_boosting" => Ok(ModelKind::GradientBoosting),
            other => Err(StockError::InvalidParameter(format!(
                "Unknown model kind '{}'",
                other
            ))),
        }
    }
}

/// One fitted model, tagged by kind
#[derive(Debug, Clone)]
enum Regressor {
    Linear(LinearRegression),
    Ridge(RidgeRegression),
    RandomForest(RandomForest),
    GradientBoosting(GradientBoosting),
}

impl Regressor {
    fn fit(kind: ModelKind, x: &[Vec<f64>], y: &[f64], seed: u64) -> Result<Self> {
        match kind {
            ModelKind::Linear => {
                let mut model = LinearRegression::new();
                model.fit(x, y)?;
                Ok(Regressor::Linear(model))
            }
            ModelKind::Ridge => {
                let mut model = RidgeRegression::new(DEFAULT_RIDGE_ALPHA)?;
                model.fit(x, y)?;
                Ok(Regressor::Ridge(model))
            }
            ModelKind::RandomForest => {
                let mut model = RandomForest::new(ForestConfig::default())?;
                model.fit(x, y, seed)?;
                Ok(Regressor::RandomForest(model))
            }
            ModelKind::GradientBoosting => {
                let mut model = GradientBoosting::new(BoostingConfig::default())?;
                model.fit(x, y)?;
                Ok(Regressor::GradientBoosting(model))
            }
        }
    }

    fn predict_row(&self, row: &[f64]) -> Result<f64> {
        match self {
            Regressor::Linear(m) => m.predict_row(row),
            Regressor::Ridge(m) => m.predict_row(row),
            Regressor::RandomForest(m) => m.predict_row(row),
            Regressor::GradientBoosting(m) => m.predict_row(row),
        }
    }

    fn importances(&self, kind: ModelKind) -> Result<Vec<f64>> {
        if !kind.supports_importance() {
            return Err(StockError::Unsupported(format!(
                "Model kind '{}' exposes neither coefficients nor importances",
                kind
            )));
        }

        match self {
            Regressor::Linear(m) => Ok(m.coefficients().iter().map(|c| c.abs()).collect()),
            Regressor::Ridge(m) => Ok(m.coefficients().iter().map(|c| c.abs()).collect()),
            Regressor::RandomForest(m) => Ok(m.feature_importances()?.to_vec()),
            Regressor::GradientBoosting(m) => Ok(m.feature_importances()?.to_vec()),
        }
    }
}

/// Options for one training pass
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrainOptions {
    /// Fraction of rows held out for evaluation
    pub test_fraction: f64,
    /// Seed for the train/test shuffle and any model-internal sampling
    pub seed: u64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
        }
    }
}

/// A trainable demand predictor
///
/// Holds the fitted model state and the ordered feature list from training;
/// re-training overwrites both. One instance per caller; training is not
/// interruptible and concurrent use must be serialized by the caller.
#[derive(Debug, Clone)]
pub struct Predictor {
    kind: ModelKind,
    model: Option<Regressor>,
    features: Vec<String>,
}

impl Predictor {
    /// Create an untrained predictor of the given kind
    pub fn new(kind: ModelKind) -> Self {
        Self {
            kind,
            model: None,
            features: Vec::new(),
        }
    }

    /// The model kind this predictor wraps
    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    /// Whether a training pass has completed
    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    /// Feature names recorded at training time, in order
    pub fn feature_names(&self) -> &[String] {
        &self.features
    }

    /// Train on a feature table and target series, returning held-out metrics
    ///
    /// Rows are shuffled with the seeded RNG and split by `test_fraction`;
    /// the model is fitted on the training partition and evaluated on the
    /// rest. The same data and seed always produce the same metrics.
    pub fn train(&mut self, x: &DataFrame, y: &Series, opts: &TrainOptions) -> Result<Metrics> {
        if opts.test_fraction <= 0.0 || opts.test_fraction >= 1.0 {
            return Err(StockError::InvalidParameter(
                "Test fraction must be in (0, 1)".to_string(),
            ));
        }

        let feature_names: Vec<String> = x
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = feature_matrix(x, &feature_names)?;
        let targets = series_as_f64(y)?;

        if rows.len() != targets.len() {
            return Err(StockError::DataError(format!(
                "Feature rows ({}) and target length ({}) differ",
                rows.len(),
                targets.len()
            )));
        }
        if rows.len() < 2 {
            return Err(StockError::DataError(
                "At least two rows are required to split and train".to_string(),
            ));
        }

        let (train_idx, test_idx) = split_indices(rows.len(), opts.test_fraction, opts.seed);

        let train_x: Vec<Vec<f64>> = train_idx.iter().map(|&i| rows[i].clone()).collect();
        let train_y: Vec<f64> = train_idx.iter().map(|&i| targets[i]).collect();

        let model = Regressor::fit(self.kind, &train_x, &train_y, opts.seed)?;

        let mut predicted = Vec::with_capacity(test_idx.len());
        for &i in &test_idx {
            predicted.push(model.predict_row(&rows[i])?);
        }
        let actual: Vec<f64> = test_idx.iter().map(|&i| targets[i]).collect();
        let metrics = evaluate(&predicted, &actual)?;

        self.features = feature_names;
        self.model = Some(model);

        Ok(metrics)
    }

    /// Predict one observation, given as a value per training feature
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        let model = self.model.as_ref().ok_or(StockError::NotTrained)?;

        if features.len() != self.features.len() {
            return Err(StockError::InvalidParameter(format!(
                "Expected {} feature values, got {}",
                self.features.len(),
                features.len()
            )));
        }

        model.predict_row(features)
    }

    /// Per-feature importance scores in training feature order
    pub fn feature_importance(&self) -> Result<Vec<(String, f64)>> {
        let model = self.model.as_ref().ok_or(StockError::NotTrained)?;
        let scores = model.importances(self.kind)?;

        Ok(self.features.iter().cloned().zip(scores).collect())
    }
}

/// Seeded shuffle split; the test partition holds at least one row and at
/// most all but one
fn split_indices(n: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_size = ((n as f64 * test_fraction).ceil() as usize).clamp(1, n - 1);
    let test = indices[..test_size].to_vec();
    let train = indices[test_size..].to_vec();
    (train, test)
}
