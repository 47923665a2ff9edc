//! Gradient boosting regression
//!
//! A mean baseline refined by shallow CART trees, each fitted to the
//! residuals of the ensemble so far and blended in at a fixed learning rate.

use crate::error::{Result, StockError};
use crate::models::forest::normalize;
use crate::models::tree::{RegressionTree, TreeConfig};

/// Tuning parameters for gradient boosting
#[derive(Debug, Clone, Copy)]
pub struct BoostingConfig {
    /// Number of boosting stages
    pub n_stages: usize,
    /// Contribution of each stage
    pub learning_rate: f64,
    /// Parameters of each stage's tree
    pub tree: TreeConfig,
}

impl Default for BoostingConfig {
    fn default() -> Self {
        Self {
            n_stages: 100,
            learning_rate: 0.1,
            tree: TreeConfig {
                max_depth: 3,
                min_samples_split: 4,
            },
        }
    }
}

/// A fitted gradient boosting regressor
#[derive(Debug, Clone)]
pub struct GradientBoosting {
    config: BoostingConfig,
    baseline: f64,
    trees: Vec<RegressionTree>,
    importances: Vec<f64>,
    fitted: bool,
}

impl GradientBoosting {
    /// Create an unfitted model
    pub fn new(config: BoostingConfig) -> Result<Self> {
        if config.n_stages == 0 {
            return Err(StockError::InvalidParameter(
                "Boosting needs at least one stage".to_string(),
            ));
        }
        if config.learning_rate <= 0.0 || config.learning_rate > 1.0 {
            return Err(StockError::InvalidParameter(
                "Learning rate must be in (0, 1]".to_string(),
            ));
        }
        Ok(Self {
            config,
            baseline: 0.0,
            trees: Vec::new(),
            importances: Vec::new(),
            fitted: false,
        })
    }

    /// Fit the boosting stages on the full training sample
    pub fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        if x.is_empty() {
            return Err(StockError::DataError(
                "Training data must not be empty".to_string(),
            ));
        }

        let n_rows = x.len();
        let n_features = x[0].len();
        let rows: Vec<usize> = (0..n_rows).collect();
        let features: Vec<usize> = (0..n_features).collect();

        self.baseline = y.iter().sum::<f64>() / n_rows as f64;
        self.trees.clear();
        self.importances = vec![0.0; n_features];

        let mut residuals: Vec<f64> = y.iter().map(|v| v - self.baseline).collect();

        for _ in 0..self.config.n_stages {
            let mut tree = RegressionTree::new(self.config.tree);
            tree.fit(x, &residuals, &rows, &features)?;

            for (i, residual) in residuals.iter_mut().enumerate() {
                *residual -= self.config.learning_rate * tree.predict_row(&x[i])?;
            }
            for (total, part) in self.importances.iter_mut().zip(tree.importances()) {
                *total += part;
            }
            self.trees.push(tree);
        }

        normalize(&mut self.importances);
        self.fitted = true;
        Ok(())
    }

    /// Predict the target for one observation
    pub fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if !self.fitted {
            return Err(StockError::NotTrained);
        }

        let mut prediction = self.baseline;
        for tree in &self.trees {
            prediction += self.config.learning_rate * tree.predict_row(row)?;
        }
        Ok(prediction)
    }

    /// Per-feature importances, normalized to sum to one
    pub fn feature_importances(&self) -> Result<&[f64]> {
        if !self.fitted {
            return Err(StockError::NotTrained);
        }
        Ok(&self.importances)
    }
}
