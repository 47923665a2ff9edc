//! Random forest regression
//!
//! An ensemble of CART trees, each fitted on a bootstrap sample of the rows
//! and a random subset of the features. Predictions average over the trees.

use crate::error::{Result, StockError};
use crate::models::tree::{RegressionTree, TreeConfig};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Tuning parameters for the random forest
#[derive(Debug, Clone, Copy)]
pub struct ForestConfig {
    /// Number of trees in the ensemble
    pub n_trees: usize,
    /// Parameters of each tree
    pub tree: TreeConfig,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 50,
            tree: TreeConfig::default(),
        }
    }
}

/// A fitted random forest regressor
#[derive(Debug, Clone)]
pub struct RandomForest {
    config: ForestConfig,
    trees: Vec<RegressionTree>,
    importances: Vec<f64>,
    fitted: bool,
}

impl RandomForest {
    /// Create an unfitted forest
    pub fn new(config: ForestConfig) -> Result<Self> {
        if config.n_trees == 0 {
            return Err(StockError::InvalidParameter(
                "A forest needs at least one tree".to_string(),
            ));
        }
        Ok(Self {
            config,
            trees: Vec::new(),
            importances: Vec::new(),
            fitted: false,
        })
    }

    /// Fit the ensemble; the seed makes bootstrap draws reproducible
    pub fn fit(&mut self, x: &[Vec<f64>], y: &[f64], seed: u64) -> Result<()> {
        if x.is_empty() {
            return Err(StockError::DataError(
                "Training data must not be empty".to_string(),
            ));
        }

        let n_rows = x.len();
        let n_features = x[0].len();
        // Regression default: a third of the features per tree.
        let features_per_tree = (n_features / 3).max(1);

        let mut rng = StdRng::seed_from_u64(seed);
        let mut all_features: Vec<usize> = (0..n_features).collect();

        self.trees.clear();
        self.importances = vec![0.0; n_features];

        for _ in 0..self.config.n_trees {
            let rows: Vec<usize> = (0..n_rows).map(|_| rng.gen_range(0..n_rows)).collect();

            all_features.shuffle(&mut rng);
            let features = &all_features[..features_per_tree];

            let mut tree = RegressionTree::new(self.config.tree);
            tree.fit(x, y, &rows, features)?;

            for (total, part) in self.importances.iter_mut().zip(tree.importances()) {
                *total += part;
            }
            self.trees.push(tree);
        }

        normalize(&mut self.importances);
        self.fitted = true;
        Ok(())
    }

    /// Predict the target for one observation as the mean over all trees
    pub fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if !self.fitted {
            return Err(StockError::NotTrained);
        }

        let sum: f64 = self
            .trees
            .iter()
            .map(|tree| tree.predict_row(row))
            .sum::<Result<f64>>()?;
        Ok(sum / self.trees.len() as f64)
    }

    /// Per-feature importances, normalized to sum to one
    pub fn feature_importances(&self) -> Result<&[f64]> {
        if !self.fitted {
            return Err(StockError::NotTrained);
        }
        Ok(&self.importances)
    }
}

/// Scale the values so they sum to one, if any are non-zero
pub(crate) fn normalize(values: &mut [f64]) {
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        for v in values.iter_mut() {
            *v /= total;
        }
    }
}
