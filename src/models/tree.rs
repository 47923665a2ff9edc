//! CART regression trees
//!
//! Shared building block for the random forest and gradient boosting
//! models. Splits greedily minimize the summed squared error of the two
//! children, searched with a sorted sweep per feature.

use crate::error::{Result, StockError};

/// Tuning parameters for a regression tree
#[derive(Debug, Clone, Copy)]
pub struct TreeConfig {
    /// Maximum depth of the tree; depth zero is a single leaf
    pub max_depth: usize,
    /// Smallest node size that may still be split
    pub min_samples_split: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 8,
            min_samples_split: 4,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted regression tree
#[derive(Debug, Clone)]
pub struct RegressionTree {
    config: TreeConfig,
    nodes: Vec<Node>,
    /// Accumulated squared-error reduction per feature
    importances: Vec<f64>,
    fitted: bool,
}

impl RegressionTree {
    /// Create an unfitted tree
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            importances: Vec::new(),
            fitted: false,
        }
    }

    /// Fit on the given sample rows, considering only the given features
    ///
    /// `rows` may contain repeated indices (bootstrap samples); `features`
    /// are global column indices into the rows of `x`.
    pub fn fit(
        &mut self,
        x: &[Vec<f64>],
        y: &[f64],
        rows: &[usize],
        features: &[usize],
    ) -> Result<()> {
        if rows.is_empty() {
            return Err(StockError::DataError(
                "Cannot fit a tree on an empty sample".to_string(),
            ));
        }
        if x.len() != y.len() {
            return Err(StockError::DataError(format!(
                "Feature rows ({}) and target length ({}) differ",
                x.len(),
                y.len()
            )));
        }

        let n_features = x.first().map(|r| r.len()).unwrap_or(0);
        self.nodes.clear();
        self.importances = vec![0.0; n_features];

        let mut rows = rows.to_vec();
        self.build(x, y, &mut rows, features, 0);
        self.fitted = true;
        Ok(())
    }

    /// Predict the target for one observation
    pub fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if !self.fitted {
            return Err(StockError::NotTrained);
        }

        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return Ok(*value),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Raw squared-error reduction accumulated per feature during fitting
    pub fn importances(&self) -> &[f64] {
        &self.importances
    }

    /// Build a subtree over `rows` and return its node index
    fn build(
        &mut self,
        x: &[Vec<f64>],
        y: &[f64],
        rows: &mut [usize],
        features: &[usize],
        depth: usize,
    ) -> usize {
        let (mean, sse) = mean_and_sse(y, rows);

        let can_split = depth < self.config.max_depth
            && rows.len() >= self.config.min_samples_split
            && sse > 1e-12;

        let split = if can_split {
            best_split(x, y, rows, features, sse)
        } else {
            None
        };

        match split {
            Some(found) => {
                self.importances[found.feature] += found.reduction;

                // Partition rows in place around the threshold.
                let mid = partition(x, rows, found.feature, found.threshold);
                let (left_rows, right_rows) = rows.split_at_mut(mid);

                let node_idx = self.nodes.len();
                self.nodes.push(Node::Leaf { value: mean });

                let left = self.build(x, y, left_rows, features, depth + 1);
                let right = self.build(x, y, right_rows, features, depth + 1);
                self.nodes[node_idx] = Node::Split {
                    feature: found.feature,
                    threshold: found.threshold,
                    left,
                    right,
                };
                node_idx
            }
            None => {
                self.nodes.push(Node::Leaf { value: mean });
                self.nodes.len() - 1
            }
        }
    }
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    reduction: f64,
}

fn mean_and_sse(y: &[f64], rows: &[usize]) -> (f64, f64) {
    let n = rows.len() as f64;
    let sum: f64 = rows.iter().map(|&i| y[i]).sum();
    let mean = sum / n;
    let sse: f64 = rows.iter().map(|&i| (y[i] - mean).powi(2)).sum();
    (mean, sse)
}

/// Find the split minimizing the children's summed squared error
fn best_split(
    x: &[Vec<f64>],
    y: &[f64],
    rows: &[usize],
    features: &[usize],
    parent_sse: f64,
) -> Option<SplitCandidate> {
    let mut best: Option<SplitCandidate> = None;

    for &feature in features {
        let mut pairs: Vec<(f64, f64)> = rows.iter().map(|&i| (x[i][feature], y[i])).collect();
        pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let n = pairs.len();
        let total_sum: f64 = pairs.iter().map(|(_, t)| t).sum();
        let total_sq: f64 = pairs.iter().map(|(_, t)| t * t).sum();

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        for k in 1..n {
            left_sum += pairs[k - 1].1;
            left_sq += pairs[k - 1].1 * pairs[k - 1].1;

            // Cannot split between identical feature values.
            if pairs[k].0 <= pairs[k - 1].0 {
                continue;
            }

            let left_n = k as f64;
            let right_n = (n - k) as f64;
            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;

            let left_sse = left_sq - left_sum * left_sum / left_n;
            let right_sse = right_sq - right_sum * right_sum / right_n;
            let reduction = parent_sse - (left_sse + right_sse);

            if reduction > best.as_ref().map_or(1e-12, |b| b.reduction) {
                best = Some(SplitCandidate {
                    feature,
                    threshold: (pairs[k - 1].0 + pairs[k].0) / 2.0,
                    reduction,
                });
            }
        }
    }

    best
}

/// Move rows with `x[row][feature] <= threshold` to the front, returning the
/// boundary index
fn partition(x: &[Vec<f64>], rows: &mut [usize], feature: usize, threshold: f64) -> usize {
    let mut mid = 0;
    for i in 0..rows.len() {
        if x[rows[i]][feature] <= threshold {
            rows.swap(i, mid);
            mid += 1;
        }
    }
    mid
}
