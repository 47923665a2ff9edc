//! Linear models fitted by ordinary least squares
//!
//! Both models solve the normal equations directly; ridge adds an L2
//! penalty on the slope coefficients (never on the intercept).

use crate::error::{Result, StockError};

/// Multivariate linear regression fitted by ordinary least squares
#[derive(Debug, Clone, Default)]
pub struct LinearRegression {
    /// Per-feature slope coefficients
    coefficients: Vec<f64>,
    /// Intercept term
    intercept: f64,
    fitted: bool,
}

/// Ridge regression: least squares with an L2 penalty on the slopes
#[derive(Debug, Clone)]
pub struct RidgeRegression {
    /// Penalty strength
    alpha: f64,
    coefficients: Vec<f64>,
    intercept: f64,
    fitted: bool,
}

impl LinearRegression {
    /// Create an unfitted model
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit the model on a row-major feature matrix and target vector
    pub fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        let weights = solve_least_squares(x, y, 0.0)?;
        self.intercept = weights[0];
        self.coefficients = weights[1..].to_vec();
        self.fitted = true;
        Ok(())
    }

    /// Predict the target for one observation
    pub fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if !self.fitted {
            return Err(StockError::NotTrained);
        }
        predict_linear(self.intercept, &self.coefficients, row)
    }

    /// Fitted slope coefficients, in feature order
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Fitted intercept
    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

impl RidgeRegression {
    /// Create an unfitted model with the given penalty strength
    pub fn new(alpha: f64) -> Result<Self> {
        if alpha < 0.0 {
            return Err(StockError::InvalidParameter(
                "Ridge penalty must not be negative".to_string(),
            ));
        }
        Ok(Self {
            alpha,
            coefficients: Vec::new(),
            intercept: 0.0,
            fitted: false,
        })
    }

    /// Fit the model on a row-major feature matrix and target vector
    pub fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        let weights = solve_least_squares(x, y, self.alpha)?;
        self.intercept = weights[0];
        self.coefficients = weights[1..].to_vec();
        self.fitted = true;
        Ok(())
    }

    /// Predict the target for one observation
    pub fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if !self.fitted {
            return Err(StockError::NotTrained);
        }
        predict_linear(self.intercept, &self.coefficients, row)
    }

    /// Fitted slope coefficients, in feature order
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Fitted intercept
    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

fn predict_linear(intercept: f64, coefficients: &[f64], row: &[f64]) -> Result<f64> {
    if row.len() != coefficients.len() {
        return Err(StockError::InvalidParameter(format!(
            "Expected {} feature values, got {}",
            coefficients.len(),
            row.len()
        )));
    }

    Ok(intercept
        + coefficients
            .iter()
            .zip(row)
            .map(|(c, v)| c * v)
            .sum::<f64>())
}

/// Solve `(X'X + l2 * I) w = X'y` with an implicit leading intercept column
///
/// Returns `[intercept, w_1, .., w_p]`. The penalty is not applied to the
/// intercept row.
fn solve_least_squares(x: &[Vec<f64>], y: &[f64], l2: f64) -> Result<Vec<f64>> {
    if x.is_empty() || y.is_empty() {
        return Err(StockError::DataError(
            "Training data must not be empty".to_string(),
        ));
    }
    if x.len() != y.len() {
        return Err(StockError::DataError(format!(
            "Feature rows ({}) and target length ({}) differ",
            x.len(),
            y.len()
        )));
    }

    let p = x[0].len();
    let dim = p + 1;

    // Accumulate X'X and X'y with the intercept as column zero.
    let mut xtx = vec![vec![0.0; dim]; dim];
    let mut xty = vec![0.0; dim];
    for (row, &target) in x.iter().zip(y) {
        if row.len() != p {
            return Err(StockError::DataError(
                "Feature rows have inconsistent lengths".to_string(),
            ));
        }

        xtx[0][0] += 1.0;
        xty[0] += target;
        for j in 0..p {
            xtx[0][j + 1] += row[j];
            xtx[j + 1][0] += row[j];
            xty[j + 1] += row[j] * target;
            for k in 0..p {
                xtx[j + 1][k + 1] += row[j] * row[k];
            }
        }
    }

    for j in 1..dim {
        xtx[j][j] += l2;
    }

    solve_system(xtx, xty)
}

/// Gaussian elimination with partial pivoting
fn solve_system(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| {
                a[i][col]
                    .abs()
                    .partial_cmp(&a[j][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);

        if a[pivot][col].abs() < 1e-12 {
            return Err(StockError::MathError(
                "Singular system in least-squares fit".to_string(),
            ));
        }

        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut solution = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| a[row][k] * solution[k]).sum();
        solution[row] = (b[row] - tail) / a[row][row];
    }

    Ok(solution)
}
