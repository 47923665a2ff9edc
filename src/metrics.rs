//! Metrics for evaluating demand predictions

use crate::error::{Result, StockError};
use serde::{Deserialize, Serialize};

/// Regression evaluation metrics computed on a held-out split
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metrics {
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Error
    pub mae: f64,
    /// Coefficient of determination
    pub r2: f64,
}

impl std::fmt::Display for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Evaluation Metrics:")?;
        writeln!(f, "  MSE:  {:.4}", self.mse)?;
        writeln!(f, "  RMSE: {:.4}", self.rmse)?;
        writeln!(f, "  MAE:  {:.4}", self.mae)?;
        writeln!(f, "  R2:   {:.4}", self.r2)?;
        Ok(())
    }
}

/// Evaluate predictions against actual values
pub fn evaluate(predicted: &[f64], actual: &[f64]) -> Result<Metrics> {
    if predicted.len() != actual.len() || predicted.is_empty() {
        return Err(StockError::DataError(
            "Predicted and actual values must have the same non-zero length".to_string(),
        ));
    }

    let n = predicted.len() as f64;

    let errors: Vec<f64> = predicted.iter().zip(actual).map(|(p, a)| a - p).collect();

    let mse = errors.iter().map(|e| e.powi(2)).sum::<f64>() / n;
    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;

    let mean_actual = actual.iter().sum::<f64>() / n;
    let ss_tot: f64 = actual.iter().map(|a| (a - mean_actual).powi(2)).sum();
    let ss_res: f64 = errors.iter().map(|e| e.powi(2)).sum();

    // A constant target carries no variance to explain.
    let r2 = if ss_tot > 1e-10 {
        1.0 - ss_res / ss_tot
    } else {
        1.0
    };

    Ok(Metrics {
        mse,
        rmse: mse.sqrt(),
        mae,
        r2,
    })
}
