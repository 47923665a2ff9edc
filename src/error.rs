//! Error types for the stock_forecast crate

use thiserror::Error;

/// Custom error types for the stock_forecast crate
#[derive(Debug, Error)]
pub enum StockError {
    /// A numeric input violates its domain constraint
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Predict or feature importance requested before training
    #[error("Model has not been trained yet")]
    NotTrained,

    /// The requested operation is not available for this model kind
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Error related to data validation or shape
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from mathematical operations
    #[error("Math error: {0}")]
    MathError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations (includes missing-column lookups)
    #[error("Polars error: {0}")]
    PolarsError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, StockError>;

impl From<polars::prelude::PolarsError> for StockError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        StockError::PolarsError(err.to_string())
    }
}
