//! Tabular data helpers for the inventory and forecasting pipelines
//!
//! The ABC classifier and the demand predictor consume already-loaded
//! [`DataFrame`]s with named columns. This module provides the numeric cast
//! helpers they share and a thin CSV convenience loader.

use crate::error::{Result, StockError};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Data loader for tabular datasets
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a tabular dataset from a CSV file with a header row
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Ok(df)
    }
}

/// Extract a series as f64 values, casting integer dtypes as needed
pub fn series_as_f64(series: &Series) -> Result<Vec<f64>> {
    match series.dtype() {
        DataType::Float64 => Ok(series.f64().unwrap().into_iter().flatten().collect()),
        DataType::Float32 => Ok(series
            .f32()
            .unwrap()
            .into_iter()
            .flatten()
            .map(|v| v as f64)
            .collect()),
        DataType::Int64 => Ok(series
            .i64()
            .unwrap()
            .into_iter()
            .flatten()
            .map(|v| v as f64)
            .collect()),
        DataType::Int32 => Ok(series
            .i32()
            .unwrap()
            .into_iter()
            .flatten()
            .map(|v| v as f64)
            .collect()),
        DataType::UInt64 => Ok(series
            .u64()
            .unwrap()
            .into_iter()
            .flatten()
            .map(|v| v as f64)
            .collect()),
        DataType::UInt32 => Ok(series
            .u32()
            .unwrap()
            .into_iter()
            .flatten()
            .map(|v| v as f64)
            .collect()),
        _ => Err(StockError::DataError(format!(
            "Column '{}' cannot be converted to f64",
            series.name()
        ))),
    }
}

/// Extract a named column as f64 values
///
/// A missing column propagates the underlying lookup error.
pub fn column_as_f64(df: &DataFrame, column_name: &str) -> Result<Vec<f64>> {
    let col = df.column(column_name)?;
    series_as_f64(col)
}

/// Build a row-major feature matrix from the named columns
pub fn feature_matrix(df: &DataFrame, columns: &[String]) -> Result<Vec<Vec<f64>>> {
    let mut by_column = Vec::with_capacity(columns.len());
    for name in columns {
        by_column.push(column_as_f64(df, name)?);
    }

    let n_rows = df.height();
    for (name, col) in columns.iter().zip(&by_column) {
        if col.len() != n_rows {
            return Err(StockError::DataError(format!(
                "Column '{}' contains null values",
                name
            )));
        }
    }

    let mut rows = Vec::with_capacity(n_rows);
    for i in 0..n_rows {
        rows.push(by_column.iter().map(|col| col[i]).collect());
    }

    Ok(rows)
}
