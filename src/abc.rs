//! ABC (Pareto) classification of inventory items
//!
//! Items are ranked by their share of the total value of a chosen column;
//! class A covers the head of the cumulative distribution, class C the tail.

use crate::data::column_as_f64;
use crate::error::{Result, StockError};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cumulative-share thresholds separating the classes, as fractions of 1
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AbcThresholds {
    /// Upper cumulative share of class A
    pub a: f64,
    /// Upper cumulative share of class B
    pub b: f64,
}

impl Default for AbcThresholds {
    fn default() -> Self {
        Self { a: 0.80, b: 0.95 }
    }
}

impl AbcThresholds {
    /// Create validated thresholds; requires `0 < a < b <= 1`
    pub fn new(a: f64, b: f64) -> Result<Self> {
        if !(a > 0.0 && a < b && b <= 1.0) {
            return Err(StockError::InvalidParameter(format!(
                "Thresholds must satisfy 0 < a < b <= 1 (got a={}, b={})",
                a, b
            )));
        }
        Ok(Self { a, b })
    }
}

/// Inventory class assigned by cumulative value contribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbcClass {
    A,
    B,
    C,
}

impl AbcClass {
    /// Class label as used in the output table
    pub fn as_str(&self) -> &'static str {
        match self {
            AbcClass::A => "A",
            AbcClass::B => "B",
            AbcClass::C => "C",
        }
    }
}

impl fmt::Display for AbcClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate statistics for one class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbcClassSummary {
    /// The class these figures describe
    pub class: AbcClass,
    /// Sum of the value column over the class
    pub total_value: f64,
    /// Number of rows in the class
    pub item_count: usize,
    /// Share of the overall value held by the class, in percent
    pub pct_of_total: f64,
}

/// Classified table plus per-class aggregates
#[derive(Debug, Clone)]
pub struct AbcClassification {
    /// Input rows sorted descending by value, with `pct_of_total`,
    /// `cumulative_pct` and `abc_class` columns appended
    pub table: DataFrame,
    /// Per-class aggregates in A, B, C order; absent classes are omitted
    pub summary: Vec<AbcClassSummary>,
}

/// Classify the rows of `df` by their cumulative share of `value_column`
///
/// Rows are sorted descending by the value column (stable for ties), each
/// row's percentage of the column total and the running cumulative
/// percentage are computed, and a class is assigned by comparing the
/// cumulative percentage against the thresholds.
///
/// An empty frame produces an empty classification; a missing column
/// propagates the lookup error.
pub fn classify(
    df: &DataFrame,
    value_column: &str,
    thresholds: &AbcThresholds,
) -> Result<AbcClassification> {
    AbcThresholds::new(thresholds.a, thresholds.b)?;

    let values = column_as_f64(df, value_column)?;
    if values.len() != df.height() {
        return Err(StockError::DataError(format!(
            "Column '{}' contains null values",
            value_column
        )));
    }

    // Stable argsort, descending by value.
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[b]
            .partial_cmp(&values[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let total: f64 = values.iter().sum();

    let mut pct_of_total = Vec::with_capacity(order.len());
    let mut cumulative_pct = Vec::with_capacity(order.len());
    let mut classes = Vec::with_capacity(order.len());

    let mut running = 0.0;
    for &idx in &order {
        let pct = if total != 0.0 {
            values[idx] / total * 100.0
        } else {
            0.0
        };
        running += pct;

        let class = if running <= thresholds.a * 100.0 {
            AbcClass::A
        } else if running <= thresholds.b * 100.0 {
            AbcClass::B
        } else {
            AbcClass::C
        };

        pct_of_total.push(pct);
        cumulative_pct.push(running);
        classes.push(class);
    }

    let indices = IdxCa::from_vec(
        "idx",
        order.iter().map(|&i| i as IdxSize).collect::<Vec<_>>(),
    );
    let mut table = df.take(&indices)?;
    table.with_column(Series::new("pct_of_total", pct_of_total.clone()))?;
    table.with_column(Series::new("cumulative_pct", cumulative_pct))?;
    table.with_column(Series::new(
        "abc_class",
        classes.iter().map(|c| c.as_str()).collect::<Vec<_>>(),
    ))?;

    let mut summary = Vec::new();
    for class in [AbcClass::A, AbcClass::B, AbcClass::C] {
        let members: Vec<usize> = classes
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == class)
            .map(|(i, _)| i)
            .collect();
        if members.is_empty() {
            continue;
        }

        summary.push(AbcClassSummary {
            class,
            total_value: members.iter().map(|&i| values[order[i]]).sum(),
            item_count: members.len(),
            pct_of_total: members.iter().map(|&i| pct_of_total[i]).sum(),
        });
    }

    Ok(AbcClassification { table, summary })
}
