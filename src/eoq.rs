//! Economic Order Quantity models for inventory optimization
//!
//! Four closed-form lot-sizing models sharing the same cost conventions:
//!
//! - [`classic`] - the textbook EOQ with instantaneous replenishment
//! - [`with_backorders`] - planned shortages at a per-unit-year penalty
//! - [`with_discounts`] - quantity discounts over price-break ranges
//! - [`finite_production`] - replenishment at a finite production rate
//!
//! All demand and cost figures are annual: `demand` in units/year,
//! `holding_cost` and `shortage_cost` in currency per unit-year,
//! `ordering_cost` in currency per order.

use crate::error::{Result, StockError};
use serde::{Deserialize, Serialize};

/// Optional inputs shared by the EOQ models
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EoqOptions {
    /// Purchase cost per unit, added to the total as `demand * unit_cost`
    pub unit_cost: f64,
    /// Replenishment lead time in days; only affects the classic model's
    /// reorder point
    pub lead_time_days: f64,
    /// Days per planning year, used for cycle lengths and reorder points
    pub days_per_year: f64,
}

impl Default for EoqOptions {
    fn default() -> Self {
        Self {
            unit_cost: 0.0,
            lead_time_days: 0.0,
            days_per_year: 365.0,
        }
    }
}

/// Result of the classic EOQ model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EoqResult {
    /// Optimal order quantity Q*
    pub order_quantity: f64,
    /// Total annual cost (purchase + ordering + holding)
    pub total_cost: f64,
    /// Annual ordering cost at Q*
    pub ordering_cost: f64,
    /// Annual holding cost at Q*
    pub holding_cost: f64,
    /// Orders placed per year
    pub orders_per_year: f64,
    /// Days between consecutive orders
    pub cycle_days: f64,
    /// Inventory level that triggers a new order
    pub reorder_point: f64,
}

/// Result of the EOQ model with planned backorders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackorderResult {
    /// Optimal order quantity Q*
    pub order_quantity: f64,
    /// Maximum backordered quantity per cycle
    pub max_shortage: f64,
    /// Maximum on-hand inventory per cycle
    pub max_inventory: f64,
    /// Total annual cost (purchase + ordering + holding + shortage)
    pub total_cost: f64,
    /// Annual ordering cost at Q*
    pub ordering_cost: f64,
    /// Annual holding cost at Q*
    pub holding_cost: f64,
    /// Annual shortage penalty cost at Q*
    pub shortage_cost: f64,
    /// Orders placed per year
    pub orders_per_year: f64,
    /// Days between consecutive orders
    pub cycle_days: f64,
    /// Days per cycle with stock on hand
    pub time_with_stock_days: f64,
    /// Days per cycle in shortage
    pub time_with_shortage_days: f64,
}

/// A price-break range for the quantity-discount model
///
/// The upper bound is optional; `None` means the range is unbounded above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBreak {
    /// Smallest quantity the supplier accepts at this price
    pub min_qty: f64,
    /// Largest quantity covered by this price, if bounded
    pub max_qty: Option<f64>,
    /// Unit price within the range
    pub unit_price: f64,
}

impl PriceBreak {
    /// Create a bounded price-break range
    pub fn new(min_qty: f64, max_qty: f64, unit_price: f64) -> Self {
        Self {
            min_qty,
            max_qty: Some(max_qty),
            unit_price,
        }
    }

    /// Create a range with no upper bound
    pub fn unbounded(min_qty: f64, unit_price: f64) -> Self {
        Self {
            min_qty,
            max_qty: None,
            unit_price,
        }
    }

    /// Clamp an unconstrained quantity into this range
    fn clamp(&self, q: f64) -> f64 {
        if q < self.min_qty {
            self.min_qty
        } else {
            match self.max_qty {
                Some(max) if q > max => max,
                _ => q,
            }
        }
    }
}

/// Result of the quantity-discount EOQ model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountResult {
    /// Order quantity within the winning range
    pub order_quantity: f64,
    /// Unit price of the winning range
    pub unit_price: f64,
    /// Total annual cost (purchase + ordering + holding)
    pub total_cost: f64,
    /// Annual purchase cost at the winning price
    pub purchase_cost: f64,
    /// Annual ordering cost
    pub ordering_cost: f64,
    /// Annual holding cost
    pub holding_cost: f64,
    /// The winning price-break range
    pub price_break: PriceBreak,
}

/// Result of the finite-production-rate EOQ model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionResult {
    /// Optimal production lot size Q*
    pub order_quantity: f64,
    /// Maximum on-hand inventory per cycle
    pub max_inventory: f64,
    /// Total annual cost (purchase + ordering + holding)
    pub total_cost: f64,
    /// Annual ordering (setup) cost at Q*
    pub ordering_cost: f64,
    /// Annual holding cost at Q*
    pub holding_cost: f64,
    /// Production runs per year
    pub orders_per_year: f64,
    /// Days between consecutive production runs
    pub cycle_days: f64,
    /// Length of each production run in days
    pub production_time_days: f64,
    /// Fraction of each lot that accumulates as inventory, `1 - d/p`
    pub production_factor: f64,
}

fn validate_costs(demand: f64, holding_cost: f64, ordering_cost: f64) -> Result<()> {
    if demand <= 0.0 {
        return Err(StockError::InvalidParameter(
            "Annual demand must be positive".to_string(),
        ));
    }
    if holding_cost <= 0.0 {
        return Err(StockError::InvalidParameter(
            "Holding cost must be positive".to_string(),
        ));
    }
    if ordering_cost <= 0.0 {
        return Err(StockError::InvalidParameter(
            "Ordering cost must be positive".to_string(),
        ));
    }
    Ok(())
}

fn validate_options(opts: &EoqOptions) -> Result<()> {
    if opts.unit_cost < 0.0 {
        return Err(StockError::InvalidParameter(
            "Unit cost must not be negative".to_string(),
        ));
    }
    if opts.lead_time_days < 0.0 {
        return Err(StockError::InvalidParameter(
            "Lead time must not be negative".to_string(),
        ));
    }
    if opts.days_per_year <= 0.0 {
        return Err(StockError::InvalidParameter(
            "Days per year must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Classic EOQ: `Q* = sqrt(2 * D * C3 / C1)`
///
/// # Example
///
/// ```
/// use stock_forecast::eoq::{self, EoqOptions};
///
/// let result = eoq::classic(1000.0, 2.5, 10.0, &EoqOptions::default()).unwrap();
/// assert!((result.order_quantity - 89.44).abs() < 0.01);
/// ```
pub fn classic(
    demand: f64,
    holding_cost: f64,
    ordering_cost: f64,
    opts: &EoqOptions,
) -> Result<EoqResult> {
    validate_costs(demand, holding_cost, ordering_cost)?;
    validate_options(opts)?;

    let q = (2.0 * demand * ordering_cost / holding_cost).sqrt();
    let orders_per_year = demand / q;
    let ordering = orders_per_year * ordering_cost;
    let holding = (q / 2.0) * holding_cost;
    let purchase = demand * opts.unit_cost;

    Ok(EoqResult {
        order_quantity: q,
        total_cost: purchase + ordering + holding,
        ordering_cost: ordering,
        holding_cost: holding,
        orders_per_year,
        cycle_days: opts.days_per_year / orders_per_year,
        reorder_point: (demand / opts.days_per_year) * opts.lead_time_days,
    })
}

/// EOQ with planned backorders
///
/// The shortage penalty `shortage_cost` (C2) is charged per unit-year of
/// unmet demand. As it grows relative to the holding cost, the maximum
/// tolerated shortage strictly shrinks.
pub fn with_backorders(
    demand: f64,
    holding_cost: f64,
    shortage_cost: f64,
    ordering_cost: f64,
    opts: &EoqOptions,
) -> Result<BackorderResult> {
    validate_costs(demand, holding_cost, ordering_cost)?;
    validate_options(opts)?;
    if shortage_cost <= 0.0 {
        return Err(StockError::InvalidParameter(
            "Shortage cost must be positive".to_string(),
        ));
    }

    let q = (2.0 * demand * ordering_cost / holding_cost).sqrt()
        * ((holding_cost + shortage_cost) / shortage_cost).sqrt();
    let max_shortage = q * holding_cost / (holding_cost + shortage_cost);
    let max_inventory = q - max_shortage;

    let orders_per_year = demand / q;
    let ordering = orders_per_year * ordering_cost;
    let holding = holding_cost * max_inventory.powi(2) / (2.0 * q);
    let shortage = shortage_cost * max_shortage.powi(2) / (2.0 * q);

    Ok(BackorderResult {
        order_quantity: q,
        max_shortage,
        max_inventory,
        total_cost: demand * opts.unit_cost + ordering + holding + shortage,
        ordering_cost: ordering,
        holding_cost: holding,
        shortage_cost: shortage,
        orders_per_year,
        cycle_days: opts.days_per_year / orders_per_year,
        time_with_stock_days: (max_inventory / demand) * opts.days_per_year,
        time_with_shortage_days: (max_shortage / demand) * opts.days_per_year,
    })
}

/// EOQ with quantity discounts over price-break ranges
///
/// For each range the effective holding cost is `carrying_rate * unit_price`,
/// the unconstrained EOQ is clamped into the range's bounds, and the total
/// annual cost is evaluated at the clamped quantity. The range with the
/// strictly lowest total cost wins; on an exact tie the range scanned first
/// is kept.
pub fn with_discounts(
    demand: f64,
    ordering_cost: f64,
    carrying_rate: f64,
    price_breaks: &[PriceBreak],
) -> Result<DiscountResult> {
    if demand <= 0.0 {
        return Err(StockError::InvalidParameter(
            "Annual demand must be positive".to_string(),
        ));
    }
    if ordering_cost <= 0.0 {
        return Err(StockError::InvalidParameter(
            "Ordering cost must be positive".to_string(),
        ));
    }
    if carrying_rate <= 0.0 || carrying_rate > 1.0 {
        return Err(StockError::InvalidParameter(
            "Carrying rate must be in (0, 1]".to_string(),
        ));
    }
    if price_breaks.is_empty() {
        return Err(StockError::InvalidParameter(
            "At least one price-break range is required".to_string(),
        ));
    }
    if let Some(bad) = price_breaks.iter().find(|r| r.unit_price <= 0.0) {
        return Err(StockError::InvalidParameter(format!(
            "Unit price must be positive (got {} for range starting at {})",
            bad.unit_price, bad.min_qty
        )));
    }

    // Pure reduction over the ranges, keeping the strict minimum.
    let best = price_breaks
        .iter()
        .map(|range| {
            let holding_cost = carrying_rate * range.unit_price;
            let q = range.clamp((2.0 * demand * ordering_cost / holding_cost).sqrt());

            let purchase = demand * range.unit_price;
            let ordering = (demand / q) * ordering_cost;
            let holding = (q / 2.0) * holding_cost;

            DiscountResult {
                order_quantity: q,
                unit_price: range.unit_price,
                total_cost: purchase + ordering + holding,
                purchase_cost: purchase,
                ordering_cost: ordering,
                holding_cost: holding,
                price_break: range.clone(),
            }
        })
        .fold(None::<DiscountResult>, |best, candidate| match best {
            Some(current) if candidate.total_cost < current.total_cost => Some(candidate),
            Some(current) => Some(current),
            None => Some(candidate),
        });

    // The list was checked non-empty above.
    best.ok_or_else(|| {
        StockError::InvalidParameter("At least one price-break range is required".to_string())
    })
}

/// EOQ with a finite production rate
///
/// `demand_rate` and `production_rate` are daily rates; the production rate
/// must exceed the demand rate. When either rate is zero the production
/// factor degenerates to 1 (no production constraint).
pub fn finite_production(
    demand: f64,
    holding_cost: f64,
    ordering_cost: f64,
    demand_rate: f64,
    production_rate: f64,
    opts: &EoqOptions,
) -> Result<ProductionResult> {
    validate_costs(demand, holding_cost, ordering_cost)?;
    validate_options(opts)?;
    if demand_rate < 0.0 || production_rate < 0.0 {
        return Err(StockError::InvalidParameter(
            "Daily rates must not be negative".to_string(),
        ));
    }
    if production_rate <= demand_rate {
        return Err(StockError::InvalidParameter(
            "Production rate must exceed demand rate".to_string(),
        ));
    }

    let factor = if demand_rate > 0.0 && production_rate > 0.0 {
        1.0 - demand_rate / production_rate
    } else {
        1.0
    };

    let q = (2.0 * demand * ordering_cost / (holding_cost * factor)).sqrt();
    let max_inventory = q * factor;

    let orders_per_year = demand / q;
    let ordering = orders_per_year * ordering_cost;
    let holding = (max_inventory / 2.0) * holding_cost;

    Ok(ProductionResult {
        order_quantity: q,
        max_inventory,
        total_cost: demand * opts.unit_cost + ordering + holding,
        ordering_cost: ordering,
        holding_cost: holding,
        orders_per_year,
        cycle_days: opts.days_per_year / orders_per_year,
        production_time_days: (q / production_rate) * opts.days_per_year,
        production_factor: factor,
    })
}
