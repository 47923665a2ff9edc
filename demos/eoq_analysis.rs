//! Run each EOQ model on a worked example and classify a small assortment.

use polars::prelude::*;
use stock_forecast::abc::{self, AbcThresholds};
use stock_forecast::eoq::{self, EoqOptions, PriceBreak};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Classic EOQ for a steady item
    let classic = eoq::classic(
        1000.0,
        2.5,
        10.0,
        &EoqOptions {
            unit_cost: 5.0,
            lead_time_days: 7.0,
            ..Default::default()
        },
    )?;
    println!("Classic EOQ:\n{}\n", serde_json::to_string_pretty(&classic)?);

    // Planned backorders with an expensive shortage penalty
    let backorders =
        eoq::with_backorders(450.0, 8750.0, 15000.0, 8000.0, &EoqOptions::default())?;
    println!(
        "EOQ with backorders:\n{}\n",
        serde_json::to_string_pretty(&backorders)?
    );

    // Quantity discounts over three price breaks
    let discounts = eoq::with_discounts(
        6000.0,
        750.0,
        0.1,
        &[
            PriceBreak::new(0.0, 199.0, 4000.0),
            PriceBreak::new(200.0, 499.0, 3500.0),
            PriceBreak::unbounded(500.0, 3000.0),
        ],
    )?;
    println!(
        "EOQ with discounts:\n{}\n",
        serde_json::to_string_pretty(&discounts)?
    );

    // Finite production rate
    let production = eoq::finite_production(
        26000.0,
        1.08,
        135.0,
        26000.0 / 365.0,
        60000.0 / 365.0,
        &EoqOptions::default(),
    )?;
    println!(
        "Finite-production EOQ:\n{}\n",
        serde_json::to_string_pretty(&production)?
    );

    // ABC classification of a small assortment
    let assortment = DataFrame::new(vec![
        Series::new("sku", vec!["S1", "S2", "S3", "S4", "S5"]),
        Series::new("annual_value", vec![12000.0, 6500.0, 2400.0, 900.0, 400.0]),
    ])?;
    let classified = abc::classify(&assortment, "annual_value", &AbcThresholds::default())?;

    println!("ABC classification:\n{}", classified.table);
    for summary in &classified.summary {
        println!(
            "class {}: {} items, total value {:.0}, {:.1}% of value",
            summary.class, summary.item_count, summary.total_value, summary.pct_of_total
        );
    }

    Ok(())
}
