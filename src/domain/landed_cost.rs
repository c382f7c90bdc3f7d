//! Converts the best supplier quote into a local-currency unit cost.

use serde::{Deserialize, Serialize};

use super::entities::SupplierQuote;
use crate::error::{ensure_non_negative, AnalysisError, Result};

/// Full cost build-up for one unit. `landed_unit_cost` is the CTRU.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub supplier_price: f64,
    pub tax_amount: f64,
    pub supplier_price_with_tax: f64,
    pub freight_per_unit: f64,
    pub total_foreign_unit_cost: f64,
    pub exchange_rate: f64,
    pub landed_unit_cost: f64,
    /// False when no supplier data backed the computation; every amount is zero then.
    pub usable: bool,
}

impl CostBreakdown {
    pub fn unusable() -> Self {
        Self::default()
    }
}

/// `landed = (price + tax + freight) * exchange_rate`.
///
/// Freight and exchange rate are validated even when there is no supplier, so
/// a bad configuration surfaces before any quote is entered.
pub fn compute_landed_cost(
    best_supplier: Option<&SupplierQuote>,
    freight_per_unit: f64,
    exchange_rate: f64,
) -> Result<CostBreakdown> {
    ensure_non_negative("freight per unit", freight_per_unit)?;
    if !exchange_rate.is_finite() {
        return Err(AnalysisError::NotFinite {
            field: "exchange rate",
        });
    }
    if exchange_rate <= 0.0 {
        return Err(AnalysisError::InvalidExchangeRate(exchange_rate));
    }

    let Some(quote) = best_supplier else {
        return Ok(CostBreakdown::unusable());
    };
    quote.validate()?;

    let tax_amount = quote.tax_amount();
    let supplier_price_with_tax = quote.price + tax_amount;
    let total_foreign_unit_cost = supplier_price_with_tax + freight_per_unit;

    Ok(CostBreakdown {
        supplier_price: quote.price,
        tax_amount,
        supplier_price_with_tax,
        freight_per_unit,
        total_foreign_unit_cost,
        exchange_rate,
        landed_unit_cost: total_foreign_unit_cost * exchange_rate,
        usable: true,
    })
}
