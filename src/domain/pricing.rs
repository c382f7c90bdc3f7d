//! Suggested, entry and realised-margin pricing.

use serde::{Deserialize, Serialize};

use super::aggregation::PriceBand;
use crate::error::{ensure_non_negative, AnalysisError, Result};

/// Entry price undercuts the cheapest competitor by 5%.
pub const ENTRY_PRICE_FACTOR: f64 = 0.95;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingRecommendation {
    pub target_margin_percent: f64,
    pub suggested_price: f64,
    pub entry_price: f64,
    /// Margin we would realise selling at the competitor average.
    pub realized_margin_percent: f64,
    pub is_viable: bool,
}

pub fn recommend(
    landed_unit_cost: f64,
    target_margin_percent: f64,
    competitor_band: &PriceBand,
    min_margin_percent: f64,
) -> Result<PricingRecommendation> {
    ensure_non_negative("landed unit cost", landed_unit_cost)?;
    if !target_margin_percent.is_finite() {
        return Err(AnalysisError::NotFinite {
            field: "target margin",
        });
    }
    if target_margin_percent >= 100.0 {
        return Err(AnalysisError::TargetMarginOutOfRange(target_margin_percent));
    }
    if !min_margin_percent.is_finite() {
        return Err(AnalysisError::NotFinite {
            field: "minimum margin",
        });
    }

    let suggested_price = if landed_unit_cost > 0.0 {
        landed_unit_cost / (1.0 - target_margin_percent / 100.0)
    } else {
        0.0
    };

    let entry_price = if competitor_band.min > 0.0 {
        (competitor_band.min * ENTRY_PRICE_FACTOR).min(suggested_price)
    } else {
        suggested_price
    };

    let realized_margin_percent = if competitor_band.average > 0.0 && landed_unit_cost > 0.0 {
        (competitor_band.average - landed_unit_cost) / competitor_band.average * 100.0
    } else {
        0.0
    };

    // A zero cost means no supplier data; never report that as viable.
    let is_viable = landed_unit_cost > 0.0 && realized_margin_percent >= min_margin_percent;

    Ok(PricingRecommendation {
        target_margin_percent,
        suggested_price,
        entry_price,
        realized_margin_percent,
        is_viable,
    })
}
