//! Capital recovery and ROI projection for a purchase lot.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, AnalysisError, Result};

/// Hint floor applied when the sale price does not cover the landed cost.
pub const MINIMUM_VIABLE_MARKUP: f64 = 1.15;

/// Months covered by the recovery timeline view.
pub const TIMELINE_MONTHS: u32 = 6;

/// A quantity that may never be reached (no profit, or no sales).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Horizon<T> {
    Finite(T),
    Unbounded,
}

impl<T: Copy> Horizon<T> {
    pub fn finite(&self) -> Option<T> {
        match self {
            Horizon::Finite(value) => Some(*value),
            Horizon::Unbounded => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Horizon::Unbounded)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BreakEvenResult {
    pub profit_per_unit: f64,
    pub total_capital_invested: f64,
    pub units_to_recover_capital: Horizon<u32>,
    pub months_to_recover_capital: Horizon<u32>,
    pub total_potential_profit: f64,
    pub roi_percent: f64,
    pub monthly_profitability_percent: f64,
    pub months_to_sell_through: Horizon<f64>,
    pub is_viable: bool,
    /// Set only for non-viable plans: landed cost plus a 15% floor margin.
    pub minimum_viable_price: Option<f64>,
}

pub fn project(
    landed_unit_cost: f64,
    sale_price: f64,
    units_to_purchase: u32,
    monthly_sales: u32,
) -> Result<BreakEvenResult> {
    ensure_non_negative("landed unit cost", landed_unit_cost)?;
    ensure_non_negative("sale price", sale_price)?;
    if units_to_purchase < 1 {
        return Err(AnalysisError::InvalidQuantity(units_to_purchase));
    }

    let units = f64::from(units_to_purchase);
    let profit_per_unit = sale_price - landed_unit_cost;
    let total_capital_invested = units * landed_unit_cost;
    let total_potential_profit = profit_per_unit * units;
    let roi_percent = ratio_percent(total_potential_profit, total_capital_invested);

    let months_to_sell_through = if monthly_sales > 0 {
        Horizon::Finite(units / f64::from(monthly_sales))
    } else {
        Horizon::Unbounded
    };

    if profit_per_unit <= 0.0 {
        return Ok(BreakEvenResult {
            profit_per_unit,
            total_capital_invested,
            units_to_recover_capital: Horizon::Unbounded,
            months_to_recover_capital: Horizon::Unbounded,
            total_potential_profit,
            roi_percent,
            monthly_profitability_percent: 0.0,
            months_to_sell_through,
            is_viable: false,
            minimum_viable_price: Some(landed_unit_cost * MINIMUM_VIABLE_MARKUP),
        });
    }

    let units_needed = (total_capital_invested / profit_per_unit).ceil();
    let units_to_recover = units_needed.min(units) as u32;

    let months_to_recover_capital = if monthly_sales > 0 {
        Horizon::Finite(units_to_recover.div_ceil(monthly_sales))
    } else {
        Horizon::Unbounded
    };

    let monthly_profitability_percent = if monthly_sales > 0 {
        ratio_percent(
            profit_per_unit * f64::from(monthly_sales),
            total_capital_invested,
        )
    } else {
        0.0
    };

    Ok(BreakEvenResult {
        profit_per_unit,
        total_capital_invested,
        units_to_recover_capital: Horizon::Finite(units_to_recover),
        months_to_recover_capital,
        total_potential_profit,
        roi_percent,
        monthly_profitability_percent,
        months_to_sell_through,
        is_viable: true,
        minimum_viable_price: None,
    })
}

fn ratio_percent(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator * 100.0
    } else {
        0.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimelineMonth {
    pub month: u32,
    pub units_sold: u32,
    pub cumulative_profit: f64,
    pub capital_recovered: bool,
    pub sold_out: bool,
}

/// Six-month view of a projection. Markers beyond the horizon are `None`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecoveryTimeline {
    pub recovery_month: Option<u32>,
    pub sell_through_month: Option<u32>,
    pub months: Vec<TimelineMonth>,
}

pub fn timeline(
    result: &BreakEvenResult,
    units_to_purchase: u32,
    monthly_sales: u32,
) -> RecoveryTimeline {
    let within = |month: u32| (month <= TIMELINE_MONTHS).then_some(month);

    let recovery_month = result.months_to_recover_capital.finite().and_then(within);
    let sell_through_month = result
        .months_to_sell_through
        .finite()
        .map(|months| months.ceil() as u32)
        .and_then(within);

    let months = (1..=TIMELINE_MONTHS)
        .map(|month| {
            let units_sold = monthly_sales.saturating_mul(month).min(units_to_purchase);
            TimelineMonth {
                month,
                units_sold,
                cumulative_profit: result.profit_per_unit * f64::from(units_sold),
                capital_recovered: recovery_month.is_some_and(|m| month >= m),
                sold_out: sell_through_month.is_some_and(|m| month >= m),
            }
        })
        .collect();

    RecoveryTimeline {
        recovery_month,
        sell_through_month,
        months,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_profitable_plan_scenario() {
        let result = project(37.0, 47.5, 20, 10).unwrap();

        assert!(result.is_viable);
        assert!(approx(result.profit_per_unit, 10.5));
        assert!(approx(result.total_capital_invested, 740.0));
        // ceil(740 / 10.5) = 71, capped at the lot size.
        assert_eq!(result.units_to_recover_capital, Horizon::Finite(20));
        assert_eq!(result.months_to_recover_capital, Horizon::Finite(2));
        assert!(approx(result.total_potential_profit, 210.0));
        assert!(approx(result.roi_percent, 28.378378378));
        assert!(approx(result.monthly_profitability_percent, 14.189189189));
        assert_eq!(result.months_to_sell_through, Horizon::Finite(2.0));
        assert!(result.minimum_viable_price.is_none());
    }

    #[test]
    fn test_units_to_recover_below_cap() {
        // capital 100, profit 60 per unit: two units recover it.
        let result = project(10.0, 70.0, 10, 3).unwrap();
        assert_eq!(result.units_to_recover_capital, Horizon::Finite(2));
        assert_eq!(result.months_to_recover_capital, Horizon::Finite(1));
    }

    #[test]
    fn test_loss_making_plan_is_unbounded() {
        let result = project(37.0, 30.0, 20, 10).unwrap();

        assert!(!result.is_viable);
        assert!(result.units_to_recover_capital.is_unbounded());
        assert!(result.months_to_recover_capital.is_unbounded());
        assert!(approx(result.total_potential_profit, -140.0));
        assert!(result.roi_percent < 0.0);
        assert!(approx(result.minimum_viable_price.unwrap(), 37.0 * 1.15));
    }

    #[test]
    fn test_break_even_price_is_not_viable() {
        let result = project(37.0, 37.0, 20, 10).unwrap();
        assert_eq!(result.profit_per_unit, 0.0);
        assert!(!result.is_viable);
        assert!(result.months_to_recover_capital.is_unbounded());
        assert_eq!(result.roi_percent, 0.0);
        assert!(!result.roi_percent.is_nan());
    }

    #[test]
    fn test_no_sales_means_unbounded_months() {
        let result = project(37.0, 47.5, 20, 0).unwrap();
        assert!(result.is_viable);
        assert!(result.months_to_recover_capital.is_unbounded());
        assert!(result.months_to_sell_through.is_unbounded());
        assert_eq!(result.monthly_profitability_percent, 0.0);
    }

    #[test]
    fn test_zero_cost_avoids_division() {
        let result = project(0.0, 10.0, 5, 1).unwrap();
        assert_eq!(result.roi_percent, 0.0);
        assert_eq!(result.units_to_recover_capital, Horizon::Finite(0));
        assert_eq!(result.monthly_profitability_percent, 0.0);
    }

    #[test]
    fn test_rejects_invalid_plan() {
        assert_eq!(
            project(37.0, 47.5, 0, 10),
            Err(AnalysisError::InvalidQuantity(0))
        );
        assert!(project(37.0, -1.0, 5, 10).is_err());
        assert!(project(f64::INFINITY, 10.0, 5, 10).is_err());
    }

    #[test]
    fn test_timeline_markers_within_horizon() {
        let result = project(37.0, 47.5, 20, 10).unwrap();
        let view = timeline(&result, 20, 10);

        assert_eq!(view.recovery_month, Some(2));
        assert_eq!(view.sell_through_month, Some(2));
        assert_eq!(view.months.len(), 6);
        assert_eq!(view.months[0].units_sold, 10);
        assert!(!view.months[0].capital_recovered);
        assert!(view.months[1].capital_recovered);
        assert_eq!(view.months[5].units_sold, 20);
        assert!(approx(view.months[5].cumulative_profit, 210.0));
    }

    #[test]
    fn test_timeline_markers_beyond_horizon() {
        let result = project(37.0, 47.5, 100, 7).unwrap();
        let view = timeline(&result, 100, 7);
        // 100 units at 7/month: 15 months to sell out.
        assert_eq!(view.sell_through_month, None);
        assert_eq!(view.recovery_month, None);
        assert!(view.months.iter().all(|m| !m.sold_out));

        let stalled = project(37.0, 30.0, 20, 0).unwrap();
        let view = timeline(&stalled, 20, 0);
        assert_eq!(view.recovery_month, None);
        assert_eq!(view.sell_through_month, None);
    }

    #[test]
    fn test_horizon_serializes_tagged() {
        let json = serde_json::to_string(&Horizon::<u32>::Unbounded).unwrap();
        assert_eq!(json, r#"{"kind":"unbounded"}"#);
        let json = serde_json::to_string(&Horizon::Finite(3_u32)).unwrap();
        assert_eq!(json, r#"{"kind":"finite","value":3}"#);
    }
}
