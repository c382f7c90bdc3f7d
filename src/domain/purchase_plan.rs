//! Purchase plan editing state: system-suggested vs analyst-entered values.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::entities::{CompetitionLevel, DemandLevel, MarketAssessment};
use super::pricing::PricingRecommendation;
use crate::error::{ensure_non_negative, AnalysisError, Result};

/// Months of sell-through a suggested lot covers.
pub const SUGGESTED_STOCK_MONTHS: u32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PurchasePlan {
    pub units_to_purchase: u32,
    pub monthly_sales: u32,
    pub sale_price: f64,
}

impl Default for PurchasePlan {
    fn default() -> Self {
        Self {
            units_to_purchase: 1,
            monthly_sales: 0,
            sale_price: 0.0,
        }
    }
}

impl PurchasePlan {
    pub fn validate(&self) -> Result<()> {
        if self.units_to_purchase < 1 {
            return Err(AnalysisError::InvalidQuantity(self.units_to_purchase));
        }
        ensure_non_negative("sale price", self.sale_price)
    }
}

/// Share of the monthly market a new entrant can expect to capture.
fn capture_share(competition: CompetitionLevel) -> f64 {
    match competition {
        CompetitionLevel::Low => 0.20,
        CompetitionLevel::Medium => 0.10,
        CompetitionLevel::High => 0.05,
        CompetitionLevel::Saturated => 0.02,
    }
}

/// Monthly units assumed when no market volume estimate exists.
fn demand_baseline(demand: DemandLevel) -> u32 {
    match demand {
        DemandLevel::Low => 5,
        DemandLevel::Medium => 15,
        DemandLevel::High => 30,
    }
}

pub fn suggested_plan(
    assessment: &MarketAssessment,
    recommendation: &PricingRecommendation,
) -> PurchasePlan {
    let monthly_sales = match assessment.monthly_market_volume.filter(|v| *v > 0) {
        Some(volume) => (f64::from(volume) * capture_share(assessment.competition)).ceil() as u32,
        None => demand_baseline(assessment.demand),
    };

    let units_to_purchase = monthly_sales.saturating_mul(SUGGESTED_STOCK_MONTHS).max(1);

    let sale_price = if recommendation.entry_price > 0.0 {
        recommendation.entry_price
    } else {
        recommendation.suggested_price
    };

    PurchasePlan {
        units_to_purchase,
        monthly_sales,
        sale_price,
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanMode {
    /// All fields track upstream defaults.
    #[default]
    Suggested,
    /// At least one field was hand-edited; upstream changes are ignored.
    UserModified,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlanField {
    UnitsToPurchase(u32),
    MonthlySales(u32),
    SalePrice(f64),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlanAction {
    /// Upstream-derived defaults changed.
    UpstreamUpdated(PurchasePlan),
    UserEdited(PlanField),
    /// Explicit reset to the current defaults.
    RestoreDefaults(PurchasePlan),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanEditor {
    pub mode: PlanMode,
    pub plan: PurchasePlan,
}

pub fn reduce(state: PlanEditor, action: PlanAction) -> PlanEditor {
    match (state.mode, action) {
        (PlanMode::Suggested, PlanAction::UpstreamUpdated(defaults)) => PlanEditor {
            mode: PlanMode::Suggested,
            plan: defaults,
        },
        (PlanMode::UserModified, PlanAction::UpstreamUpdated(_)) => state,
        (_, PlanAction::UserEdited(field)) => {
            let mut plan = state.plan;
            match field {
                PlanField::UnitsToPurchase(units) => plan.units_to_purchase = units,
                PlanField::MonthlySales(sales) => plan.monthly_sales = sales,
                PlanField::SalePrice(price) => plan.sale_price = price,
            }
            PlanEditor {
                mode: PlanMode::UserModified,
                plan,
            }
        }
        (_, PlanAction::RestoreDefaults(defaults)) => PlanEditor {
            mode: PlanMode::Suggested,
            plan: defaults,
        },
    }
}

impl PlanEditor {
    pub fn new(defaults: PurchasePlan) -> Self {
        Self {
            mode: PlanMode::Suggested,
            plan: defaults,
        }
    }

    pub fn is_user_modified(&self) -> bool {
        self.mode == PlanMode::UserModified
    }

    /// Applies an action, rejecting hand-edited values the projector would refuse.
    pub fn dispatch(&mut self, action: PlanAction) -> Result<()> {
        if let PlanAction::UserEdited(field) = action {
            match field {
                PlanField::UnitsToPurchase(units) if units < 1 => {
                    return Err(AnalysisError::InvalidQuantity(units));
                }
                PlanField::SalePrice(price) => ensure_non_negative("sale price", price)?,
                _ => {}
            }
        }

        let next = reduce(*self, action);
        if next.mode != self.mode {
            debug!(from = ?self.mode, to = ?next.mode, "purchase plan mode changed");
        }
        *self = next;
        Ok(())
    }
}
