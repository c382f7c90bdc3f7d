//! Pricing and break-even analysis for imported products lives here.

pub mod aggregation;
pub mod break_even;
pub mod entities;
pub mod investigation;
pub mod landed_cost;
pub mod pricing;
pub mod purchase_plan;
pub mod viability;

pub use aggregation::{
    aggregate_competitors, aggregate_suppliers, CompetitorBand, PriceBand, SupplierBand,
};
pub use break_even::{
    project, timeline, BreakEvenResult, Horizon, RecoveryTimeline, TimelineMonth,
    MINIMUM_VIABLE_MARKUP, TIMELINE_MONTHS,
};
pub use entities::{
    new_quote_id, Availability, CompetitionLevel, CompetitorQuote, DemandLevel, MarketAssessment,
    PriceTrend, ProductConfig, QuoteId, ReputationTier, SalesPlatform, SupplierQuote,
};
pub use investigation::{
    Analysis, AuditContext, DataSufficiency, Investigation, InvestigationSnapshot,
};
pub use landed_cost::{compute_landed_cost, CostBreakdown};
pub use pricing::{recommend, PricingRecommendation, ENTRY_PRICE_FACTOR};
pub use purchase_plan::{
    reduce, suggested_plan, PlanAction, PlanEditor, PlanField, PlanMode, PurchasePlan,
};
pub use viability::{score, ViabilityScore, ViabilityTier};
