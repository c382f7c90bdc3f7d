//! One product investigation: editable inputs, full-chain analysis and the
//! snapshot handed to persistence on save.
//!
//! Every derived value is recomputed from the current inputs; nothing is cached.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, warn};
use uuid::Uuid;

use super::aggregation::{
    aggregate_competitors, aggregate_suppliers, CompetitorBand, SupplierBand,
};
use super::break_even::{project, timeline, BreakEvenResult, RecoveryTimeline};
use super::entities::{
    CompetitorQuote, MarketAssessment, ProductConfig, QuoteId, SupplierQuote,
};
use super::landed_cost::{compute_landed_cost, CostBreakdown};
use super::pricing::{recommend, PricingRecommendation};
use super::purchase_plan::{suggested_plan, PlanAction, PlanEditor, PlanField, PurchasePlan};
use super::viability::{score, ViabilityScore};
use crate::error::{ensure_non_negative, AnalysisError, Result};

/// Which market inputs are missing. Derived numbers are zero when incomplete
/// and must not be read as real prices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSufficiency {
    pub has_supplier_data: bool,
    pub has_competitor_data: bool,
}

impl DataSufficiency {
    pub fn is_complete(&self) -> bool {
        self.has_supplier_data && self.has_competitor_data
    }

    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.has_supplier_data {
            missing.push("supplier quotes");
        }
        if !self.has_competitor_data {
            missing.push("competitor prices");
        }
        missing
    }
}

/// Display-ready result of one pass over the whole chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub suppliers: SupplierBand,
    pub competitors: CompetitorBand,
    pub cost: CostBreakdown,
    pub recommendation: PricingRecommendation,
    pub score: ViabilityScore,
    pub sufficiency: DataSufficiency,
    pub plan: PurchasePlan,
    /// `None` until supplier data yields a usable landed cost.
    pub break_even: Option<BreakEvenResult>,
    pub timeline: Option<RecoveryTimeline>,
}

struct PricingChain {
    suppliers: SupplierBand,
    competitors: CompetitorBand,
    cost: CostBreakdown,
    recommendation: PricingRecommendation,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Investigation {
    pub product_id: String,
    pub config: ProductConfig,
    pub supplier_quotes: Vec<SupplierQuote>,
    pub competitor_quotes: Vec<CompetitorQuote>,
    pub assessment: MarketAssessment,
    /// Freight per unit in the supplier's currency.
    pub freight_per_unit: f64,
    /// Daily sell rate, local currency per unit of supplier currency.
    pub exchange_rate: f64,
    pub plan: PlanEditor,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Investigation {
    pub fn new(
        product_id: impl Into<String>,
        config: ProductConfig,
        exchange_rate: f64,
    ) -> Result<Self> {
        config.validate()?;
        let mut investigation = Self {
            product_id: product_id.into(),
            freight_per_unit: config.default_freight_per_unit,
            config,
            supplier_quotes: Vec::new(),
            competitor_quotes: Vec::new(),
            assessment: MarketAssessment::default(),
            exchange_rate,
            plan: PlanEditor::default(),
            created_at: OffsetDateTime::now_utc(),
        };
        let defaults = investigation.suggested_plan()?;
        investigation.plan = PlanEditor::new(defaults);
        Ok(investigation)
    }

    pub fn add_supplier(&mut self, quote: SupplierQuote) -> Result<QuoteId> {
        quote.validate()?;
        let id = quote.id.clone();
        self.supplier_quotes.push(quote);
        self.sync_plan_defaults()?;
        Ok(id)
    }

    pub fn update_supplier(&mut self, quote: SupplierQuote) -> Result<()> {
        quote.validate()?;
        let slot = self
            .supplier_quotes
            .iter_mut()
            .find(|q| q.id == quote.id)
            .ok_or_else(|| AnalysisError::UnknownQuote(quote.id.clone()))?;
        *slot = quote;
        self.sync_plan_defaults()
    }

    pub fn remove_supplier(&mut self, id: &str) -> Result<SupplierQuote> {
        let index = self
            .supplier_quotes
            .iter()
            .position(|q| q.id == id)
            .ok_or_else(|| AnalysisError::UnknownQuote(id.to_string()))?;
        let removed = self.supplier_quotes.remove(index);
        self.sync_plan_defaults()?;
        Ok(removed)
    }

    pub fn add_competitor(&mut self, quote: CompetitorQuote) -> Result<QuoteId> {
        quote.validate()?;
        let id = quote.id.clone();
        self.competitor_quotes.push(quote);
        self.sync_plan_defaults()?;
        Ok(id)
    }

    pub fn update_competitor(&mut self, quote: CompetitorQuote) -> Result<()> {
        quote.validate()?;
        let slot = self
            .competitor_quotes
            .iter_mut()
            .find(|q| q.id == quote.id)
            .ok_or_else(|| AnalysisError::UnknownQuote(quote.id.clone()))?;
        *slot = quote;
        self.sync_plan_defaults()
    }

    pub fn remove_competitor(&mut self, id: &str) -> Result<CompetitorQuote> {
        let index = self
            .competitor_quotes
            .iter()
            .position(|q| q.id == id)
            .ok_or_else(|| AnalysisError::UnknownQuote(id.to_string()))?;
        let removed = self.competitor_quotes.remove(index);
        self.sync_plan_defaults()?;
        Ok(removed)
    }

    pub fn set_assessment(&mut self, assessment: MarketAssessment) -> Result<()> {
        self.assessment = assessment;
        self.sync_plan_defaults()
    }

    pub fn set_freight_per_unit(&mut self, freight: f64) -> Result<()> {
        ensure_non_negative("freight per unit", freight)?;
        self.freight_per_unit = freight;
        self.sync_plan_defaults()
    }

    pub fn set_exchange_rate(&mut self, rate: f64) -> Result<()> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(AnalysisError::InvalidExchangeRate(rate));
        }
        self.exchange_rate = rate;
        self.sync_plan_defaults()
    }

    pub fn edit_plan(&mut self, field: PlanField) -> Result<()> {
        self.plan.dispatch(PlanAction::UserEdited(field))
    }

    pub fn reset_plan(&mut self) -> Result<()> {
        let defaults = self.suggested_plan()?;
        self.plan.dispatch(PlanAction::RestoreDefaults(defaults))
    }

    /// Plan defaults derived from the current assessment and pricing.
    pub fn suggested_plan(&self) -> Result<PurchasePlan> {
        let chain = self.pricing_chain()?;
        Ok(suggested_plan(&self.assessment, &chain.recommendation))
    }

    fn sync_plan_defaults(&mut self) -> Result<()> {
        let defaults = self.suggested_plan()?;
        self.plan.dispatch(PlanAction::UpstreamUpdated(defaults))
    }

    fn pricing_chain(&self) -> Result<PricingChain> {
        self.config.validate()?;

        let suppliers = aggregate_suppliers(&self.supplier_quotes)?;
        let competitors = aggregate_competitors(&self.competitor_quotes)?;
        let cost = compute_landed_cost(
            suppliers.best.as_ref(),
            self.freight_per_unit,
            self.exchange_rate,
        )?;
        let recommendation = recommend(
            cost.landed_unit_cost,
            self.config.target_margin_percent,
            &competitors.band,
            self.config.min_margin_percent,
        )?;

        Ok(PricingChain {
            suppliers,
            competitors,
            cost,
            recommendation,
        })
    }

    /// Runs the full chain against the current inputs.
    pub fn analyze(&self) -> Result<Analysis> {
        let PricingChain {
            suppliers,
            competitors,
            cost,
            recommendation,
        } = self.pricing_chain()?;

        let score = score(
            recommendation.realized_margin_percent,
            self.assessment.demand,
            self.assessment.trend,
            self.assessment.competition,
        );

        let sufficiency = DataSufficiency {
            has_supplier_data: cost.usable,
            has_competitor_data: !competitors.band.is_empty(),
        };
        if !sufficiency.is_complete() {
            warn!(
                product = %self.product_id,
                missing = ?sufficiency.missing(),
                "insufficient data for a complete analysis"
            );
        }

        let plan = self.plan.plan;
        plan.validate()?;

        let (break_even, recovery) = if cost.usable {
            let result = project(
                cost.landed_unit_cost,
                plan.sale_price,
                plan.units_to_purchase,
                plan.monthly_sales,
            )?;
            let view = timeline(&result, plan.units_to_purchase, plan.monthly_sales);
            (Some(result), Some(view))
        } else {
            (None, None)
        };

        debug!(
            product = %self.product_id,
            landed_unit_cost = cost.landed_unit_cost,
            suggested_price = recommendation.suggested_price,
            score = score.total,
            "analysis recomputed"
        );

        Ok(Analysis {
            suppliers,
            competitors,
            cost,
            recommendation,
            score,
            sufficiency,
            plan,
            break_even,
            timeline: recovery,
        })
    }

    /// Freezes the current inputs and derived pricing into a saveable record.
    ///
    /// `valid_for_days` is carried as a hint; expiry is up to the store.
    pub fn snapshot(
        &self,
        audit: &AuditContext,
        valid_for_days: u32,
    ) -> Result<InvestigationSnapshot> {
        let analysis = self.analyze()?;
        Ok(InvestigationSnapshot::from_analysis(
            self,
            &analysis,
            audit,
            valid_for_days,
        ))
    }
}

/// Acting analyst and time of save; carried on the record, never computed on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditContext {
    pub analyst_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub at: OffsetDateTime,
}

impl AuditContext {
    pub fn now(analyst_id: impl Into<String>) -> Self {
        Self {
            analyst_id: analyst_id.into(),
            at: OffsetDateTime::now_utc(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InvestigationSnapshot {
    pub id: Uuid,
    pub product_id: String,
    pub analyst_id: String,
    /// When the investigation was opened.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When this snapshot was taken, from the audit context.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub valid_for_days: u32,
    pub supplier_quotes: Vec<SupplierQuote>,
    pub competitor_quotes: Vec<CompetitorQuote>,
    pub assessment: MarketAssessment,
    pub exchange_rate: f64,
    pub freight_per_unit: f64,
    pub supplier_min_price: f64,
    pub supplier_max_price: f64,
    pub supplier_avg_price: f64,
    pub competitor_min_price: f64,
    pub competitor_max_price: f64,
    pub competitor_avg_price: f64,
    pub landed_unit_cost: f64,
    pub target_margin_percent: f64,
    pub suggested_price: f64,
    pub entry_price: f64,
    pub realized_margin_percent: f64,
    pub is_viable: bool,
    pub viability_score: u8,
    pub sufficiency: DataSufficiency,
}

impl InvestigationSnapshot {
    fn from_analysis(
        investigation: &Investigation,
        analysis: &Analysis,
        audit: &AuditContext,
        valid_for_days: u32,
    ) -> Self {
        let suppliers = &analysis.suppliers.band;
        let competitors = &analysis.competitors.band;
        let recommendation = &analysis.recommendation;

        Self {
            id: Uuid::new_v4(),
            product_id: investigation.product_id.clone(),
            analyst_id: audit.analyst_id.clone(),
            created_at: investigation.created_at,
            updated_at: audit.at,
            valid_for_days,
            supplier_quotes: investigation.supplier_quotes.clone(),
            competitor_quotes: investigation.competitor_quotes.clone(),
            assessment: investigation.assessment.clone(),
            exchange_rate: investigation.exchange_rate,
            freight_per_unit: investigation.freight_per_unit,
            supplier_min_price: suppliers.min,
            supplier_max_price: suppliers.max,
            supplier_avg_price: suppliers.average,
            competitor_min_price: competitors.min,
            competitor_max_price: competitors.max,
            competitor_avg_price: competitors.average,
            landed_unit_cost: analysis.cost.landed_unit_cost,
            target_margin_percent: recommendation.target_margin_percent,
            suggested_price: recommendation.suggested_price,
            entry_price: recommendation.entry_price,
            realized_margin_percent: recommendation.realized_margin_percent,
            is_viable: recommendation.is_viable,
            viability_score: analysis.score.total,
            sufficiency: analysis.sufficiency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::break_even::Horizon;
    use crate::domain::entities::{CompetitionLevel, DemandLevel, PriceTrend};
    use crate::domain::purchase_plan::PlanMode;

    fn config() -> ProductConfig {
        ProductConfig {
            target_margin_percent: 30.0,
            min_margin_percent: 15.0,
            default_freight_per_unit: 1.0,
        }
    }

    fn populated() -> Investigation {
        let mut inv = Investigation::new("sku-1", config(), 3.7).unwrap();
        inv.add_supplier(SupplierQuote::new("Taxed", 10.0, 8.0)).unwrap();
        inv.add_supplier(SupplierQuote::new("Cheap", 9.0, 0.0)).unwrap();
        inv.add_competitor(CompetitorQuote::new("A", 50.0)).unwrap();
        inv.add_competitor(CompetitorQuote::new("B", 60.0)).unwrap();
        inv
    }

    #[test]
    fn test_empty_investigation_reports_insufficient_data() {
        let inv = Investigation::new("sku-1", config(), 3.7).unwrap();
        let analysis = inv.analyze().unwrap();

        assert!(!analysis.cost.usable);
        assert!(!analysis.sufficiency.is_complete());
        assert_eq!(
            analysis.sufficiency.missing(),
            vec!["supplier quotes", "competitor prices"]
        );
        assert!(!analysis.recommendation.is_viable);
        assert!(analysis.break_even.is_none());
        assert!(analysis.timeline.is_none());
    }

    #[test]
    fn test_full_chain() {
        let inv = populated();
        let analysis = inv.analyze().unwrap();

        assert!(analysis.sufficiency.is_complete());
        assert_eq!(analysis.suppliers.best.as_ref().unwrap().supplier_name, "Cheap");
        assert!((analysis.cost.landed_unit_cost - 37.0).abs() < 1e-9);
        assert!((analysis.recommendation.entry_price - 47.5).abs() < 1e-9);
        assert!(analysis.recommendation.is_viable);
        assert_eq!(analysis.score.total, 70);

        // Medium demand baseline: 15/month, 45 units, sold at the entry price.
        assert_eq!(analysis.plan.monthly_sales, 15);
        assert_eq!(analysis.plan.units_to_purchase, 45);
        let break_even = analysis.break_even.unwrap();
        assert!(break_even.is_viable);
        assert_eq!(break_even.months_to_recover_capital, Horizon::Finite(3));
        assert!((analysis.plan.sale_price - 47.5).abs() < 1e-9);
    }

    #[test]
    fn test_quote_edits_rederive_suggested_sale_price() {
        let mut inv = Investigation::new("sku-1", config(), 3.7).unwrap();
        inv.add_supplier(SupplierQuote::new("Cheap", 9.0, 0.0)).unwrap();
        assert_eq!(inv.plan.mode, PlanMode::Suggested);
        // No competitors yet: 37 / (1 - 0.30).
        assert!((inv.plan.plan.sale_price - 52.857142857).abs() < 1e-6);

        inv.add_competitor(CompetitorQuote::new("A", 50.0)).unwrap();
        let b = inv.add_competitor(CompetitorQuote::new("B", 60.0)).unwrap();
        assert!((inv.plan.plan.sale_price - 47.5).abs() < 1e-9);

        let mut cheaper = inv.competitor_quotes[1].clone();
        assert_eq!(cheaper.id, b);
        cheaper.price = 40.0;
        inv.update_competitor(cheaper).unwrap();
        assert!((inv.plan.plan.sale_price - 38.0).abs() < 1e-9);
        assert_eq!(inv.plan.mode, PlanMode::Suggested);
        assert_eq!(inv.analyze().unwrap().plan, inv.plan.plan);
    }

    #[test]
    fn test_plan_defaults_follow_upstream_until_edited() {
        let mut inv = populated();
        inv.set_assessment(MarketAssessment {
            demand: DemandLevel::High,
            ..MarketAssessment::default()
        })
        .unwrap();
        assert_eq!(inv.plan.plan.monthly_sales, 30);

        inv.edit_plan(PlanField::UnitsToPurchase(20)).unwrap();
        inv.edit_plan(PlanField::MonthlySales(10)).unwrap();
        assert_eq!(inv.plan.mode, PlanMode::UserModified);

        inv.set_assessment(MarketAssessment {
            demand: DemandLevel::Low,
            ..MarketAssessment::default()
        })
        .unwrap();
        assert_eq!(inv.plan.plan.monthly_sales, 10);
        assert_eq!(inv.plan.plan.units_to_purchase, 20);

        inv.reset_plan().unwrap();
        assert_eq!(inv.plan.mode, PlanMode::Suggested);
        assert_eq!(inv.plan.plan.monthly_sales, 5);
        assert_eq!(inv.plan.plan.units_to_purchase, 15);
    }

    #[test]
    fn test_quote_edits_and_removal() {
        let mut inv = populated();
        let cheap_id = inv.supplier_quotes[1].id.clone();

        let mut pricier = inv.supplier_quotes[1].clone();
        pricier.price = 20.0;
        inv.update_supplier(pricier).unwrap();
        let analysis = inv.analyze().unwrap();
        assert_eq!(analysis.suppliers.best.unwrap().supplier_name, "Taxed");

        inv.remove_supplier(&cheap_id).unwrap();
        assert_eq!(inv.supplier_quotes.len(), 1);
        assert_eq!(
            inv.remove_supplier(&cheap_id),
            Err(AnalysisError::UnknownQuote(cheap_id.clone()))
        );

        let competitor_id = inv.competitor_quotes[0].id.clone();
        inv.remove_competitor(&competitor_id).unwrap();
        let analysis = inv.analyze().unwrap();
        assert_eq!(analysis.competitors.band.min, 60.0);
    }

    #[test]
    fn test_invalid_inputs_are_rejected() {
        let mut inv = populated();
        assert!(inv.add_supplier(SupplierQuote::new("Bad", -1.0, 0.0)).is_err());
        assert_eq!(inv.supplier_quotes.len(), 2);
        assert!(inv.set_exchange_rate(0.0).is_err());
        assert!(inv.set_freight_per_unit(-2.0).is_err());
        assert!(inv.edit_plan(PlanField::UnitsToPurchase(0)).is_err());

        let mut bad = config();
        bad.target_margin_percent = 100.0;
        assert!(Investigation::new("sku-2", bad, 3.7).is_err());
    }

    #[test]
    fn test_snapshot_captures_pricing() {
        let mut inv = populated();
        inv.set_assessment(MarketAssessment {
            competition: CompetitionLevel::Low,
            demand: DemandLevel::High,
            trend: PriceTrend::Rising,
            reasoning: "gap in the mid-range".into(),
            ..MarketAssessment::default()
        })
        .unwrap();

        let audit = AuditContext::now("analyst-7");
        let snapshot = inv.snapshot(&audit, 14).unwrap();

        assert_eq!(snapshot.analyst_id, "analyst-7");
        assert_eq!(snapshot.created_at, inv.created_at);
        assert_eq!(snapshot.updated_at, audit.at);
        assert!(snapshot.created_at <= snapshot.updated_at);
        assert_eq!(snapshot.valid_for_days, 14);
        assert_eq!(snapshot.supplier_quotes.len(), 2);
        assert_eq!(snapshot.supplier_min_price, 9.0);
        assert_eq!(snapshot.competitor_avg_price, 55.0);
        assert!((snapshot.landed_unit_cost - 37.0).abs() < 1e-9);
        assert!(snapshot.is_viable);
        assert_eq!(snapshot.viability_score, 100);

        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: InvestigationSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, snapshot);
    }
}
