use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::error::{ensure_non_negative, AnalysisError, Result};

/// Identifier for quotes inside an investigation.
pub type QuoteId = String;

pub fn new_quote_id() -> QuoteId {
    Uuid::new_v4().to_string()
}

/// Stock state reported by a foreign supplier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    #[default]
    Unknown,
    InStock,
    LowStock,
    OutOfStock,
}

/// One foreign-market price point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SupplierQuote {
    pub id: QuoteId,
    pub supplier_name: String,
    /// Unit price in the supplier's currency, before tax.
    pub price: f64,
    /// Destination sales tax in percent (0-100).
    pub tax_rate: f64,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub availability: Availability,
    #[serde(default)]
    pub shipping_cost: Option<f64>,
    #[serde(default)]
    pub notes: String,
}

impl SupplierQuote {
    pub fn new(supplier_name: impl Into<String>, price: f64, tax_rate: f64) -> Self {
        Self {
            id: new_quote_id(),
            supplier_name: supplier_name.into(),
            price,
            tax_rate,
            source_url: None,
            availability: Availability::Unknown,
            shipping_cost: None,
            notes: String::new(),
        }
    }

    pub fn price_with_tax(&self) -> f64 {
        self.price * (1.0 + self.tax_rate / 100.0)
    }

    pub fn tax_amount(&self) -> f64 {
        self.price * (self.tax_rate / 100.0)
    }

    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("supplier price", self.price)?;
        if !self.tax_rate.is_finite() {
            return Err(AnalysisError::NotFinite { field: "tax rate" });
        }
        if !(0.0..=100.0).contains(&self.tax_rate) {
            return Err(AnalysisError::TaxRateOutOfRange(self.tax_rate));
        }
        if let Some(shipping) = self.shipping_cost {
            ensure_non_negative("shipping cost", shipping)?;
        }
        validate_source_url(self.source_url.as_deref())
    }
}

/// Local channel a competitor sells through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesPlatform {
    #[default]
    Marketplace,
    OwnStore,
    Other,
}

/// Seller reputation tier as shown by the marketplace.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReputationTier {
    #[default]
    Unknown,
    Bronze,
    Silver,
    Gold,
    Platinum,
}

/// One local-market price point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompetitorQuote {
    pub id: QuoteId,
    pub seller_name: String,
    #[serde(default)]
    pub platform: SalesPlatform,
    /// Unit price in local currency.
    pub price: f64,
    #[serde(default)]
    pub sales_volume: Option<u32>,
    #[serde(default)]
    pub reputation: ReputationTier,
    #[serde(default)]
    pub is_category_leader: bool,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub notes: String,
}

impl CompetitorQuote {
    pub fn new(seller_name: impl Into<String>, price: f64) -> Self {
        Self {
            id: new_quote_id(),
            seller_name: seller_name.into(),
            platform: SalesPlatform::Marketplace,
            price,
            sales_volume: None,
            reputation: ReputationTier::Unknown,
            is_category_leader: false,
            source_url: None,
            notes: String::new(),
        }
    }

    pub fn with_volume(mut self, volume: u32) -> Self {
        self.sales_volume = Some(volume);
        self
    }

    pub fn as_leader(mut self) -> Self {
        self.is_category_leader = true;
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("competitor price", self.price)?;
        validate_source_url(self.source_url.as_deref())
    }
}

fn validate_source_url(url: Option<&str>) -> Result<()> {
    match url.map(str::trim) {
        Some(raw) if !raw.is_empty() => {
            Url::parse(raw)?;
            Ok(())
        }
        _ => Ok(()),
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitionLevel {
    Low,
    #[default]
    Medium,
    High,
    Saturated,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandLevel {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTrend {
    Rising,
    #[default]
    Stable,
    Falling,
}

/// Analyst-supplied qualitative read of the local market.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketAssessment {
    #[serde(default)]
    pub competition: CompetitionLevel,
    #[serde(default)]
    pub demand: DemandLevel,
    #[serde(default)]
    pub trend: PriceTrend,
    /// Estimated units sold per month across the whole local market.
    #[serde(default)]
    pub monthly_market_volume: Option<u32>,
    #[serde(default)]
    pub competitive_advantage: String,
    #[serde(default)]
    pub reasoning: String,
}

/// Per-product pricing objectives supplied by the catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductConfig {
    pub target_margin_percent: f64,
    pub min_margin_percent: f64,
    /// Freight per unit in the supplier's currency.
    pub default_freight_per_unit: f64,
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            target_margin_percent: 30.0,
            min_margin_percent: 15.0,
            default_freight_per_unit: 0.0,
        }
    }
}

impl ProductConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.target_margin_percent.is_finite() {
            return Err(AnalysisError::NotFinite {
                field: "target margin",
            });
        }
        if self.target_margin_percent >= 100.0 {
            return Err(AnalysisError::TargetMarginOutOfRange(
                self.target_margin_percent,
            ));
        }
        if !self.min_margin_percent.is_finite() {
            return Err(AnalysisError::NotFinite {
                field: "minimum margin",
            });
        }
        if self.min_margin_percent >= 100.0 {
            return Err(AnalysisError::MinMarginOutOfRange(self.min_margin_percent));
        }
        ensure_non_negative("default freight", self.default_freight_per_unit)
    }
}
