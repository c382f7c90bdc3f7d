//! Reduces supplier and competitor quote lists into price bands.

use serde::{Deserialize, Serialize};

use super::entities::{CompetitorQuote, SupplierQuote};
use crate::error::Result;

/// Min/max/average over the usable (positive) prices of a quote list.
///
/// An empty band is all zeros and means "no market data", never a real zero
/// price.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceBand {
    pub min: f64,
    pub max: f64,
    pub average: f64,
    pub count: usize,
}

impl PriceBand {
    pub fn from_prices(prices: impl IntoIterator<Item = f64>) -> Self {
        let mut band = PriceBand::default();
        let mut sum = 0.0;

        for price in prices.into_iter().filter(|p| usable(*p)) {
            if band.count == 0 {
                band.min = price;
                band.max = price;
            } else {
                band.min = band.min.min(price);
                band.max = band.max.max(price);
            }
            sum += price;
            band.count += 1;
        }

        if band.count > 0 {
            band.average = sum / band.count as f64;
        }
        band
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplierBand {
    /// Band over tax-inclusive prices.
    pub band: PriceBand,
    /// Cheapest tax-inclusive quote, first occurrence on ties.
    pub best: Option<SupplierQuote>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompetitorBand {
    /// Band over raw local prices.
    pub band: PriceBand,
    pub leader: Option<CompetitorQuote>,
}

fn usable(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

/// Rejects the whole list if any quote is invalid (negative price, tax outside 0-100%).
pub fn aggregate_suppliers(quotes: &[SupplierQuote]) -> Result<SupplierBand> {
    for quote in quotes {
        quote.validate()?;
    }

    let priced: Vec<&SupplierQuote> = quotes.iter().filter(|q| usable(q.price)).collect();
    let band = PriceBand::from_prices(priced.iter().map(|q| q.price_with_tax()));

    if band.is_empty() {
        return Ok(SupplierBand::default());
    }

    let best = priced
        .into_iter()
        .find(|q| q.price_with_tax() == band.min)
        .cloned();

    Ok(SupplierBand { band, best })
}

pub fn aggregate_competitors(quotes: &[CompetitorQuote]) -> Result<CompetitorBand> {
    for quote in quotes {
        quote.validate()?;
    }

    let priced: Vec<&CompetitorQuote> = quotes.iter().filter(|q| usable(q.price)).collect();
    let band = PriceBand::from_prices(priced.iter().map(|q| q.price));

    if band.is_empty() {
        return Ok(CompetitorBand::default());
    }

    Ok(CompetitorBand {
        band,
        leader: market_leader(&priced).cloned(),
    })
}

/// The flagged category leader, else the highest-volume seller.
///
/// Only volumes above zero count as volume data: a list whose volumes are all
/// `None` or `Some(0)` has no leader unless one is flagged.
fn market_leader<'a>(quotes: &[&'a CompetitorQuote]) -> Option<&'a CompetitorQuote> {
    if let Some(flagged) = quotes.iter().find(|q| q.is_category_leader) {
        return Some(*flagged);
    }

    let mut leader: Option<(&CompetitorQuote, u32)> = None;
    for quote in quotes {
        let Some(volume) = quote.sales_volume.filter(|v| *v > 0) else {
            continue;
        };
        match leader {
            Some((_, best)) if best >= volume => {}
            _ => leader = Some((*quote, volume)),
        }
    }
    leader.map(|(quote, _)| quote)
}
