//! Additive 0-100 opportunity heuristic.
//!
//! Each factor contributes a fixed bucket value; buckets are not interpolated.

use serde::{Deserialize, Serialize};

use super::entities::{CompetitionLevel, DemandLevel, PriceTrend};

pub const MAX_SCORE: u8 = 100;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViabilityScore {
    pub margin_points: u8,
    pub demand_points: u8,
    pub trend_points: u8,
    pub competition_points: u8,
    pub total: u8,
}

impl ViabilityScore {
    pub fn tier(&self) -> ViabilityTier {
        ViabilityTier::from_score(self.total)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViabilityTier {
    Strong,
    Moderate,
    Weak,
    None,
}

impl ViabilityTier {
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= 75 => ViabilityTier::Strong,
            s if s >= 50 => ViabilityTier::Moderate,
            s if s > 0 => ViabilityTier::Weak,
            _ => ViabilityTier::None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViabilityTier::Strong => "Strong",
            ViabilityTier::Moderate => "Moderate",
            ViabilityTier::Weak => "Weak",
            ViabilityTier::None => "N/A",
        }
    }
}

fn margin_points(realized_margin_percent: f64) -> u8 {
    match realized_margin_percent {
        m if m >= 30.0 => 30,
        m if m >= 20.0 => 20,
        m if m >= 15.0 => 10,
        _ => 0,
    }
}

fn demand_points(demand: DemandLevel) -> u8 {
    match demand {
        DemandLevel::High => 25,
        DemandLevel::Medium => 15,
        DemandLevel::Low => 5,
    }
}

fn trend_points(trend: PriceTrend) -> u8 {
    match trend {
        PriceTrend::Rising => 20,
        PriceTrend::Stable => 10,
        PriceTrend::Falling => 0,
    }
}

fn competition_points(competition: CompetitionLevel) -> u8 {
    match competition {
        CompetitionLevel::Low => 25,
        CompetitionLevel::Medium => 15,
        CompetitionLevel::High => 5,
        CompetitionLevel::Saturated => 0,
    }
}

pub fn score(
    realized_margin_percent: f64,
    demand: DemandLevel,
    trend: PriceTrend,
    competition: CompetitionLevel,
) -> ViabilityScore {
    let margin_points = margin_points(realized_margin_percent);
    let demand_points = demand_points(demand);
    let trend_points = trend_points(trend);
    let competition_points = competition_points(competition);

    let sum = u16::from(margin_points)
        + u16::from(demand_points)
        + u16::from(trend_points)
        + u16::from(competition_points);

    ViabilityScore {
        margin_points,
        demand_points,
        trend_points,
        competition_points,
        total: sum.min(u16::from(MAX_SCORE)) as u8,
    }
}
