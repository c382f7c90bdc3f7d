//! Display strings for analysis results.

use crate::domain::{Horizon, PriceBand, RecoveryTimeline, TIMELINE_MONTHS};

const EMPTY: &str = "—";
const UNBOUNDED: &str = "∞";

/// Two decimals with `,` thousands separators, e.g. `-1,234.50`.
pub fn format_money(value: f64) -> String {
    if !value.is_finite() {
        return EMPTY.to_string();
    }
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::new();
    for (i, c) in whole.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let whole: String = grouped.chars().rev().collect();
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{whole}.{:02}", cents % 100)
}

pub fn format_percent(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.1}%")
    } else {
        EMPTY.to_string()
    }
}

pub fn format_units(horizon: Horizon<u32>) -> String {
    match horizon {
        Horizon::Finite(units) => units.to_string(),
        Horizon::Unbounded => UNBOUNDED.to_string(),
    }
}

pub fn format_months(horizon: Horizon<u32>) -> String {
    match horizon {
        Horizon::Finite(1) => "1 month".to_string(),
        Horizon::Finite(months) => format!("{months} months"),
        Horizon::Unbounded => UNBOUNDED.to_string(),
    }
}

pub fn format_fractional_months(horizon: Horizon<f64>) -> String {
    match horizon {
        Horizon::Finite(months) => format!("{months:.1} months"),
        Horizon::Unbounded => UNBOUNDED.to_string(),
    }
}

/// `min - max`, a single price when they match, or `—` without data.
pub fn format_band(band: &PriceBand) -> String {
    if band.is_empty() {
        return EMPTY.to_string();
    }
    if (band.max - band.min).abs() < f64::EPSILON {
        format_money(band.min)
    } else {
        format!("{} - {}", format_money(band.min), format_money(band.max))
    }
}

pub fn format_marker(month: Option<u32>) -> String {
    match month {
        Some(month) => format!("month {month}"),
        None => format!("beyond {TIMELINE_MONTHS} months"),
    }
}

/// One line per timeline month, e.g. `M2  20 sold  +210.00  [recovered, sold out]`.
pub fn format_timeline(timeline: &RecoveryTimeline) -> Vec<String> {
    timeline
        .months
        .iter()
        .map(|row| {
            let mut tags = Vec::new();
            if row.capital_recovered {
                tags.push("recovered");
            }
            if row.sold_out {
                tags.push("sold out");
            }
            let profit = format_money(row.cumulative_profit);
            let profit = if row.cumulative_profit > 0.0 {
                format!("+{profit}")
            } else {
                profit
            };
            if tags.is_empty() {
                format!("M{}  {} sold  {}", row.month, row.units_sold, profit)
            } else {
                format!(
                    "M{}  {} sold  {}  [{}]",
                    row.month,
                    row.units_sold,
                    profit,
                    tags.join(", ")
                )
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{project, timeline};

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "0.00");
        assert_eq!(format_money(47.5), "47.50");
        assert_eq!(format_money(1234567.891), "1,234,567.89");
        assert_eq!(format_money(-140.0), "-140.00");
        assert_eq!(format_money(-0.001), "0.00");
        assert_eq!(format_money(f64::NAN), "—");
    }

    #[test]
    fn test_format_horizons() {
        assert_eq!(format_months(Horizon::Finite(1)), "1 month");
        assert_eq!(format_months(Horizon::Finite(2)), "2 months");
        assert_eq!(format_months(Horizon::Unbounded), "∞");
        assert_eq!(format_units(Horizon::Finite(20)), "20");
        assert_eq!(format_fractional_months(Horizon::Finite(2.5)), "2.5 months");
        assert_eq!(format_percent(28.378), "28.4%");
    }

    #[test]
    fn test_format_band() {
        assert_eq!(format_band(&PriceBand::default()), "—");
        let single = PriceBand::from_prices([50.0]);
        assert_eq!(format_band(&single), "50.00");
        let range = PriceBand::from_prices([50.0, 60.0]);
        assert_eq!(format_band(&range), "50.00 - 60.00");
    }

    #[test]
    fn test_format_timeline() {
        let result = project(37.0, 47.5, 20, 10).unwrap();
        let view = timeline(&result, 20, 10);
        let lines = format_timeline(&view);
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "M1  10 sold  +105.00");
        assert_eq!(lines[1], "M2  20 sold  +210.00  [recovered, sold out]");
        assert_eq!(format_marker(view.recovery_month), "month 2");
        assert_eq!(format_marker(None), "beyond 6 months");
    }
}
