//! Error types for rejected engine inputs.

use thiserror::Error;

/// Raised when an input or configuration value is outside the range the engine
/// accepts. The engine refuses to compute instead of clamping.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("target margin must be below 100% (got {0}%)")]
    TargetMarginOutOfRange(f64),
    #[error("minimum margin must be below 100% (got {0}%)")]
    MinMarginOutOfRange(f64),
    #[error("{field} must not be negative (got {value})")]
    NegativeAmount { field: &'static str, value: f64 },
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("tax rate must be between 0% and 100% (got {0}%)")]
    TaxRateOutOfRange(f64),
    #[error("exchange rate must be positive (got {0})")]
    InvalidExchangeRate(f64),
    #[error("units to purchase must be at least 1 (got {0})")]
    InvalidQuantity(u32),
    #[error("invalid source URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("no quote with id {0}")]
    UnknownQuote(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Rejects NaN/infinite values and negatives for a named amount.
pub(crate) fn ensure_non_negative(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(AnalysisError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(AnalysisError::NegativeAmount { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_negative_guard() {
        assert!(ensure_non_negative("price", 0.0).is_ok());
        assert!(ensure_non_negative("price", 12.5).is_ok());
        assert_eq!(
            ensure_non_negative("price", -1.0),
            Err(AnalysisError::NegativeAmount {
                field: "price",
                value: -1.0
            })
        );
        assert_eq!(
            ensure_non_negative("freight", f64::NAN),
            Err(AnalysisError::NotFinite { field: "freight" })
        );
    }

    #[test]
    fn test_messages_are_descriptive() {
        let err = AnalysisError::TargetMarginOutOfRange(100.0);
        assert_eq!(err.to_string(), "target margin must be below 100% (got 100%)");
        let err = AnalysisError::InvalidQuantity(0);
        assert!(err.to_string().contains("at least 1"));
    }
}
