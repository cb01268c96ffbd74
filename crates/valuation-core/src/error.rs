//! Error types for valuation operations

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias for valuation operations
pub type Result<T> = std::result::Result<T, ValuationError>;

/// Identifies which input a validation failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputSubject {
    /// The property being valued
    Property,
    /// A comparable street sale, by position in `streetSales`
    Comparable(usize),
    /// A street sale built on its own, outside any comparable list
    StreetSale,
    /// The figure produced by the adjustment chain
    Estimate,
}

impl fmt::Display for InputSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property => write!(f, "subject property"),
            Self::Comparable(index) => write!(f, "comparable #{index}"),
            Self::StreetSale => write!(f, "street sale"),
            Self::Estimate => write!(f, "estimate"),
        }
    }
}

/// Errors reported by the valuation engine
///
/// Every variant is recoverable: callers decide whether to re-fetch data,
/// surface an "insufficient data" message, or fall back to another method.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValuationError {
    /// No comparable street sales were supplied
    #[error("No comparable street sales available")]
    NoComparables,

    /// A living area was zero, negative, or not a finite number
    #[error("Invalid living area for {subject}: {value}")]
    InvalidArea { subject: InputSubject, value: f64 },

    /// A price was zero, negative, or not a finite number
    #[error("Invalid price for {subject}: {value}")]
    InvalidPrice { subject: InputSubject, value: f64 },

    /// Calculation policy failed validation
    #[error("Invalid valuation policy: {0}")]
    InvalidPolicy(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ValuationError::InvalidArea {
            subject: InputSubject::Comparable(2),
            value: 0.0,
        };
        assert_eq!(err.to_string(), "Invalid living area for comparable #2: 0");

        let err = ValuationError::InvalidPrice {
            subject: InputSubject::Property,
            value: -1.5,
        };
        assert_eq!(err.to_string(), "Invalid price for subject property: -1.5");

        assert_eq!(
            ValuationError::NoComparables.to_string(),
            "No comparable street sales available"
        );
    }

    #[test]
    fn test_street_sale_subject_display() {
        let err = ValuationError::InvalidArea {
            subject: InputSubject::StreetSale,
            value: -2.0,
        };
        assert_eq!(err.to_string(), "Invalid living area for street sale: -2");
    }
}
