//! Estimated price range

use serde::{Deserialize, Serialize};

/// Price range produced by the valuation engine
///
/// `min_value <= max_value` always holds for values built by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueInterval {
    pub min_value: f64,
    pub max_value: f64,
    /// Heuristic confidence in percent, derived from the comparable count
    #[serde(alias = "confidence")]
    pub confidence_percent: f64,
}

impl ValueInterval {
    /// Build a symmetric interval around `center` for a confidence in `[0, 1]`
    ///
    /// The half-width fraction is `(1 - confidence) / 2`.
    pub(crate) fn around(center: f64, confidence: f64) -> Self {
        let half_width = (1.0 - confidence) / 2.0;
        Self {
            min_value: center * (1.0 - half_width),
            max_value: center * (1.0 + half_width),
            confidence_percent: confidence * 100.0,
        }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min_value + self.max_value) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.max_value - self.min_value
    }

    /// Check if a price lies inside the interval (bounds inclusive)
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min_value && value <= self.max_value
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.min_value.is_finite() && self.max_value.is_finite() && self.confidence_percent.is_finite()
    }
}
