//! # Valuation Inputs and Outputs
//!
//! Value objects consumed and produced by the valuation engine.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`PropertyDetails`] | Static attributes of the subject property |
//! | [`EnergyClass`] | Parsed energy-performance letter grade |
//! | [`StreetSale`] | One comparable transaction on the same street |
//! | [`MarketData`] | The subject's own sale plus its comparables |
//! | [`TechnicalData`] | Ventilation and building-systems figures |
//! | [`ValueInterval`] | Estimated price range with confidence |
//! | [`ValuationRequest`] | All three inputs bundled for file/JSON input |
//!
//! Field names are camelCase on the wire and also accept the keys used by
//! the upstream property and ventilation registers (`energiklass`,
//! `byggnadsar`, `sfp_kw_per_m3s`, ...).

mod interval;
mod market;
mod property;
mod request;
mod technical;

pub use interval::ValueInterval;
pub use market::{MarketData, StreetSale};
pub use property::{EnergyClass, PropertyDetails};
pub use request::ValuationRequest;
pub use technical::TechnicalData;

use crate::error::{InputSubject, Result, ValuationError};

pub(crate) fn ensure_positive_area(subject: InputSubject, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValuationError::InvalidArea { subject, value })
    }
}

pub(crate) fn ensure_positive_price(subject: InputSubject, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValuationError::InvalidPrice { subject, value })
    }
}
