//! Bundled valuation input

use serde::{Deserialize, Serialize};

use super::{MarketData, PropertyDetails, TechnicalData};
use crate::error::Result;

/// The three engine inputs as delivered by the upstream lookups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationRequest {
    pub property_details: PropertyDetails,
    pub market_data: MarketData,
    #[serde(default)]
    pub technical_data: TechnicalData,
}

impl ValuationRequest {
    pub fn new(
        property_details: PropertyDetails,
        market_data: MarketData,
        technical_data: TechnicalData,
    ) -> Self {
        Self {
            property_details,
            market_data,
            technical_data,
        }
    }

    /// Validate property and market inputs
    pub fn validate(&self) -> Result<()> {
        self.property_details.validate()?;
        self.market_data.validate()
    }
}
