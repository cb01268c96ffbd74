//! Subject sale and comparable street sales

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

use super::{ensure_positive_area, ensure_positive_price};
use crate::error::{InputSubject, Result, ValuationError};

/// One historical comparable transaction on the subject's street
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreetSale {
    /// Sale price
    pub amount: f64,
    /// Date of the sale
    pub sold_at: NaiveDate,
    /// Living area in square meters
    pub living_area: f64,
    /// Zero rooms is rejected when deserializing
    pub number_of_rooms: NonZeroU32,
}

impl StreetSale {
    /// Create a street sale, rejecting a non-positive amount or living area
    ///
    /// Failures name [`InputSubject::StreetSale`] since the sale has no
    /// position in a comparable list yet.
    pub fn new(
        amount: f64,
        sold_at: NaiveDate,
        living_area: f64,
        number_of_rooms: NonZeroU32,
    ) -> Result<Self> {
        ensure_positive_price(InputSubject::StreetSale, amount)?;
        ensure_positive_area(InputSubject::StreetSale, living_area)?;

        Ok(Self {
            amount,
            sold_at,
            living_area,
            number_of_rooms,
        })
    }

    /// Sale amount per square meter
    ///
    /// Only meaningful once [`StreetSale::validate`] has passed.
    pub fn price_per_area(&self) -> f64 {
        self.amount / self.living_area
    }

    /// Check amount and area, reporting failures against position `index`
    pub fn validate(&self, index: usize) -> Result<()> {
        ensure_positive_price(InputSubject::Comparable(index), self.amount)?;
        ensure_positive_area(InputSubject::Comparable(index), self.living_area)
    }
}

/// The subject's own transaction plus its street comparables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketData {
    /// The subject's observed sale price
    pub property_price: f64,
    /// Date of the subject's sale
    pub sale_date: NaiveDate,
    /// Comparable sales; order is irrelevant to the estimate
    #[serde(default)]
    pub street_sales: Vec<StreetSale>,
}

impl MarketData {
    /// Create market data, validating the subject price and every comparable
    ///
    /// An empty comparable list is accepted here; the engine reports it as
    /// [`ValuationError::NoComparables`].
    pub fn new(property_price: f64, sale_date: NaiveDate, street_sales: Vec<StreetSale>) -> Result<Self> {
        let market = Self {
            property_price,
            sale_date,
            street_sales,
        };
        market.validate()?;
        Ok(market)
    }

    /// Check the subject price and every comparable
    pub fn validate(&self) -> Result<()> {
        ensure_positive_price(InputSubject::Property, self.property_price)?;
        for (index, sale) in self.street_sales.iter().enumerate() {
            sale.validate(index)?;
        }
        Ok(())
    }

    pub fn comparables_count(&self) -> usize {
        self.street_sales.len()
    }

    /// Arithmetic mean of the comparables' price per square meter
    pub fn average_price_per_area(&self) -> Result<f64> {
        if self.street_sales.is_empty() {
            return Err(ValuationError::NoComparables);
        }

        let total: f64 = self.street_sales.iter().map(StreetSale::price_per_area).sum();
        Ok(total / self.street_sales.len() as f64)
    }
}
