//! Valuation engine
//!
//! Turns a subject property's sale, its street comparables, and its
//! physical and technical attributes into a price interval. The estimate is
//! a fixed chain of multiplicative adjustments applied to the subject's own
//! sale price, in this order:
//!
//! 1. street-level normalization towards the comparables' mean price per m²
//! 2. energy class
//! 3. building age
//! 4. ventilation efficiency (specific fan power)
//! 5. compound market growth since the subject's sale
//!
//! The interval half-width then follows from a confidence figure that only
//! depends on how many comparables were supplied.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::error::{InputSubject, Result, ValuationError};
use crate::models::{
    ensure_positive_price, MarketData, PropertyDetails, TechnicalData, ValuationRequest,
    ValueInterval,
};
use crate::policy::ValuationPolicy;

/// Step of the adjustment chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdjustmentKind {
    StreetLevel,
    EnergyClass,
    BuildingAge,
    TechnicalEfficiency,
    MarketGrowth,
}

impl AdjustmentKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::StreetLevel => "street level",
            Self::EnergyClass => "energy class",
            Self::BuildingAge => "building age",
            Self::TechnicalEfficiency => "technical efficiency",
            Self::MarketGrowth => "market growth",
        }
    }
}

/// One applied multiplier and the running price after it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adjustment {
    pub kind: AdjustmentKind,
    pub factor: f64,
    pub price_after: f64,
}

/// Full outcome of one estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Valuation {
    pub interval: ValueInterval,
    /// The subject's observed sale price the chain started from
    pub seed_price: f64,
    /// Price after every adjustment; the interval is centered on it
    pub base_price: f64,
    /// Every step of the chain in application order, neutral ones included
    pub adjustments: Vec<Adjustment>,
    pub comparables: usize,
    pub as_of: NaiveDate,
}

impl Valuation {
    /// Factor recorded for a given step
    pub fn factor(&self, kind: AdjustmentKind) -> Option<f64> {
        self.adjustments
            .iter()
            .find(|a| a.kind == kind)
            .map(|a| a.factor)
    }
}

struct AdjustmentChain {
    price: f64,
    trail: Vec<Adjustment>,
}

impl AdjustmentChain {
    fn seed(price: f64) -> Self {
        Self {
            price,
            trail: Vec::with_capacity(5),
        }
    }

    fn apply(&mut self, kind: AdjustmentKind, factor: f64) {
        self.price *= factor;
        debug!(step = kind.label(), factor, price = self.price, "Applied adjustment");
        self.trail.push(Adjustment {
            kind,
            factor,
            price_after: self.price,
        });
    }
}

/// Property valuation engine
///
/// Stateless apart from its policy and clock; concurrent calls are
/// independent.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use std::num::NonZeroU32;
/// use valuation_core::{MarketData, PropertyDetails, StreetSale, TechnicalData, ValuationEngine};
///
/// let as_of = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
/// let property = PropertyDetails::new(2005, 75.0)?.with_energy_class("C");
/// let market = MarketData::new(
///     3_000_000.0,
///     as_of,
///     vec![StreetSale::new(3_300_000.0, as_of, 75.0, NonZeroU32::new(3).unwrap())?],
/// )?;
///
/// let valuation = ValuationEngine::default()
///     .estimate_as_of(&property, &market, &TechnicalData::default(), as_of)?;
///
/// assert_eq!(valuation.interval.confidence_percent.round(), 82.0);
/// # Ok::<(), valuation_core::ValuationError>(())
/// ```
pub struct ValuationEngine {
    policy: ValuationPolicy,
    clock: Arc<dyn Clock>,
}

impl Default for ValuationEngine {
    fn default() -> Self {
        Self {
            policy: ValuationPolicy::default(),
            clock: Arc::new(SystemClock),
        }
    }
}

impl ValuationEngine {
    /// Create an engine with a custom policy, validating it first
    pub fn new(policy: ValuationPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self {
            policy,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the reference date source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Estimate as of the clock's current date
    pub fn estimate(
        &self,
        property: &PropertyDetails,
        market: &MarketData,
        technical: &TechnicalData,
    ) -> Result<Valuation> {
        self.estimate_as_of(property, market, technical, self.clock.today())
    }

    /// Estimate a bundled request, optionally pinned to a reference date
    pub fn estimate_request(
        &self,
        request: &ValuationRequest,
        as_of: Option<NaiveDate>,
    ) -> Result<Valuation> {
        let as_of = as_of.unwrap_or_else(|| self.clock.today());
        self.estimate_as_of(
            &request.property_details,
            &request.market_data,
            &request.technical_data,
            as_of,
        )
    }

    /// Estimate relative to an explicit reference date
    ///
    /// Ages and elapsed years are whole calendar-year differences against
    /// `as_of`. A sale dated after `as_of` yields a negative growth exponent
    /// rather than an error.
    pub fn estimate_as_of(
        &self,
        property: &PropertyDetails,
        market: &MarketData,
        technical: &TechnicalData,
        as_of: NaiveDate,
    ) -> Result<Valuation> {
        property.validate()?;
        market.validate()?;

        let avg_street_price_per_area = market.average_price_per_area()?;
        let property_price_per_area = market.property_price / property.living_area;
        let mut chain = AdjustmentChain::seed(market.property_price);

        chain.apply(
            AdjustmentKind::StreetLevel,
            avg_street_price_per_area / property_price_per_area,
        );

        chain.apply(
            AdjustmentKind::EnergyClass,
            self.policy.energy_factor(property.energy_grade()),
        );

        let age = as_of.year().saturating_sub(property.building_year);
        chain.apply(AdjustmentKind::BuildingAge, self.policy.age_factor(age));

        chain.apply(
            AdjustmentKind::TechnicalEfficiency,
            self.policy.fan_power_factor(technical.specific_fan_power),
        );

        let years_since_sale = as_of.year().saturating_sub(market.sale_date.year());
        if years_since_sale < 0 {
            debug!(years_since_sale, "Subject sale is dated after the reference date");
        }
        chain.apply(
            AdjustmentKind::MarketGrowth,
            self.policy.growth_factor(years_since_sale),
        );

        ensure_positive_price(InputSubject::Estimate, chain.price)?;

        let comparables = market.comparables_count();
        let confidence = self.policy.confidence(comparables);
        let interval = ValueInterval::around(chain.price, confidence);
        if !interval.is_finite() {
            return Err(ValuationError::InvalidPrice {
                subject: InputSubject::Estimate,
                value: interval.max_value,
            });
        }

        info!(
            comparables,
            base_price = chain.price,
            min_value = interval.min_value,
            max_value = interval.max_value,
            confidence_percent = interval.confidence_percent,
            "Valuation completed"
        );

        Ok(Valuation {
            interval,
            seed_price: market.property_price,
            base_price: chain.price,
            adjustments: chain.trail,
            comparables,
            as_of,
        })
    }
}

/// Estimate with the default policy relative to `as_of`
pub fn estimate(
    property: &PropertyDetails,
    market: &MarketData,
    technical: &TechnicalData,
    as_of: NaiveDate,
) -> Result<ValueInterval> {
    ValuationEngine::default()
        .estimate_as_of(property, market, technical, as_of)
        .map(|valuation| valuation.interval)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use crate::models::StreetSale;
    use std::num::NonZeroU32;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        let tolerance = expected.abs().max(1.0) * 1e-9;
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    fn property() -> PropertyDetails {
        PropertyDetails::new(2004, 75.0).unwrap().with_energy_class("C")
    }

    fn market(sale_date: NaiveDate, comparables: usize) -> MarketData {
        let sales = (0..comparables)
            .map(|_| {
                StreetSale::new(3_300_000.0, date(2023, 6, 1), 75.0, NonZeroU32::new(3).unwrap())
                    .unwrap()
            })
            .collect();
        MarketData::new(3_000_000.0, sale_date, sales).unwrap()
    }

    #[test]
    fn test_trail_covers_every_step() {
        let as_of = date(2024, 5, 1);
        let valuation = ValuationEngine::default()
            .estimate_as_of(&property(), &market(as_of, 1), &TechnicalData::default(), as_of)
            .unwrap();

        let kinds: Vec<_> = valuation.adjustments.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                AdjustmentKind::StreetLevel,
                AdjustmentKind::EnergyClass,
                AdjustmentKind::BuildingAge,
                AdjustmentKind::TechnicalEfficiency,
                AdjustmentKind::MarketGrowth,
            ]
        );

        let product: f64 = valuation.adjustments.iter().map(|a| a.factor).product();
        assert_close(valuation.seed_price * product, valuation.base_price);
        assert_close(
            valuation.adjustments.last().unwrap().price_after,
            valuation.base_price,
        );
        assert_close(valuation.factor(AdjustmentKind::StreetLevel).unwrap(), 1.1);
    }

    #[test]
    fn test_estimate_reads_clock() {
        let mut clock = MockClock::new();
        clock.expect_today().times(1).return_const(date(2026, 3, 10));

        let engine = ValuationEngine::default().with_clock(Arc::new(clock));
        let valuation = engine
            .estimate(&property(), &market(date(2024, 3, 10), 2), &TechnicalData::default())
            .unwrap();

        assert_eq!(valuation.as_of, date(2026, 3, 10));
        assert_close(valuation.factor(AdjustmentKind::MarketGrowth).unwrap(), 1.0609);
    }

    #[test]
    fn test_request_as_of_overrides_clock() {
        let mut clock = MockClock::new();
        clock.expect_today().never();

        let engine = ValuationEngine::default().with_clock(Arc::new(clock));
        let request = ValuationRequest::new(
            property(),
            market(date(2024, 1, 1), 1),
            TechnicalData::default(),
        );
        let valuation = engine.estimate_request(&request, Some(date(2024, 12, 31))).unwrap();

        assert_eq!(valuation.as_of, date(2024, 12, 31));
        assert_eq!(valuation.factor(AdjustmentKind::MarketGrowth), Some(1.0));
    }

    #[test]
    fn test_custom_policy_applies() {
        let policy = ValuationPolicy::builder()
            .annual_growth_rate(0.10)
            .fan_power(1.5, 0.9)
            .build()
            .unwrap();
        let engine = ValuationEngine::new(policy).unwrap();
        let as_of = date(2025, 1, 1);

        let valuation = engine
            .estimate_as_of(
                &property(),
                &market(date(2024, 1, 1), 1),
                &TechnicalData::with_specific_fan_power(1.8),
                as_of,
            )
            .unwrap();

        assert_close(valuation.factor(AdjustmentKind::TechnicalEfficiency).unwrap(), 0.9);
        assert_close(valuation.factor(AdjustmentKind::MarketGrowth).unwrap(), 1.1);
        assert_close(valuation.base_price, 3_300_000.0 * 0.9 * 1.1);
    }

    #[test]
    fn test_new_rejects_invalid_policy() {
        let policy = ValuationPolicy {
            confidence_cap: 2.0,
            ..Default::default()
        };
        assert!(matches!(
            ValuationEngine::new(policy),
            Err(ValuationError::InvalidPolicy(_))
        ));
    }

    #[test]
    fn test_validation_precedes_comparable_check() {
        let as_of = date(2024, 1, 1);
        let bad_property = PropertyDetails {
            living_area: 0.0,
            ..property()
        };
        let err = ValuationEngine::default()
            .estimate_as_of(&bad_property, &market(as_of, 0), &TechnicalData::default(), as_of)
            .unwrap_err();

        assert!(matches!(
            err,
            ValuationError::InvalidArea {
                subject: InputSubject::Property,
                ..
            }
        ));
    }

    #[test]
    fn test_overflowing_growth_is_rejected() {
        let policy = ValuationPolicy::builder().annual_growth_rate(1.0).build().unwrap();
        let engine = ValuationEngine::new(policy).unwrap();
        let as_of = date(2024, 1, 1);
        let ancient_sale = MarketData {
            sale_date: NaiveDate::MIN,
            ..market(as_of, 1)
        };

        let err = engine
            .estimate_as_of(&property(), &ancient_sale, &TechnicalData::default(), as_of)
            .unwrap_err();

        assert!(matches!(
            err,
            ValuationError::InvalidPrice {
                subject: InputSubject::Estimate,
                ..
            }
        ));
    }

    #[test]
    fn test_free_function_matches_engine() {
        let as_of = date(2024, 8, 15);
        let interval = estimate(&property(), &market(as_of, 3), &TechnicalData::default(), as_of).unwrap();

        assert_close(interval.confidence_percent, 86.0);
        assert!(interval.contains(3_300_000.0));
    }
}
