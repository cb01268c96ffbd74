//! Calculation policy for the valuation engine

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Result, ValuationError};
use crate::models::EnergyClass;

/// Tunable constants of the adjustment chain
///
/// [`ValuationPolicy::default`] reproduces the standard calculation. The
/// annual growth rate is an assumption, not derived from market data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ValuationPolicy {
    /// Multiplier per energy grade; grades without an entry are neutral
    pub energy_factors: BTreeMap<EnergyClass, f64>,

    /// Buildings younger than this many years get the new-construction premium
    pub new_construction_max_age: i32,

    pub new_construction_premium: f64,

    /// Buildings older than this many years get the depreciation factor
    pub depreciation_min_age: i32,

    pub depreciation_factor: f64,

    /// Specific fan power above this value (kW per m³/s) is penalised
    pub fan_power_threshold: f64,

    pub fan_power_penalty: f64,

    /// Compound market growth per elapsed year since the subject's sale
    pub annual_growth_rate: f64,

    /// Confidence before counting any comparables
    pub confidence_floor: f64,

    /// Confidence added per comparable
    pub confidence_per_comparable: f64,

    pub confidence_cap: f64,
}

impl Default for ValuationPolicy {
    fn default() -> Self {
        Self {
            energy_factors: default_energy_factors(),
            new_construction_max_age: 10,
            new_construction_premium: 1.05,
            depreciation_min_age: 40,
            depreciation_factor: 0.85,
            fan_power_threshold: 2.0,
            fan_power_penalty: 0.95,
            annual_growth_rate: 0.03,
            confidence_floor: 0.80,
            confidence_per_comparable: 0.02,
            confidence_cap: 0.90,
        }
    }
}

fn default_energy_factors() -> BTreeMap<EnergyClass, f64> {
    BTreeMap::from([
        (EnergyClass::A, 1.05),
        (EnergyClass::B, 1.03),
        (EnergyClass::C, 1.00),
        (EnergyClass::D, 0.97),
        (EnergyClass::E, 0.95),
    ])
}

impl ValuationPolicy {
    /// Create a new policy builder
    pub fn builder() -> ValuationPolicyBuilder {
        ValuationPolicyBuilder::default()
    }

    /// Parse a policy from JSON and validate it
    ///
    /// Fields missing from the document keep their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        let policy: Self = serde_json::from_str(json)
            .map_err(|e| ValuationError::InvalidPolicy(format!("malformed policy: {e}")))?;
        policy.validate()?;
        Ok(policy)
    }

    /// Multiplier for an energy grade; `None` or an unlisted grade is neutral
    pub fn energy_factor(&self, grade: Option<EnergyClass>) -> f64 {
        grade
            .and_then(|g| self.energy_factors.get(&g).copied())
            .unwrap_or(1.0)
    }

    /// Multiplier for a building of the given age
    ///
    /// Both thresholds are exclusive: an age equal to either one is neutral.
    pub fn age_factor(&self, age: i32) -> f64 {
        if age < self.new_construction_max_age {
            self.new_construction_premium
        } else if age > self.depreciation_min_age {
            self.depreciation_factor
        } else {
            1.0
        }
    }

    /// Multiplier for the ventilation system's specific fan power
    pub fn fan_power_factor(&self, specific_fan_power: Option<f64>) -> f64 {
        match specific_fan_power {
            Some(sfp) if sfp > self.fan_power_threshold => self.fan_power_penalty,
            _ => 1.0,
        }
    }

    /// Compound growth over a whole number of years, which may be negative
    pub fn growth_factor(&self, years: i32) -> f64 {
        (1.0 + self.annual_growth_rate).powi(years)
    }

    /// Confidence in `[0, 1]` for the given number of comparables
    pub fn confidence(&self, comparables: usize) -> f64 {
        let raised = self.confidence_floor + self.confidence_per_comparable * comparables as f64;
        raised.min(self.confidence_cap)
    }

    /// Validate the policy
    pub fn validate(&self) -> Result<()> {
        for (grade, factor) in &self.energy_factors {
            ensure_multiplier(&format!("energy factor for class {grade}"), *factor)?;
        }
        ensure_multiplier("new construction premium", self.new_construction_premium)?;
        ensure_multiplier("depreciation factor", self.depreciation_factor)?;
        ensure_multiplier("fan power penalty", self.fan_power_penalty)?;

        if self.new_construction_max_age > self.depreciation_min_age {
            return Err(ValuationError::InvalidPolicy(format!(
                "new construction age {} exceeds depreciation age {}",
                self.new_construction_max_age, self.depreciation_min_age
            )));
        }

        if !self.fan_power_threshold.is_finite() {
            return Err(ValuationError::InvalidPolicy(
                "fan power threshold must be finite".to_string(),
            ));
        }

        if !self.annual_growth_rate.is_finite() || self.annual_growth_rate <= -1.0 {
            return Err(ValuationError::InvalidPolicy(format!(
                "annual growth rate must be finite and greater than -1, got {}",
                self.annual_growth_rate
            )));
        }

        ensure_unit_range("confidence floor", self.confidence_floor)?;
        ensure_unit_range("confidence cap", self.confidence_cap)?;

        if self.confidence_cap < self.confidence_floor {
            return Err(ValuationError::InvalidPolicy(
                "confidence cap must not be below the confidence floor".to_string(),
            ));
        }

        if !self.confidence_per_comparable.is_finite() || self.confidence_per_comparable < 0.0 {
            return Err(ValuationError::InvalidPolicy(
                "confidence per comparable must be a non-negative number".to_string(),
            ));
        }

        Ok(())
    }
}

fn ensure_multiplier(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValuationError::InvalidPolicy(format!(
            "{name} must be a positive number, got {value}"
        )))
    }
}

fn ensure_unit_range(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ValuationError::InvalidPolicy(format!(
            "{name} must lie in [0, 1], got {value}"
        )))
    }
}

/// Builder for ValuationPolicy
#[derive(Debug, Default)]
pub struct ValuationPolicyBuilder {
    energy_factors: Option<BTreeMap<EnergyClass, f64>>,
    new_construction: Option<(i32, f64)>,
    depreciation: Option<(i32, f64)>,
    fan_power: Option<(f64, f64)>,
    annual_growth_rate: Option<f64>,
    confidence_floor: Option<f64>,
    confidence_per_comparable: Option<f64>,
    confidence_cap: Option<f64>,
}

impl ValuationPolicyBuilder {
    /// Override the multiplier for one energy grade
    pub fn energy_factor(mut self, grade: EnergyClass, factor: f64) -> Self {
        self.energy_factors
            .get_or_insert_with(default_energy_factors)
            .insert(grade, factor);
        self
    }

    /// Set the new-construction age threshold and premium
    pub fn new_construction(mut self, max_age: i32, premium: f64) -> Self {
        self.new_construction = Some((max_age, premium));
        self
    }

    /// Set the depreciation age threshold and factor
    pub fn depreciation(mut self, min_age: i32, factor: f64) -> Self {
        self.depreciation = Some((min_age, factor));
        self
    }

    /// Set the specific fan power threshold and penalty
    pub fn fan_power(mut self, threshold: f64, penalty: f64) -> Self {
        self.fan_power = Some((threshold, penalty));
        self
    }

    pub fn annual_growth_rate(mut self, rate: f64) -> Self {
        self.annual_growth_rate = Some(rate);
        self
    }

    pub fn confidence_floor(mut self, floor: f64) -> Self {
        self.confidence_floor = Some(floor);
        self
    }

    pub fn confidence_per_comparable(mut self, step: f64) -> Self {
        self.confidence_per_comparable = Some(step);
        self
    }

    pub fn confidence_cap(mut self, cap: f64) -> Self {
        self.confidence_cap = Some(cap);
        self
    }

    /// Build the policy
    pub fn build(self) -> Result<ValuationPolicy> {
        let defaults = ValuationPolicy::default();
        let (new_construction_max_age, new_construction_premium) = self.new_construction.unwrap_or((
            defaults.new_construction_max_age,
            defaults.new_construction_premium,
        ));
        let (depreciation_min_age, depreciation_factor) = self
            .depreciation
            .unwrap_or((defaults.depreciation_min_age, defaults.depreciation_factor));
        let (fan_power_threshold, fan_power_penalty) = self
            .fan_power
            .unwrap_or((defaults.fan_power_threshold, defaults.fan_power_penalty));

        let policy = ValuationPolicy {
            energy_factors: self.energy_factors.unwrap_or(defaults.energy_factors),
            new_construction_max_age,
            new_construction_premium,
            depreciation_min_age,
            depreciation_factor,
            fan_power_threshold,
            fan_power_penalty,
            annual_growth_rate: self.annual_growth_rate.unwrap_or(defaults.annual_growth_rate),
            confidence_floor: self.confidence_floor.unwrap_or(defaults.confidence_floor),
            confidence_per_comparable: self
                .confidence_per_comparable
                .unwrap_or(defaults.confidence_per_comparable),
            confidence_cap: self.confidence_cap.unwrap_or(defaults.confidence_cap),
        };

        policy.validate()?;
        Ok(policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = ValuationPolicy::default();
        assert!(policy.validate().is_ok());
        assert_eq!(policy.energy_factor(Some(EnergyClass::A)), 1.05);
        assert_eq!(policy.energy_factor(Some(EnergyClass::E)), 0.95);
        assert_eq!(policy.energy_factor(Some(EnergyClass::G)), 1.0);
        assert_eq!(policy.energy_factor(None), 1.0);
    }

    #[test]
    fn test_age_factor_boundaries() {
        let policy = ValuationPolicy::default();
        assert_eq!(policy.age_factor(0), 1.05);
        assert_eq!(policy.age_factor(9), 1.05);
        assert_eq!(policy.age_factor(10), 1.0);
        assert_eq!(policy.age_factor(40), 1.0);
        assert_eq!(policy.age_factor(41), 0.85);
        // Construction year after the reference date
        assert_eq!(policy.age_factor(-2), 1.05);
    }

    #[test]
    fn test_fan_power_factor() {
        let policy = ValuationPolicy::default();
        assert_eq!(policy.fan_power_factor(None), 1.0);
        assert_eq!(policy.fan_power_factor(Some(2.0)), 1.0);
        assert_eq!(policy.fan_power_factor(Some(2.01)), 0.95);
        assert_eq!(policy.fan_power_factor(Some(f64::NAN)), 1.0);
    }

    #[test]
    fn test_growth_factor() {
        let policy = ValuationPolicy::default();
        assert_eq!(policy.growth_factor(0), 1.0);
        assert!((policy.growth_factor(2) - 1.0609).abs() < 1e-12);
        assert!((policy.growth_factor(-1) - 1.0 / 1.03).abs() < 1e-12);
    }

    #[test]
    fn test_confidence() {
        let policy = ValuationPolicy::default();
        assert!((policy.confidence(1) - 0.82).abs() < 1e-12);
        assert!((policy.confidence(4) - 0.88).abs() < 1e-12);
        assert!((policy.confidence(5) - 0.90).abs() < 1e-12);
        assert!((policy.confidence(50) - 0.90).abs() < 1e-12);
    }

    #[test]
    fn test_builder() {
        let policy = ValuationPolicy::builder()
            .annual_growth_rate(0.05)
            .energy_factor(EnergyClass::F, 0.9)
            .depreciation(50, 0.8)
            .build()
            .unwrap();

        assert_eq!(policy.annual_growth_rate, 0.05);
        assert_eq!(policy.energy_factor(Some(EnergyClass::F)), 0.9);
        assert_eq!(policy.energy_factor(Some(EnergyClass::A)), 1.05);
        assert_eq!(policy.age_factor(45), 1.0);
        assert_eq!(policy.new_construction_max_age, 10);
    }

    #[test]
    fn test_validation_failures() {
        assert!(ValuationPolicy::builder().annual_growth_rate(-1.0).build().is_err());
        assert!(ValuationPolicy::builder().confidence_cap(0.5).build().is_err());
        assert!(ValuationPolicy::builder().confidence_floor(1.2).build().is_err());
        assert!(ValuationPolicy::builder().confidence_per_comparable(-0.01).build().is_err());
        assert!(ValuationPolicy::builder().new_construction(45, 1.05).build().is_err());
        assert!(ValuationPolicy::builder().fan_power(2.0, 0.0).build().is_err());

        let err = ValuationPolicy::builder()
            .energy_factor(EnergyClass::B, f64::NAN)
            .build()
            .unwrap_err();
        assert!(matches!(err, ValuationError::InvalidPolicy(msg) if msg.contains("class B")));
    }

    #[test]
    fn test_from_json_partial() {
        let policy = ValuationPolicy::from_json(r#"{ "annualGrowthRate": 0.02 }"#).unwrap();
        assert_eq!(policy.annual_growth_rate, 0.02);
        assert_eq!(policy.confidence_cap, 0.90);
        assert_eq!(policy.energy_factors.len(), 5);
    }

    #[test]
    fn test_from_json_energy_table() {
        let policy = ValuationPolicy::from_json(r#"{ "energyFactors": { "A": 1.1, "G": 0.9 } }"#).unwrap();
        assert_eq!(policy.energy_factor(Some(EnergyClass::A)), 1.1);
        assert_eq!(policy.energy_factor(Some(EnergyClass::B)), 1.0);
        assert_eq!(policy.energy_factor(Some(EnergyClass::G)), 0.9);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            ValuationPolicy::from_json("not json"),
            Err(ValuationError::InvalidPolicy(_))
        ));
        assert!(matches!(
            ValuationPolicy::from_json(r#"{ "depreciationFactor": -0.5 }"#),
            Err(ValuationError::InvalidPolicy(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_misspelled_key() {
        let err = ValuationPolicy::from_json(r#"{ "annualGrowthrate": 0.5 }"#).unwrap_err();
        assert!(matches!(err, ValuationError::InvalidPolicy(msg) if msg.contains("annualGrowthrate")));
    }

    #[test]
    fn test_json_roundtrip_of_default() {
        let json = serde_json::to_string(&ValuationPolicy::default()).unwrap();
        assert_eq!(ValuationPolicy::from_json(&json).unwrap(), ValuationPolicy::default());
    }
}
