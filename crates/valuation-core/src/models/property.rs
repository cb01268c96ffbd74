//! Subject property attributes

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ensure_positive_area;
use crate::error::{InputSubject, Result};

/// Energy-performance letter grade
///
/// Only grades with an entry in the policy's multiplier table affect the
/// estimate; the rest are neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EnergyClass {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl EnergyClass {
    /// Parse a grade from raw register text
    ///
    /// Surrounding whitespace and case are ignored. Returns `None` for
    /// anything that is not a single known letter.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            "E" => Some(Self::E),
            "F" => Some(Self::F),
            "G" => Some(Self::G),
            _ => None,
        }
    }
}

impl fmt::Display for EnergyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
            Self::G => "G",
        };
        f.write_str(letter)
    }
}

/// Static attributes of the property being valued
///
/// The energy-performance, radon, and ventilation-inspection fields are
/// carried through untouched; the current calculation does not read them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetails {
    /// Raw energy class text as supplied by the register
    #[serde(default, alias = "energiklass", skip_serializing_if = "Option::is_none")]
    pub energy_class: Option<String>,

    /// Year of original construction
    #[serde(alias = "byggnadsar")]
    pub building_year: i32,

    /// Living area in square meters
    pub living_area: f64,

    #[serde(default, alias = "primarenergital", skip_serializing_if = "Option::is_none")]
    pub primary_energy_number: Option<String>,

    #[serde(default, alias = "energiprestanda", skip_serializing_if = "Option::is_none")]
    pub energy_performance: Option<String>,

    #[serde(default, alias = "radonmatning", skip_serializing_if = "Option::is_none")]
    pub radon_measurement: Option<String>,

    #[serde(default, alias = "ventilationskontroll", skip_serializing_if = "Option::is_none")]
    pub ventilation_inspection: Option<String>,
}

impl PropertyDetails {
    /// Create property details, rejecting a non-positive living area
    pub fn new(building_year: i32, living_area: f64) -> Result<Self> {
        ensure_positive_area(InputSubject::Property, living_area)?;

        Ok(Self {
            energy_class: None,
            building_year,
            living_area,
            primary_energy_number: None,
            energy_performance: None,
            radon_measurement: None,
            ventilation_inspection: None,
        })
    }

    /// Set the raw energy class text
    pub fn with_energy_class(mut self, energy_class: impl Into<String>) -> Self {
        self.energy_class = Some(energy_class.into());
        self
    }





    /// Parsed energy grade, if the raw text names a known one
    pub fn energy_grade(&self) -> Option<EnergyClass> {
        self.energy_class.as_deref().and_then(EnergyClass::parse)
    }

    /// Check the invariants the engine relies on
    pub fn validate(&self) -> Result<()> {
        ensure_positive_area(InputSubject::Property, self.living_area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValuationError;

    #[test]
    fn test_parse_energy_class() {
        assert_eq!(EnergyClass::parse("A"), Some(EnergyClass::A));
        assert_eq!(EnergyClass::parse(" d "), Some(EnergyClass::D));
        assert_eq!(EnergyClass::parse("g"), Some(EnergyClass::G));
        assert_eq!(EnergyClass::parse("A+"), None);
        assert_eq!(EnergyClass::parse(""), None);
        assert_eq!(EnergyClass::parse("unknown"), None);
    }

    #[test]
    fn test_energy_class_display() {
        assert_eq!(EnergyClass::B.to_string(), "B");
    }

    #[test]
    fn test_new_rejects_bad_area() {
        let err = PropertyDetails::new(1990, 0.0).unwrap_err();
        assert_eq!(
            err,
            ValuationError::InvalidArea {
                subject: InputSubject::Property,
                value: 0.0
            }
        );
    }

    #[test]
    fn test_builder_and_grade() {
        let details = PropertyDetails::new(2001, 82.5)
            .unwrap()
            .with_energy_class("b");

        assert_eq!(details.energy_grade(), Some(EnergyClass::B));
        assert!(details.radon_measurement.is_none());
        assert!(details.validate().is_ok());
    }

    #[test]
    fn test_deserialize_register_keys() {
        let json = r#"{
            "energiklass": "C",
            "byggnadsar": 1968,
            "livingArea": 64.0,
            "radonmatning": "ok",
            "ventilationskontroll": "godkänd"
        }"#;
        let details: PropertyDetails = serde_json::from_str(json).unwrap();

        assert_eq!(details.energy_grade(), Some(EnergyClass::C));
        assert_eq!(details.building_year, 1968);
        assert_eq!(details.ventilation_inspection.as_deref(), Some("godkänd"));
    }

    #[test]
    fn test_missing_energy_class_deserializes() {
        let json = r#"{ "buildingYear": 1930, "livingArea": 40.0 }"#;
        let details: PropertyDetails = serde_json::from_str(json).unwrap();

        assert!(details.energy_class.is_none());
        assert!(details.energy_grade().is_none());
    }
}
