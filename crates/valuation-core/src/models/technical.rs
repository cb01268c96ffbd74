//! Building systems data

use serde::{Deserialize, Serialize};

/// Ventilation figures from the building's technical inspection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalData {
    /// Specific fan power in kW per m³/s
    #[serde(default, alias = "sfp_kw_per_m3s", skip_serializing_if = "Option::is_none")]
    pub specific_fan_power: Option<f64>,

    /// Projected air flow in l/s
    #[serde(default, alias = "proj_floede_ls", skip_serializing_if = "Option::is_none")]
    pub projected_flow_ls: Option<f64>,

    /// Measured air flow in l/s
    #[serde(default, alias = "uppm_floede_ls", skip_serializing_if = "Option::is_none")]
    pub measured_flow_ls: Option<f64>,

    #[serde(default, alias = "tilluft_filterklass", skip_serializing_if = "Option::is_none")]
    pub supply_air_filter_class: Option<String>,

    #[serde(default, alias = "franluft_filterklass", skip_serializing_if = "Option::is_none")]
    pub exhaust_air_filter_class: Option<String>,
}

impl TechnicalData {
    /// Technical data carrying only a specific fan power reading
    pub fn with_specific_fan_power(specific_fan_power: f64) -> Self {
        Self {
            specific_fan_power: Some(specific_fan_power),
            ..Default::default()
        }
    }
}
