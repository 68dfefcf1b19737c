//! Pump catalog entries

use serde::{Deserialize, Serialize};

/// A pump in the station catalog.
///
/// Capacity attributes and the enabled flag are edited by external control
/// only; the engine never changes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pump {
    /// Stable identifier ("pump1")
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Maximum flow (m³/h)
    pub max_flow: f64,
    /// Maximum pressure (atm)
    pub max_pressure: f64,
    /// Rated efficiency (%)
    pub rated_efficiency: f64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Pump {
    pub fn new(id: impl Into<String>, max_flow: f64, max_pressure: f64, rated_efficiency: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            max_flow,
            max_pressure,
            rated_efficiency,
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Name for display, falling back to the id.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    /// Default three-pump station catalog.
    pub fn default_catalog() -> Vec<Pump> {
        vec![
            Pump {
                id: "pump1".to_string(),
                name: "Main pump 1".to_string(),
                max_flow: 120.0,
                max_pressure: 25.0,
                rated_efficiency: 85.0,
                enabled: true,
            },
            Pump {
                id: "pump2".to_string(),
                name: "Main pump 2".to_string(),
                max_flow: 100.0,
                max_pressure: 22.0,
                rated_efficiency: 80.0,
                enabled: true,
            },
            Pump {
                id: "pump3".to_string(),
                name: "Standby pump".to_string(),
                max_flow: 80.0,
                max_pressure: 20.0,
                rated_efficiency: 75.0,
                enabled: false,
            },
        ]
    }
}

/// Partial edit of a pump's capacity attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PumpUpdate {
    pub max_flow: Option<f64>,
    pub max_pressure: Option<f64>,
    pub rated_efficiency: Option<f64>,
}

impl PumpUpdate {
    /// Apply finite fields of the update to `pump`.
    pub fn apply(&self, pump: &mut Pump) {
        if let Some(v) = self.max_flow.filter(|v| v.is_finite()) {
            pump.max_flow = v;
        }
        if let Some(v) = self.max_pressure.filter(|v| v.is_finite()) {
            pump.max_pressure = v;
        }
        if let Some(v) = self.rated_efficiency.filter(|v| v.is_finite()) {
            pump.rated_efficiency = v;
        }
    }
}
