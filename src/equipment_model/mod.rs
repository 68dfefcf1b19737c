//! Equipment Model Module
//!
//! Deterministic calculations mapping an operating configuration to
//! throughput, system efficiency and a composite score. All math here is
//! pure: the only inputs are the configuration, the pump catalog (with its
//! enabled flags) and the model coefficients.

pub mod pump_models;

pub use pump_models::{
    age_factor, composite_score, pressure_derating, pump_efficiency, system_efficiency,
    target_closeness, throughput, wear_factor,
};

use crate::config::ModelCoefficients;
use crate::types::{CriterionKind, EquipmentConfig, ObjectiveVector, Pump};

/// Pump catalog plus coefficients; evaluates configurations into objectives.
#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentModel {
    pumps: Vec<Pump>,
    coefficients: ModelCoefficients,
}

impl EquipmentModel {
    pub fn new(pumps: Vec<Pump>, coefficients: ModelCoefficients) -> Self {
        Self { pumps, coefficients }
    }

    pub fn pumps(&self) -> &[Pump] {
        &self.pumps
    }

    pub fn pumps_mut(&mut self) -> &mut [Pump] {
        &mut self.pumps
    }

    pub fn coefficients(&self) -> &ModelCoefficients {
        &self.coefficients
    }

    pub fn active_pumps(&self) -> impl Iterator<Item = &Pump> {
        self.pumps.iter().filter(|p| p.enabled)
    }

    pub fn active_pump_count(&self) -> usize {
        self.active_pumps().count()
    }

    /// System efficiency (%) of a configuration.
    pub fn system_efficiency(&self, config: &EquipmentConfig) -> f64 {
        system_efficiency(
            &self.pumps,
            config.value(CriterionKind::Wear),
            config.value(CriterionKind::Age),
            config.value(CriterionKind::MaintenanceCost),
            &self.coefficients,
        )
    }

    /// Throughput (m³/h) of a configuration.
    pub fn throughput(&self, config: &EquipmentConfig) -> f64 {
        throughput(
            &self.pumps,
            config.value(CriterionKind::Pressure),
            config.value(CriterionKind::Wear),
            config.value(CriterionKind::Age),
            &self.coefficients,
        )
    }

    /// Full objective vector of a configuration.
    pub fn evaluate(&self, config: &EquipmentConfig, required_productivity: Option<f64>) -> ObjectiveVector {
        let throughput = self.throughput(config);
        let efficiency = self.system_efficiency(config);
        ObjectiveVector {
            throughput,
            efficiency,
            composite: composite_score(throughput, efficiency, required_productivity, &self.coefficients),
        }
    }
}
