//! Station Configuration Module
//!
//! Pump catalog, criteria, model coefficients and sampler tuning loaded from
//! TOML, so nothing about the station is hard-coded inside the engine.
//!
//! ## Loading Order
//!
//! 1. `PUMPFRONT_CONFIG` environment variable (path to TOML file)
//! 2. `station_config.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! ```ignore
//! let config = StationConfig::load();
//! let optimizer = ParetoOptimizer::new(config);
//! ```

mod station_config;
pub mod defaults;
pub mod validation;

pub use station_config::*;
