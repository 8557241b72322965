//! # Service Configuration Module
//!
//! Loads service-level settings from environment variables, with defaults
//! where a value is optional.
//!
//! ## Environment Variables
//!
//! - `LOG_LEVEL`: logging level (default: "info")
//! - `SCORE_WORKING_HOURS_WEIGHT`: weight of the working-hour fit sub-score
//!   (default: 1.0)
//! - `SCORE_DISRUPTION_WEIGHT`: weight of the disruption sub-score
//!   (default: 1.0)
//! - `SCORE_VEHICLE_WEIGHT`: weight of the vehicle-compatibility sub-score
//!   (default: 1.0)

use eyre::Result;
use fleetops_core::scoring::WeightedScoringPolicy;
use std::env;
use tracing::Level;

/// Configuration for the fleetops service layer.
#[derive(Debug, Clone)]
pub struct OpsConfig {
    /// Log level for the application
    pub log_level: Level,

    /// Replacement scoring weights
    pub working_hours_weight: f64,
    pub disruption_weight: f64,
    pub vehicle_weight: f64,
}

impl Default for OpsConfig {
    fn default() -> Self {
        Self {
            log_level: Level::INFO,
            working_hours_weight: 1.0,
            disruption_weight: 1.0,
            vehicle_weight: 1.0,
        }
    }
}

impl OpsConfig {
    /// Creates an OpsConfig from environment variables, falling back to the
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let log_level = match env::var("LOG_LEVEL")
            .unwrap_or_else(|_| "info".to_string())
            .as_str()
        {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        let working_hours_weight = env::var("SCORE_WORKING_HOURS_WEIGHT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.working_hours_weight);
        let disruption_weight = env::var("SCORE_DISRUPTION_WEIGHT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.disruption_weight);
        let vehicle_weight = env::var("SCORE_VEHICLE_WEIGHT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.vehicle_weight);

        Ok(Self {
            log_level,
            working_hours_weight,
            disruption_weight,
            vehicle_weight,
        })
    }

    /// The weighted scoring policy described by this configuration.
    pub fn scoring_policy(&self) -> WeightedScoringPolicy {
        WeightedScoringPolicy {
            working_hours_weight: self.working_hours_weight,
            disruption_weight: self.disruption_weight,
            vehicle_weight: self.vehicle_weight,
        }
    }
}
