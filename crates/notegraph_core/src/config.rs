//! Tunable constants for layout physics and viewport interaction.
//!
//! # Responsibility
//! - Hold every physics and interaction constant in one serde-friendly shape.
//! - Load overrides from JSON and reject values that break the simulation.
//!
//! # Invariants
//! - Every field has a default, so partial JSON documents are accepted.
//! - A validated config keeps `0 < damping < 1` and `min_scale < max_scale`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Error raised while loading or validating a config document.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Physics constants for the force simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Coulomb-like repulsion numerator.
    pub repulsion: f64,
    /// Spring stiffness, multiplied by connection strength.
    pub spring_k: f64,
    /// Spring rest length in simulation units.
    pub rest_length: f64,
    /// Pull toward the viewport centre per unit of offset.
    pub centering: f64,
    /// Velocity multiplier per step; must stay in `(0, 1)`.
    pub damping: f64,
    /// Distance floor for repulsion and spring direction.
    pub min_distance: f64,
    /// Speed cap per step.
    pub max_speed: f64,
    /// Inner margin of the viewport rectangle nodes are clamped to.
    pub padding: f64,
    /// Steps of motion after a full reheat.
    pub max_heat: u32,
    /// Heat granted when a dragged node is released.
    pub release_heat: u32,
    /// Placement circle radius as a fraction of the minor viewport side.
    pub placement_radius_ratio: f64,
    /// Maximum placement jitter per axis.
    pub jitter: f64,
    /// Seed for placement jitter.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            repulsion: 5000.0,
            spring_k: 0.02,
            rest_length: 120.0,
            centering: 0.005,
            damping: 0.85,
            min_distance: 10.0,
            max_speed: 20.0,
            padding: 40.0,
            max_heat: 300,
            release_heat: 60,
            placement_radius_ratio: 0.3,
            jitter: 10.0,
            seed: 0x5eed,
        }
    }
}

impl SimulationConfig {
    /// Rejects constants that make the integration unstable or meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("repulsion", self.repulsion),
            ("spring_k", self.spring_k),
            ("rest_length", self.rest_length),
            ("min_distance", self.min_distance),
            ("max_speed", self.max_speed),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "simulation.{name} must be a positive number, got {value}"
                )));
            }
        }
        let non_negative = [
            ("centering", self.centering),
            ("padding", self.padding),
            ("placement_radius_ratio", self.placement_radius_ratio),
            ("jitter", self.jitter),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "simulation.{name} must be non-negative, got {value}"
                )));
            }
        }
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "simulation.damping must be in (0, 1), got {}",
                self.damping
            )));
        }
        if self.release_heat > self.max_heat {
            return Err(ConfigError::Invalid(format!(
                "simulation.release_heat ({}) must not exceed max_heat ({})",
                self.release_heat, self.max_heat
            )));
        }
        Ok(())
    }
}

/// Viewport interaction constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    /// Factor applied by programmatic zoom in/out.
    pub zoom_step: f64,
    /// Wheel delta to zoom exponent conversion.
    pub wheel_sensitivity: f64,
    /// Hit radius around a node centre, in simulation units.
    pub node_radius: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.25,
            max_scale: 4.0,
            zoom_step: 1.2,
            wheel_sensitivity: 0.001,
            node_radius: 12.0,
        }
    }
}

impl InteractionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_scale > 0.0 && self.min_scale < self.max_scale) {
            return Err(ConfigError::Invalid(format!(
                "interaction scale range [{}, {}] is empty or non-positive",
                self.min_scale, self.max_scale
            )));
        }
        if !(self.zoom_step > 1.0) {
            return Err(ConfigError::Invalid(format!(
                "interaction.zoom_step must be > 1, got {}",
                self.zoom_step
            )));
        }
        if !(self.wheel_sensitivity > 0.0 && self.node_radius >= 0.0) {
            return Err(ConfigError::Invalid(
                "interaction.wheel_sensitivity must be > 0 and node_radius >= 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Top-level graph configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub simulation: SimulationConfig,
    pub interaction: InteractionConfig,
}

impl GraphConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()?;
        self.interaction.validate()
    }
}
