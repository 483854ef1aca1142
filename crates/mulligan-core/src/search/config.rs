use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_SEARCH_CONFIG_YAML: &str = include_str!("../../config/search.default.yaml");

/// Search configuration recognized by the engine.
///
/// `oracle_blend` and `prior_floor` are deliberately configurable rather
/// than constants: the 0.7/0.3 blend and the legal-move floor come from
/// the system this replaces with no documented derivation, and should not
/// be assumed tuned.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Simulations per decision; the only work bound besides the game's
    /// own turn cap.
    pub simulations: usize,
    /// PUCT exploration constant.
    pub cpuct: f32,
    /// Convex weight on the oracle value when a rollout reaches a real
    /// terminal: `v = oracle_blend * v + (1 - oracle_blend) * outcome`.
    pub oracle_blend: f32,
    /// Floor added to every legal action's masked prior so no legal move
    /// is permanently starved.
    pub prior_floor: f32,
    /// Safety cap on rollout length; the environment's turn-cap terminal
    /// normally triggers first.
    pub max_rollout_steps: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            simulations: 25,
            cpuct: 10.0,
            oracle_blend: 0.7,
            prior_floor: 1e-3,
            max_rollout_steps: 512,
        }
    }
}

impl SearchConfig {
    /// Parse a search config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SearchConfigError> {
        let config: SearchConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a search config from a YAML file path.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, SearchConfigError> {
        let yaml = fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Return the default YAML config included with this crate.
    pub fn default_yaml() -> &'static str {
        DEFAULT_SEARCH_CONFIG_YAML
    }

    /// Parse the default YAML config included with this crate.
    pub fn from_default_yaml() -> Result<Self, SearchConfigError> {
        Self::from_yaml_str(Self::default_yaml())
    }

    pub(crate) fn validate(&self) -> Result<(), SearchConfigError> {
        if self.simulations == 0 {
            return Err(SearchConfigError::Invalid(
                "simulations must be greater than 0".to_string(),
            ));
        }
        if !self.cpuct.is_finite() || self.cpuct <= 0.0 {
            return Err(SearchConfigError::Invalid(
                "cpuct must be finite and > 0".to_string(),
            ));
        }
        if !self.oracle_blend.is_finite() || !(0.0..=1.0).contains(&self.oracle_blend) {
            return Err(SearchConfigError::Invalid(
                "oracle_blend must lie in [0, 1]".to_string(),
            ));
        }
        if !self.prior_floor.is_finite() || self.prior_floor < 0.0 {
            return Err(SearchConfigError::Invalid(
                "prior_floor must be finite and >= 0".to_string(),
            ));
        }
        if self.max_rollout_steps == 0 {
            return Err(SearchConfigError::Invalid(
                "max_rollout_steps must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Error type for loading and validating `SearchConfig`.
#[derive(Debug, Error)]
pub enum SearchConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid search config: {0}")]
    Invalid(String),
}
