//! Engine configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::ObservationMode;
use crate::error::{ConfigError, EngineError};
use crate::game::{HeuristicWeights, InvalidMovePolicy, MAX_BOARD_SIZE, MIN_BOARD_SIZE};

/// Construction-time configuration for an [`Engine`](crate::Engine).
///
/// All fields are fixed for the lifetime of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Board edge length.
    pub size: usize,
    /// Observation encoding.
    pub observation: ObservationMode,
    /// Rejected-move penalty and termination policy.
    pub invalid_move: InvalidMovePolicy,
    /// Seed for the spawn RNG. `None` draws a fresh seed.
    pub seed: Option<u64>,
    /// Heuristic reward shaping weights. `None` rewards the merge score only.
    pub heuristic: Option<HeuristicWeights>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            size: 4,
            observation: ObservationMode::OneHot,
            invalid_move: InvalidMovePolicy::default(),
            seed: None,
            heuristic: None,
        }
    }
}

impl EngineConfig {
    /// Check every field is within its supported range.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] describing the first bad field.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.size) {
            return Err(EngineError::InvalidConfig(format!(
                "size {} outside {MIN_BOARD_SIZE}..={MAX_BOARD_SIZE}",
                self.size
            )));
        }

        let policy = &self.invalid_move;
        if !policy.penalty.is_finite() {
            return Err(EngineError::InvalidConfig(
                "invalid_move.penalty must be finite".to_string(),
            ));
        }
        if !policy.threshold.is_finite() || policy.threshold < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "invalid_move.threshold {} must be finite and non-negative",
                policy.threshold
            )));
        }

        if let Some(weights) = &self.heuristic
            && weights.as_array().iter().any(|w| !w.is_finite())
        {
            return Err(EngineError::InvalidConfig(
                "heuristic weights must be finite".to_string(),
            ));
        }

        Ok(())
    }

    /// Parse and validate a JSON configuration.
    ///
    /// Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed JSON and
    /// [`ConfigError::Invalid`] on out-of-range values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`EngineConfig::from_json_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}
