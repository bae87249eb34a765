//! CLI command implementations for Tilemerge.

pub(crate) mod play;
pub(crate) mod rollout;

mod output;

use clap::ValueEnum;
use std::error::Error;
use std::fmt;
use std::path::Path;

use tilemerge::rollout::{GreedyPolicy, Policy, RandomPolicy};
use tilemerge::{ConfigError, EngineConfig, EngineError};

/// Output format for the `play` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `rollout` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum RolloutFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// Built-in move policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum PolicyKind {
    /// Uniformly random directions.
    Random,
    /// Largest immediate merge score.
    Greedy,
}

impl PolicyKind {
    /// Build the policy, seeding it from `seed` when it is random.
    pub(crate) fn build(self, seed: u64) -> Box<dyn Policy> {
        match self {
            // Decorrelate the policy stream from the spawn stream.
            Self::Random => Box::new(RandomPolicy::new(seed ^ 0x9E37_79B9_7F4A_7C15)),
            Self::Greedy => Box::new(GreedyPolicy),
        }
    }
}

/// Load the engine configuration and apply command-line overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the result is invalid.
pub(crate) fn load_config(
    path: Option<&Path>,
    size: Option<usize>,
    seed: Option<u64>,
) -> Result<EngineConfig, CliError> {
    let mut config = match path {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(size) = size {
        config.size = size;
    }
    if seed.is_some() {
        config.seed = seed;
    }
    config.validate()?;
    Ok(config)
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<EngineError> for CliError {
    fn from(e: EngineError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}
