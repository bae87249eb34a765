//! Error types for the engine and its configuration.

use std::io;
use std::path::PathBuf;

/// Errors raised by engine construction and caller input validation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A direction index outside `0..4`.
    #[error("invalid direction index {0} (expected 0..=3)")]
    InvalidDirection(u8),
    /// A configuration value outside its supported range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors raised while loading an engine configuration file.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The file is not valid configuration JSON.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// The configuration parsed but holds unsupported values.
    #[error(transparent)]
    Invalid(#[from] EngineError),
}
