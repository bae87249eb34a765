// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Tilemerge: a deterministic 2048 board-transition engine.
//!
//! This crate provides a sliding-tile engine designed for:
//! - Bit-exact reproducible episodes from a seed
//! - Reinforcement-learning hosts (`reset` / `step` / observation tensors)
//! - Pluggable reward shaping, including a multi-term board heuristic
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │     Rollouts / CLI host             │
//! ├─────────────────────────────────────┤
//! │     Engine session                  │
//! │     (state, RNG, reward shaping)    │
//! ├─────────────────────────────────────┤
//! │     Board transitions               │
//! │     (moves, spawn, heuristic)       │
//! └─────────────────────────────────────┘
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod render;
pub mod rollout;

pub use config::EngineConfig;
pub use error::{ConfigError, EngineError};

// Re-export key types at crate root for convenience
pub use engine::{
    ACTION_COUNT, Engine, EngineState, Observation, ObservationMode, StepInfo, StepResult,
    Termination,
};
pub use game::{Board, Coord, Direction, HeuristicWeights, InvalidMovePolicy, MoveOutcome};
