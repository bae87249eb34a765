//! Reward strategies for accepted moves.
//!
//! Rejected moves always earn the invalid-move penalty; a shaper only
//! decides the reward of a move that changed the board.

use std::fmt;

use crate::game::{Board, HeuristicWeights, MoveOutcome, evaluate};

/// Everything a shaper may look at after an accepted move.
#[derive(Debug, Clone, Copy)]
pub struct RewardContext<'a> {
    /// Board after the move and the follow-up spawn.
    pub board: &'a Board,
    /// Board before the move.
    pub previous: &'a Board,
    /// Result of the move itself.
    pub outcome: MoveOutcome,
}

/// A pluggable reward function over accepted moves.
pub trait RewardShaper: fmt::Debug + Send {
    /// Reward for the accepted move described by `ctx`.
    fn reward(&self, ctx: &RewardContext<'_>) -> f64;
}

/// Reward equal to the move's merge score.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreReward;

impl RewardShaper for ScoreReward {
    fn reward(&self, ctx: &RewardContext<'_>) -> f64 {
        f64::from(ctx.outcome.score)
    }
}

/// Merge score plus the heuristic value of the resulting board.
///
/// The heuristic is an absolute shaping term, not a difference against the
/// previous board.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicReward {
    weights: HeuristicWeights,
}

impl HeuristicReward {
    /// Create a shaper with the given weights.
    #[must_use]
    pub const fn new(weights: HeuristicWeights) -> Self {
        Self { weights }
    }

    /// The weights in use.
    #[must_use]
    pub const fn weights(&self) -> &HeuristicWeights {
        &self.weights
    }
}

impl RewardShaper for HeuristicReward {
    fn reward(&self, ctx: &RewardContext<'_>) -> f64 {
        f64::from(ctx.outcome.score) + evaluate(ctx.board, ctx.outcome.moved_cells, &self.weights)
    }
}
