//! Episode rollouts with simple built-in policies.
//!
//! Provides a pure function interface: `(engine, policy) -> EpisodeResult`,
//! and [`RolloutStats`] to aggregate many results. Stats merge, so callers
//! can fold episodes on several threads and reduce at the end.

// Means over episode counts; precision loss only beyond 2^52 episodes.
#![allow(clippy::cast_precision_loss)]

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::engine::{Engine, HISTOGRAM_BINS, StepResult, Termination};
use crate::game::{Board, Direction, preview};

/// Chooses a direction for the current board.
pub trait Policy: fmt::Debug {
    /// Pick the next move.
    fn choose(&mut self, board: &Board) -> Direction;

    /// Short name for reports.
    fn name(&self) -> &'static str;
}

/// Uniformly random directions from a seeded RNG.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    /// Create a policy seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn choose(&mut self, _board: &Board) -> Direction {
        Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())]
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Takes the accepted move with the largest immediate merge score.
///
/// Ties go to the lowest action index. With no accepted move it plays
/// `Up`, which the engine rejects.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyPolicy;

impl Policy for GreedyPolicy {
    fn choose(&mut self, board: &Board) -> Direction {
        let mut best: Option<(Direction, u32)> = None;
        for direction in Direction::ALL {
            let (_, outcome) = preview(board, direction);
            if outcome.changed && best.is_none_or(|(_, score)| outcome.score > score) {
                best = Some((direction, outcome.score));
            }
        }
        best.map_or(Direction::Up, |(direction, _)| direction)
    }

    fn name(&self) -> &'static str {
        "greedy"
    }
}

/// Final result of one episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpisodeResult {
    /// Seed of the engine's RNG.
    pub seed: u64,
    /// Moves attempted.
    pub steps: u32,
    /// Rejected moves.
    pub rejected: u32,
    /// Final cumulative score.
    pub score: u64,
    /// Largest exponent on the final board.
    pub max_exponent: u8,
    /// Sum of all step rewards.
    pub total_reward: f64,
    /// Why the episode ended; `None` when the step limit was hit.
    pub termination: Option<Termination>,
}

impl EpisodeResult {
    /// Largest tile value on the final board.
    #[must_use]
    pub const fn max_tile(&self) -> u64 {
        1u64 << self.max_exponent
    }
}

/// Play one episode on `engine` with `policy`.
///
/// An engine that has not attempted a move since its last reset (as right
/// after [`Engine::new`]) is played from its current board; otherwise it is
/// reset first. A fresh engine built from `EpisodeResult::seed`, stepped
/// with the same moves, retraces the episode.
///
/// Stops when the engine reports `done` or after `max_steps` moves.
pub fn run_episode(engine: &mut Engine, policy: &mut dyn Policy, max_steps: u32) -> EpisodeResult {
    run_episode_with(engine, policy, max_steps, |_, _| {})
}

/// Like [`run_episode`], calling `on_step` after every step.
pub fn run_episode_with<F>(
    engine: &mut Engine,
    policy: &mut dyn Policy,
    max_steps: u32,
    mut on_step: F,
) -> EpisodeResult
where
    F: FnMut(&Engine, &StepResult),
{
    if engine.state().total_count > 0 {
        engine.reset();
    }

    let mut rejected = 0u32;
    let mut total_reward = 0.0;
    let mut termination = None;

    while engine.state().total_count < max_steps {
        let direction = policy.choose(engine.board());
        let result = engine.step(direction);
        on_step(engine, &result);
        total_reward += result.reward;
        if !result.outcome.changed {
            rejected += 1;
        }
        if result.done {
            termination = result.termination;
            break;
        }
    }

    EpisodeResult {
        seed: engine.seed_used(),
        steps: engine.state().total_count,
        rejected,
        score: engine.state().score,
        max_exponent: engine.board().max_exponent(),
        total_reward,
        termination,
    }
}

/// Aggregated statistics over many episodes.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RolloutStats {
    /// Episodes recorded.
    pub episodes: u64,
    /// Sum of final scores.
    pub total_score: u64,
    /// Best final score.
    pub best_score: u64,
    /// Sum of moves attempted.
    pub total_steps: u64,
    /// Sum of rejected moves.
    pub total_rejected: u64,
    /// Sum of episode rewards.
    pub total_reward: f64,
    /// Episodes by largest exponent reached.
    pub histogram: [u64; HISTOGRAM_BINS],
    /// Episodes ended by a full, merge-less board.
    pub no_moves_left: u64,
    /// Episodes ended by the invalid-move policy.
    pub invalid_moves: u64,
    /// Episodes cut off by the step limit.
    pub step_limit: u64,
}

impl RolloutStats {
    /// Add an episode to the stats.
    pub fn add_result(&mut self, result: &EpisodeResult) {
        self.episodes += 1;
        self.total_score += result.score;
        self.best_score = self.best_score.max(result.score);
        self.total_steps += u64::from(result.steps);
        self.total_rejected += u64::from(result.rejected);
        self.total_reward += result.total_reward;
        if let Some(bin) = self.histogram.get_mut(usize::from(result.max_exponent)) {
            *bin += 1;
        }
        match result.termination {
            Some(Termination::NoMovesLeft) => self.no_moves_left += 1,
            Some(Termination::InvalidMoves) => self.invalid_moves += 1,
            None => self.step_limit += 1,
        }
    }

    /// Merge stats gathered elsewhere into these.
    pub fn merge(&mut self, other: &RolloutStats) {
        self.episodes += other.episodes;
        self.total_score += other.total_score;
        self.best_score = self.best_score.max(other.best_score);
        self.total_steps += other.total_steps;
        self.total_rejected += other.total_rejected;
        self.total_reward += other.total_reward;
        for (bin, count) in self.histogram.iter_mut().zip(other.histogram) {
            *bin += count;
        }
        self.no_moves_left += other.no_moves_left;
        self.invalid_moves += other.invalid_moves;
        self.step_limit += other.step_limit;
    }

    /// Mean final score (0 with no episodes).
    #[must_use]
    pub fn mean_score(&self) -> f64 {
        self.mean(self.total_score as f64)
    }

    /// Mean moves attempted per episode.
    #[must_use]
    pub fn mean_steps(&self) -> f64 {
        self.mean(self.total_steps as f64)
    }

    /// Mean episode reward.
    #[must_use]
    pub fn mean_reward(&self) -> f64 {
        self.mean(self.total_reward)
    }

    fn mean(&self, total: f64) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            total / self.episodes as f64
        }
    }
}
