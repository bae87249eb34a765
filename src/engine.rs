//! Episode session: board, counters, RNG and reward shaping.
//!
//! One [`Engine`] serves one episode at a time. Parallel episodes need
//! independent engines, each with its own seeded RNG.

mod observation;
mod reward;

pub use observation::{ONE_HOT_CHANNELS, Observation, ObservationMode};
pub use reward::{HeuristicReward, RewardContext, RewardShaper, ScoreReward};

use log::{debug, info, trace};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::game::{
    Board, Direction, MAX_EXPONENT, MoveOutcome, apply_move, assert_invariants, spawn_tile,
};
use crate::render;

/// Number of discrete actions.
pub const ACTION_COUNT: usize = 4;

/// Bins in the max-tile histogram (one per exponent).
pub const HISTOGRAM_BINS: usize = MAX_EXPONENT as usize + 1;

/// Mutable per-episode counters.
///
/// Reset to the default at the start of every episode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngineState {
    /// Cumulative merge score of accepted moves.
    pub score: u64,
    /// Invalid-move counter: +1 per rejected move, -1 (floored at 0) per
    /// accepted move.
    pub invalid_count: u32,
    /// Moves attempted, accepted or not.
    pub total_count: u32,
    /// Last accepted direction.
    pub last_action: Option<Direction>,
    /// Merge score of the last accepted move.
    pub last_action_score: u32,
}

/// Why an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The board is full and nothing can merge.
    NoMovesLeft,
    /// Too many rejected moves.
    InvalidMoves,
}

/// Side information returned with every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepInfo {
    /// Cumulative score after the step.
    pub score: u64,
}

/// Result of [`Engine::step`].
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Observation of the board after the step.
    pub observation: Observation,
    /// Shaped reward, or the penalty for a rejected move.
    pub reward: f64,
    /// Whether the episode is over.
    pub done: bool,
    /// Side information.
    pub info: StepInfo,
    /// What the move did to the board.
    pub outcome: MoveOutcome,
    /// Cause of the end of the episode, when `done`.
    pub termination: Option<Termination>,
}

/// A deterministic 2048 episode engine.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    board: Board,
    previous: Board,
    state: EngineState,
    rng: StdRng,
    seed: u64,
    shaper: Box<dyn RewardShaper>,
    histogram: [u64; HISTOGRAM_BINS],
}

impl Engine {
    /// Create an engine and start its first episode.
    ///
    /// Uses [`HeuristicReward`] when `config.heuristic` is set, otherwise
    /// [`ScoreReward`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if the configuration is invalid.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let shaper: Box<dyn RewardShaper> = match config.heuristic {
            Some(weights) => Box::new(HeuristicReward::new(weights)),
            None => Box::new(ScoreReward),
        };
        Self::with_shaper(config, shaper)
    }

    /// Create an engine with a custom reward shaper.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if the configuration is invalid.
    pub fn with_shaper(
        config: EngineConfig,
        shaper: Box<dyn RewardShaper>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let board = Board::new(config.size)?;
        let seed = config.seed.unwrap_or_else(rand::random);

        let mut engine = Self {
            config,
            previous: board.clone(),
            board,
            state: EngineState::default(),
            rng: StdRng::seed_from_u64(seed),
            seed,
            shaper,
            histogram: [0; HISTOGRAM_BINS],
        };
        engine.reset();
        Ok(engine)
    }

    /// Replace the spawn RNG. Returns the seed now in use.
    ///
    /// The current board is kept; the new RNG applies from the next spawn.
    pub fn reseed(&mut self, seed: Option<u64>) -> u64 {
        let seed = seed.unwrap_or_else(rand::random);
        self.rng = StdRng::seed_from_u64(seed);
        self.seed = seed;
        seed
    }

    /// Start a new episode: empty board with two spawned tiles, zeroed
    /// counters.
    ///
    /// If the previous episode took any step, its largest tile is recorded in
    /// the histogram first.
    pub fn reset(&mut self) -> Observation {
        if self.state.total_count > 0 {
            let max = usize::from(self.board.max_exponent());
            if let Some(bin) = self.histogram.get_mut(max) {
                *bin += 1;
            }
        }

        self.state = EngineState::default();
        self.board.clear();
        self.previous.clear();
        spawn_tile(&mut self.board, &mut self.rng);
        spawn_tile(&mut self.board, &mut self.rng);

        debug!(
            "reset: size={} seed={} tiles={}",
            self.config.size,
            self.seed,
            self.board.count_occupied()
        );
        self.observation()
    }

    /// Apply one move.
    ///
    /// A move that changes the board is accepted: a tile spawns, the score
    /// advances and the game-over check runs. Otherwise the board is left
    /// as is, the penalty is returned and the invalid-move policy decides
    /// whether the episode ends.
    pub fn step(&mut self, direction: Direction) -> StepResult {
        self.state.total_count = self.state.total_count.saturating_add(1);
        self.previous.clone_from(&self.board);

        let outcome = apply_move(&mut self.board, direction);

        if !outcome.changed {
            self.state.invalid_count = self.state.invalid_count.saturating_add(1);
            let done = self
                .config
                .invalid_move
                .should_terminate(self.state.invalid_count, self.state.total_count);
            if done {
                info!(
                    "episode ended after {} invalid moves out of {}",
                    self.state.invalid_count, self.state.total_count
                );
            }
            trace!("step {direction}: rejected (invalid_count={})", self.state.invalid_count);

            return StepResult {
                observation: self.observation(),
                reward: self.config.invalid_move.penalty,
                done,
                info: StepInfo {
                    score: self.state.score,
                },
                outcome,
                termination: done.then_some(Termination::InvalidMoves),
            };
        }

        spawn_tile(&mut self.board, &mut self.rng);
        self.state.invalid_count = self.state.invalid_count.saturating_sub(1);
        self.state.last_action = Some(direction);
        self.state.last_action_score = outcome.score;
        self.state.score += u64::from(outcome.score);

        let reward = self.shaper.reward(&RewardContext {
            board: &self.board,
            previous: &self.previous,
            outcome,
        });
        let done = self.board.is_terminal();
        assert_invariants(&self.board);

        trace!(
            "step {direction}: score={} moved={} reward={reward}",
            outcome.score, outcome.moved_cells
        );
        if done {
            debug!(
                "game over: score={} max_tile={}",
                self.state.score,
                1u64 << self.board.max_exponent()
            );
        }

        StepResult {
            observation: self.observation(),
            reward,
            done,
            info: StepInfo {
                score: self.state.score,
            },
            outcome,
            termination: done.then_some(Termination::NoMovesLeft),
        }
    }

    /// Apply the move with action index `action`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidDirection`] for indices outside `0..4`,
    /// leaving the engine untouched.
    pub fn step_index(&mut self, action: u8) -> Result<StepResult, EngineError> {
        let direction = Direction::try_from(action)?;
        Ok(self.step(direction))
    }

    /// Current observation.
    #[must_use]
    pub fn observation(&self) -> Observation {
        Observation::encode(&self.board, self.config.observation)
    }

    /// Shape of every observation this engine produces.
    #[must_use]
    pub const fn observation_shape(&self) -> [usize; 3] {
        self.config.observation.shape(self.config.size)
    }

    /// Render the board as text, headed by the last accepted action.
    #[must_use]
    pub fn render(&self, colored: bool) -> String {
        render::render(&self.board, self.state.last_action, colored)
    }

    /// Current board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Replace the current board, keeping the episode counters.
    ///
    /// Lets hosts resume from a recorded position.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if `board` has a different size
    /// from the engine's.
    pub fn set_board(&mut self, board: Board) -> Result<(), EngineError> {
        if board.size() != self.config.size {
            return Err(EngineError::InvalidConfig(format!(
                "board size {} does not match engine size {}",
                board.size(),
                self.config.size
            )));
        }
        self.previous.clone_from(&self.board);
        self.board = board;
        Ok(())
    }

    /// Board as it was before the latest step.
    #[must_use]
    pub const fn previous_board(&self) -> &Board {
        &self.previous
    }

    /// Per-episode counters.
    #[must_use]
    pub const fn state(&self) -> &EngineState {
        &self.state
    }

    /// Configuration the engine was built with.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Seed of the current RNG.
    #[must_use]
    pub const fn seed_used(&self) -> u64 {
        self.seed
    }

    /// Counts of finished episodes by largest exponent reached.
    ///
    /// There is one bin per exponent `0..=MAX_EXPONENT`. A bin is recorded
    /// by [`Engine::reset`] only when the episode being closed attempted at
    /// least one move, so the reset done by [`Engine::new`] and repeated
    /// resets of an untouched board add nothing.
    #[must_use]
    pub const fn histogram(&self) -> &[u64; HISTOGRAM_BINS] {
        &self.histogram
    }

    /// Zero the max-tile histogram.
    pub fn reset_histogram(&mut self) {
        self.histogram = [0; HISTOGRAM_BINS];
    }
}
