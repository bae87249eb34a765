//! Board-transition layer.
//!
//! Implements the sliding-tile rules with no session state:
//! - Board of tile exponents, directions and rotation
//! - Compression, merging and move application
//! - Random tile spawning
//! - Terminal detection and invalid-move policy
//! - Heuristic board valuation

mod board;
mod heuristic;
mod invariants;
mod moves;
mod policy;
mod spawn;

pub use board::{
    Board, Coord, Direction, MAX_BOARD_SIZE, MAX_EXPONENT, MIN_BOARD_SIZE, mergeable,
};
pub use heuristic::{
    HeuristicWeights, effective_moved_cells, empty_cells, evaluate, line_merge_potential,
    line_monotonicity, merge_potential, monotonicity, tile_sum,
};
pub use invariants::{InvariantViolation, assert_invariants, check_invariants};
pub use moves::{Compression, MoveOutcome, apply_move, compress, merge, preview};
pub use policy::InvalidMovePolicy;
pub use spawn::{SPAWN_TWO_PROBABILITY, spawn_tile};
