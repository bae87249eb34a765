//! Random tile injection.

use rand::Rng;

use crate::game::board::{Board, Coord};

/// Probability that a spawned tile has exponent 1 (value 2) rather than 2.
pub const SPAWN_TWO_PROBABILITY: f64 = 0.9;

/// Place a new tile on a uniformly chosen empty cell.
///
/// The tile has exponent 1 with probability [`SPAWN_TWO_PROBABILITY`] and
/// exponent 2 otherwise. Returns the chosen cell, or `None` when the board
/// is full (no-op).
pub fn spawn_tile<R: Rng + ?Sized>(board: &mut Board, rng: &mut R) -> Option<Coord> {
    let empty = board.empty_coords();
    if empty.is_empty() {
        return None;
    }

    let coord = empty[rng.gen_range(0..empty.len())];
    let value = if rng.gen_bool(SPAWN_TWO_PROBABILITY) { 1 } else { 2 };
    board.set(coord, value);
    Some(coord)
}
