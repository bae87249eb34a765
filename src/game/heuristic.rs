//! Heuristic board valuation used to shape rewards.
//!
//! The value is a weighted sum of five terms:
//!
//! ```text
//! empty · empty_cells + merge · merge_potential + monotonicity · monotonicity
//!   + sum · Σ cell^sum_exp − shift · moved_cells
//! ```
//!
//! Every function here is pure over the board.

// Cell counts and exponents are tiny; the float conversions are exact.
#![allow(clippy::cast_precision_loss)]

use serde::{Deserialize, Serialize};

use crate::game::board::Board;

/// Weights and exponents of the heuristic terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicWeights {
    /// Weight of [`merge_potential`].
    pub merge: f64,
    /// Weight of [`empty_cells`].
    pub empty: f64,
    /// Weight of [`monotonicity`].
    pub monotonicity: f64,
    /// Monotonicity exponent. Accepted in configuration; the monotonicity
    /// term is a pair count and does not read it.
    pub monotonicity_exp: f64,
    /// Weight of [`tile_sum`].
    pub sum: f64,
    /// Exponent applied to each cell in [`tile_sum`].
    pub sum_exp: f64,
    /// Weight of the displacement penalty.
    pub shift: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            merge: 0.0,
            empty: 0.0,
            monotonicity: 0.0,
            monotonicity_exp: 1.0,
            sum: 0.0,
            sum_exp: 1.0,
            shift: 0.0,
        }
    }
}

impl HeuristicWeights {
    /// All seven fields, for validation.
    #[must_use]
    pub const fn as_array(&self) -> [f64; 7] {
        [
            self.merge,
            self.empty,
            self.monotonicity,
            self.monotonicity_exp,
            self.sum,
            self.sum_exp,
            self.shift,
        ]
    }
}

/// Number of empty cells.
#[must_use]
pub fn empty_cells(board: &Board) -> usize {
    board.count_empty()
}

/// Merge potential of a single line.
///
/// Each maximal run of equal non-zero values of length `L >= 2` adds
/// `L * value`.
#[must_use]
pub fn line_merge_potential(line: &[u8]) -> u32 {
    let mut count = 0u32;
    let mut merge = 0u32;
    let mut prev = 0u8;

    for &value in line {
        if value != 0 && value == prev {
            count += 1;
        } else if count > 0 {
            merge += (1 + count) * u32::from(prev);
            count = 0;
        }
        prev = value;
    }
    if count > 0 {
        merge += (1 + count) * u32::from(prev);
    }

    merge
}

/// Sum of [`line_merge_potential`] over all rows, then all columns.
#[must_use]
pub fn merge_potential(board: &Board) -> u32 {
    let n = board.size();
    let rows: u32 = (0..n).map(|r| line_merge_potential(board.row(r))).sum();
    let cols: u32 = (0..n).map(|c| line_merge_potential(&board.column(c))).sum();
    rows + cols
}

/// Monotonicity of a single line.
///
/// Only neighbours whose exponents differ by exactly one are counted, as
/// descending (left) or ascending (right). The line scores the larger count.
#[must_use]
pub fn line_monotonicity(line: &[u8]) -> u32 {
    let mut left = 0u32;
    let mut right = 0u32;

    for pair in line.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if a.abs_diff(b) == 1 {
            if a > b {
                left += 1;
            } else {
                right += 1;
            }
        }
    }

    left.max(right)
}

/// Sum of [`line_monotonicity`] over all rows, then all columns.
#[must_use]
pub fn monotonicity(board: &Board) -> u32 {
    let n = board.size();
    let rows: u32 = (0..n).map(|r| line_monotonicity(board.row(r))).sum();
    let cols: u32 = (0..n).map(|c| line_monotonicity(&board.column(c))).sum();
    rows + cols
}

/// `Σ cell^exponent` over every cell, empty cells included.
#[must_use]
pub fn tile_sum(board: &Board, exponent: f64) -> f64 {
    board
        .cells()
        .iter()
        .map(|&v| f64::from(v).powf(exponent))
        .sum()
}

/// Displacement actually charged: nothing while more than three quarters
/// of the board is empty.
#[must_use]
pub fn effective_moved_cells(board: &Board, moved_cells: u32) -> u32 {
    let total = board.cells().len();
    if empty_cells(board) as f64 > total as f64 * 3.0 / 4.0 {
        0
    } else {
        moved_cells
    }
}

/// Weighted heuristic value of `board`.
///
/// `moved_cells` is the displacement count of the move that produced the
/// board.
#[must_use]
pub fn evaluate(board: &Board, moved_cells: u32, weights: &HeuristicWeights) -> f64 {
    let empty = empty_cells(board) as f64;
    let merges = f64::from(merge_potential(board));
    let mono = f64::from(monotonicity(board));
    let sum = tile_sum(board, weights.sum_exp);
    let shifted = f64::from(effective_moved_cells(board, moved_cells));

    weights.empty * empty + weights.merge * merges + weights.monotonicity * mono
        + weights.sum * sum
        - weights.shift * shifted
}
