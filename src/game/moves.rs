//! Move application: rotate, compress, merge, compress, rotate back.
//!
//! Every direction reuses one algorithm. The board is rotated so the
//! requested direction faces row 0, each column is slid toward row 0,
//! adjacent equal tiles are combined once, and the gaps closed again.

use crate::game::board::{Board, Direction, mergeable};

/// Result of one compression pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Compression {
    /// Whether any cell changed position.
    pub changed: bool,
    /// Number of cells whose row index strictly changed.
    pub moved_cells: u32,
}

/// Result of applying one move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Whether the move changed the board (slid or merged anything).
    pub changed: bool,
    /// Sum of the exponents produced by merges.
    pub score: u32,
    /// Displacement count of the most recent compression pass.
    pub moved_cells: u32,
}

/// Slide every non-zero cell toward row 0, column by column, keeping order.
pub fn compress(board: &mut Board) -> Compression {
    let n = board.size();
    let mut moved_cells = 0u32;

    for col in 0..n {
        let mut target = 0;
        for row in 0..n {
            let value = board.at(row, col);
            if value == 0 {
                continue;
            }
            if target != row {
                *board.at_mut(target, col) = value;
                *board.at_mut(row, col) = 0;
                moved_cells += 1;
            }
            target += 1;
        }
    }

    Compression {
        changed: moved_cells > 0,
        moved_cells,
    }
}

/// Combine vertically adjacent equal tiles into the upper cell.
///
/// Returns the sum of the new exponents. The lower cell of a merged pair
/// is zeroed before it is compared again, so no cell merges twice.
pub fn merge(board: &mut Board) -> u32 {
    let n = board.size();
    let mut score = 0u32;

    for col in 0..n {
        for row in 0..n - 1 {
            let upper = board.at(row, col);
            if mergeable(upper, board.at(row + 1, col)) {
                *board.at_mut(row, col) = upper + 1;
                *board.at_mut(row + 1, col) = 0;
                score += u32::from(upper + 1);
            }
        }
    }

    score
}

/// Apply `direction` to `board` in place.
///
/// On a no-op move the board is left untouched and `changed` is false.
pub fn apply_move(board: &mut Board, direction: Direction) -> MoveOutcome {
    let turns = direction.index();
    let mut view = board.rotated(turns);

    let first = compress(&mut view);
    let score = merge(&mut view);
    let changed = first.changed || score > 0;
    if !changed {
        return MoveOutcome {
            changed,
            score,
            moved_cells: first.moved_cells,
        };
    }

    let second = compress(&mut view);
    *board = view.rotated((4 - turns) % 4);

    MoveOutcome {
        changed,
        score,
        moved_cells: second.moved_cells,
    }
}

/// Compute the board `direction` would produce without touching `board`.
#[must_use]
pub fn preview(board: &Board, direction: Direction) -> (Board, MoveOutcome) {
    let mut next = board.clone();
    let outcome = apply_move(&mut next, direction);
    (next, outcome)
}
