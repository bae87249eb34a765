//! Board invariants - sanity checks that detect engine bugs.
//!
//! Moves and spawns keep every cell within bounds, so these should never
//! trigger. They are bug detectors, not gameplay limits.

use crate::game::{Board, MAX_BOARD_SIZE, MAX_EXPONENT, MIN_BOARD_SIZE};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all board invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(board: &Board) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    let size = board.size();
    if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
        violations.push(InvariantViolation {
            message: format!("Board size {size} outside {MIN_BOARD_SIZE}..={MAX_BOARD_SIZE}"),
        });
    }

    if board.cells().len() != size * size {
        violations.push(InvariantViolation {
            message: format!(
                "Board holds {} cells, expected {}",
                board.cells().len(),
                size * size
            ),
        });
    }

    for (coord, value) in board.iter() {
        if value > MAX_EXPONENT {
            violations.push(InvariantViolation {
                message: format!(
                    "Cell at {coord:?} has exponent {value} > max {MAX_EXPONENT}"
                ),
            });
        }
    }

    violations
}

/// Assert all board invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(board: &Board) {
    let violations = check_invariants(board);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Board invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_board: &Board) {}
