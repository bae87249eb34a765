//! Invalid-move forgiveness and termination.

use serde::{Deserialize, Serialize};

/// Penalty, warmup and threshold governing rejected moves.
///
/// An episode ends on a rejected move once the invalid counter exceeds both
/// `warmup` and `threshold` times the number of moves attempted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvalidMovePolicy {
    /// Reward returned for a rejected move.
    pub penalty: f64,
    /// Invalid moves tolerated before termination is considered.
    pub warmup: u32,
    /// Fraction of attempted moves that must be invalid to terminate.
    pub threshold: f64,
}

impl Default for InvalidMovePolicy {
    fn default() -> Self {
        Self {
            penalty: -512.0,
            warmup: 16,
            threshold: 0.1,
        }
    }
}

impl InvalidMovePolicy {
    /// Whether a rejected move should end the episode.
    ///
    /// `invalid_count` and `total_count` must already include the move
    /// being judged.
    #[must_use]
    pub fn should_terminate(&self, invalid_count: u32, total_count: u32) -> bool {
        invalid_count > self.warmup
            && f64::from(invalid_count) > self.threshold * f64::from(total_count)
    }
}
