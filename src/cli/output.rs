//! Output formatting utilities for CLI.

// Allow format! with push_str for readability - the allocation overhead is negligible for CLI output
#![allow(clippy::format_push_string)]
// Rates over episode counts
#![allow(clippy::cast_precision_loss)]

use serde::Serialize;
use tilemerge::rollout::{EpisodeResult, RolloutStats};
use tilemerge::{Board, Termination};

/// Human-readable reason an episode ended.
fn termination_label(termination: Option<Termination>) -> &'static str {
    match termination {
        Some(Termination::NoMovesLeft) => "no moves left",
        Some(Termination::InvalidMoves) => "too many invalid moves",
        None => "step limit",
    }
}

/// Tile value for an exponent, 0 for empty.
fn tile_value(exponent: usize) -> u64 {
    if exponent == 0 {
        0
    } else {
        u32::try_from(exponent)
            .ok()
            .and_then(|e| 1u64.checked_shl(e))
            .unwrap_or(u64::MAX)
    }
}

/// JSON-serializable episode result.
#[derive(Debug, Serialize)]
pub(super) struct JsonEpisodeResult {
    /// Policy that played.
    pub(super) policy: &'static str,
    /// Final result.
    #[serde(flatten)]
    pub(super) result: EpisodeResult,
    /// Largest tile value.
    pub(super) max_tile: u64,
    /// Final board as exponent rows.
    pub(super) board: Vec<Vec<u8>>,
}

impl JsonEpisodeResult {
    /// Create from an episode result and its final board.
    pub(super) fn new(policy: &'static str, result: EpisodeResult, board: &Board) -> Self {
        Self {
            policy,
            result,
            max_tile: result.max_tile(),
            board: (0..board.size()).map(|r| board.row(r).to_vec()).collect(),
        }
    }
}

/// Format an episode result as human-readable text.
pub(super) fn format_episode_text(result: &EpisodeResult, policy: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Episode Result (seed: {})\n", result.seed));
    output.push_str(&format!("  Policy: {policy}\n"));
    output.push_str(&format!("  Score: {}\n", result.score));
    output.push_str(&format!("  Max tile: {}\n", result.max_tile()));
    output.push_str(&format!(
        "  Moves: {} ({} rejected)\n",
        result.steps, result.rejected
    ));
    output.push_str(&format!("  Total reward: {:.2}\n", result.total_reward));
    output.push_str(&format!(
        "  Ended: {}\n",
        termination_label(result.termination)
    ));

    output
}

/// JSON-serializable rollout summary.
#[derive(Debug, Serialize)]
pub(super) struct JsonRolloutResult {
    /// Policy that played.
    pub(super) policy: &'static str,
    /// Episodes completed.
    pub(super) episodes: u64,
    /// Mean final score.
    pub(super) mean_score: f64,
    /// Best final score.
    pub(super) best_score: u64,
    /// Mean moves per episode.
    pub(super) mean_steps: f64,
    /// Mean episode reward.
    pub(super) mean_reward: f64,
    /// Episodes per termination reason.
    pub(super) terminations: JsonTerminations,
    /// Episodes reaching each max tile (non-empty bins only).
    pub(super) max_tiles: Vec<JsonTileCount>,
}

/// Episode counts per termination reason.
#[derive(Debug, Serialize)]
pub(super) struct JsonTerminations {
    /// Full board with no merges.
    pub(super) no_moves_left: u64,
    /// Ended by the invalid-move policy.
    pub(super) invalid_moves: u64,
    /// Cut off by the step limit.
    pub(super) step_limit: u64,
}

/// One histogram bin.
#[derive(Debug, Serialize)]
pub(super) struct JsonTileCount {
    /// Tile value.
    pub(super) tile: u64,
    /// Episodes ending with this max tile.
    pub(super) count: u64,
}

/// Non-empty histogram bins as `(tile, count)`.
fn tile_counts(stats: &RolloutStats) -> impl Iterator<Item = (u64, u64)> + '_ {
    stats
        .histogram
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .map(|(exponent, &count)| (tile_value(exponent), count))
}

impl JsonRolloutResult {
    /// Create from aggregated stats.
    pub(super) fn from_stats(stats: &RolloutStats, policy: &'static str) -> Self {
        Self {
            policy,
            episodes: stats.episodes,
            mean_score: stats.mean_score(),
            best_score: stats.best_score,
            mean_steps: stats.mean_steps(),
            mean_reward: stats.mean_reward(),
            terminations: JsonTerminations {
                no_moves_left: stats.no_moves_left,
                invalid_moves: stats.invalid_moves,
                step_limit: stats.step_limit,
            },
            max_tiles: tile_counts(stats)
                .map(|(tile, count)| JsonTileCount { tile, count })
                .collect(),
        }
    }
}

/// Share of episodes, 0 with none recorded.
fn rate(count: u64, episodes: u64) -> f64 {
    if episodes == 0 {
        0.0
    } else {
        count as f64 / episodes as f64
    }
}

/// Format rollout stats as human-readable text.
pub(super) fn format_rollout_text(stats: &RolloutStats, policy: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Rollout Results ({} episodes, {policy} policy)\n",
        stats.episodes
    ));
    output.push_str(&format!("{}\n\n", "=".repeat(40)));

    output.push_str(&format!("  Mean score:  {:.1}\n", stats.mean_score()));
    output.push_str(&format!("  Best score:  {}\n", stats.best_score));
    output.push_str(&format!("  Mean moves:  {:.1}\n", stats.mean_steps()));
    output.push_str(&format!("  Mean reward: {:.2}\n\n", stats.mean_reward()));

    output.push_str("Terminations:\n");
    output.push_str(&format!("  No moves left: {}\n", stats.no_moves_left));
    output.push_str(&format!("  Invalid moves: {}\n", stats.invalid_moves));
    output.push_str(&format!("  Step limit:    {}\n\n", stats.step_limit));

    output.push_str("Max tile reached:\n");
    for (tile, count) in tile_counts(stats) {
        output.push_str(&format!(
            "  {tile:>6}: {count:>8} ({:>5.1}%)\n",
            rate(count, stats.episodes) * 100.0
        ));
    }

    output
}

/// Format the max-tile histogram as CSV.
pub(super) fn format_rollout_csv(stats: &RolloutStats) -> String {
    let mut output = String::new();

    // Header
    output.push_str("max_tile,episodes,rate\n");

    // Data rows
    for (tile, count) in tile_counts(stats) {
        output.push_str(&format!(
            "{tile},{count},{:.4}\n",
            rate(count, stats.episodes)
        ));
    }

    output
}
