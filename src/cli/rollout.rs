//! Rollout command implementation.

// Episodes per second
#![allow(clippy::cast_precision_loss)]

use super::output::{JsonRolloutResult, format_rollout_csv, format_rollout_text};
use super::{CliError, PolicyKind, RolloutFormat};
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use rayon::prelude::*;
use std::time::Instant;
use tilemerge::rollout::{RolloutStats, run_episode};
use tilemerge::{Engine, EngineConfig, EngineError};

/// Execute the rollout command.
///
/// # Errors
///
/// Returns an error if an engine cannot be built or output fails.
#[allow(clippy::too_many_arguments)]
pub(crate) fn execute(
    config: EngineConfig,
    episodes: u64,
    seed: Option<u64>,
    threads: Option<usize>,
    policy: PolicyKind,
    max_steps: u32,
    format: RolloutFormat,
    progress: bool,
) -> Result<(), CliError> {
    // Set thread pool size if specified
    if let Some(num_threads) = threads
        && let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
    {
        warn!("could not size thread pool: {e}");
    }

    let base_seed = seed.unwrap_or_else(rand::random);
    let policy_name = policy.build(base_seed).name();

    let pb = if progress {
        let pb = ProgressBar::new(episodes);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} episodes ({per_sec})")
            .map_err(|e| CliError::new(format!("invalid progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let stats = run_rollout(config, episodes, base_seed, policy, max_steps, pb.as_ref())?;

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    let episodes_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.episodes as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        RolloutFormat::Text => {
            println!("Base seed: {base_seed}");
            println!();
            print!("{}", format_rollout_text(&stats, policy_name));
            println!();
            println!(
                "Duration: {:.2}s ({:.0} episodes/sec)",
                duration.as_secs_f64(),
                episodes_per_sec
            );
        }
        RolloutFormat::Json => {
            let json_result = JsonRolloutResult::from_stats(&stats, policy_name);
            let json = serde_json::to_string_pretty(&json_result)?;
            println!("{json}");
        }
        RolloutFormat::Csv => {
            print!("{}", format_rollout_csv(&stats));
        }
    }

    Ok(())
}

/// Play `episodes` episodes in parallel, seeding episode `i` with
/// `base_seed + i`.
///
/// Each thread folds into its own [`RolloutStats`]; they are merged at the end.
///
/// # Errors
///
/// Returns the first engine construction error; no partial stats are kept.
fn run_rollout(
    config: EngineConfig,
    episodes: u64,
    base_seed: u64,
    policy: PolicyKind,
    max_steps: u32,
    pb: Option<&ProgressBar>,
) -> Result<RolloutStats, EngineError> {
    (0..episodes)
        .into_par_iter()
        .try_fold(RolloutStats::default, |mut local_stats, i| -> Result<RolloutStats, EngineError> {
            let episode_seed = base_seed.wrapping_add(i);
            let mut engine = Engine::new(EngineConfig {
                seed: Some(episode_seed),
                ..config
            })?;
            let mut episode_policy = policy.build(episode_seed);
            let result = run_episode(&mut engine, episode_policy.as_mut(), max_steps);
            local_stats.add_result(&result);
            if let Some(pb) = pb {
                pb.inc(1);
            }
            Ok(local_stats)
        })
        .try_reduce(RolloutStats::default, |mut a, b| {
            a.merge(&b);
            Ok(a)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(size: usize) -> EngineConfig {
        EngineConfig {
            size,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_rollout_counts_every_episode() {
        let stats = run_rollout(config(3), 12, 100, PolicyKind::Greedy, 50, None).unwrap();
        assert_eq!(stats.episodes, 12);
        assert_eq!(stats.no_moves_left + stats.invalid_moves + stats.step_limit, 12);
        assert_eq!(stats.histogram.iter().sum::<u64>(), 12);
    }

    #[test]
    fn test_rollout_is_seed_deterministic() {
        let first = run_rollout(config(4), 8, 7, PolicyKind::Random, 200, None)
            .map(|s| (s.total_score, s.histogram));
        let second = run_rollout(config(4), 8, 7, PolicyKind::Random, 200, None)
            .map(|s| (s.total_score, s.histogram));
        assert_eq!(first, second);
    }

    #[test]
    fn test_rollout_reports_engine_error() {
        let result = run_rollout(config(1), 4, 0, PolicyKind::Random, 10, None);
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }
}
