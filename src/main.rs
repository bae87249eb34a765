//! Tilemerge CLI - play and batch-simulate 2048 episodes.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;
use std::process::ExitCode;

/// Tilemerge - A deterministic 2048 engine
#[derive(Parser, Debug)]
#[command(name = "tilemerge")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a single episode with a built-in policy
    Play {
        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Board size (overrides the config file)
        #[arg(long)]
        size: Option<usize>,

        /// Move policy: random or greedy
        #[arg(short, long, default_value = "greedy")]
        policy: cli::PolicyKind,

        /// Engine configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Maximum moves (default: 100000)
        #[arg(short, long, default_value = "100000")]
        max_steps: u32,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Colour tiles in text output
        #[arg(long)]
        color: bool,

        /// Suppress move-by-move output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run many episodes in parallel and aggregate statistics
    Rollout {
        /// Number of episodes to run (default: 1000)
        #[arg(short, long, default_value = "1000")]
        episodes: u64,

        /// Starting seed (increments for each episode)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Board size (overrides the config file)
        #[arg(long)]
        size: Option<usize>,

        /// Move policy: random or greedy
        #[arg(long, default_value = "random")]
        policy: cli::PolicyKind,

        /// Engine configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Maximum moves per episode (default: 100000)
        #[arg(short, long, default_value = "100000")]
        max_steps: u32,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::RolloutFormat,

        /// Show progress bar
        #[arg(long)]
        progress: bool,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Play {
            seed,
            size,
            policy,
            config,
            max_steps,
            format,
            color,
            quiet,
        } => cli::load_config(config.as_deref(), size, seed)
            .and_then(|config| cli::play::execute(config, policy, max_steps, format, color, quiet)),

        Commands::Rollout {
            episodes,
            seed,
            threads,
            size,
            policy,
            config,
            max_steps,
            format,
            progress,
        } => cli::load_config(config.as_deref(), size, None).and_then(|config| {
            cli::rollout::execute(config, episodes, seed, threads, policy, max_steps, format, progress)
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
