//! Play command implementation.

use super::output::{JsonEpisodeResult, format_episode_text};
use super::{CliError, OutputFormat, PolicyKind};
use tilemerge::rollout::run_episode_with;
use tilemerge::{Engine, EngineConfig};

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the engine cannot be created or output fails.
pub(crate) fn execute(
    config: EngineConfig,
    policy: PolicyKind,
    max_steps: u32,
    format: OutputFormat,
    color: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let mut engine = Engine::new(config)?;
    let mut policy = policy.build(engine.seed_used());
    let verbose = !quiet && format == OutputFormat::Text;

    if verbose {
        println!("Playing with seed {}...", engine.seed_used());
        println!("Policy: {}", policy.name());
    }

    let mut first = verbose;
    let result = run_episode_with(&mut engine, policy.as_mut(), max_steps, |engine, step| {
        if !verbose {
            return;
        }
        if first {
            print!("{}", tilemerge::render::render(engine.previous_board(), None, color));
            first = false;
        }
        if step.outcome.changed {
            print!("{}", engine.render(color));
        }
    });

    match format {
        OutputFormat::Text => {
            if !verbose {
                print!("{}", engine.render(color));
            }
            println!();
            print!("{}", format_episode_text(&result, policy.name()));
        }
        OutputFormat::Json => {
            let json_result = JsonEpisodeResult::new(policy.name(), result, engine.board());
            let json = serde_json::to_string_pretty(&json_result)?;
            println!("{json}");
        }
    }

    Ok(())
}
