use anyhow::{Context, Result};
use std::io;

use promptforge_config::Config;
use promptforge_utils::exit_codes::ExitCode;

use super::common::build_pipeline;
use crate::console::{ConsoleOptions, ConsoleOutcome, run_console};

/// Execute the `ask` command.
///
/// A failed pipeline has already been printed by the console, so it is
/// reported through the returned exit code rather than as an error.
pub async fn execute_ask_command(config: &Config, options: ConsoleOptions) -> Result<ExitCode> {
    let pipeline = build_pipeline(config)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let outcome = run_console(&pipeline, stdin.lock(), &mut stdout, &options)
        .await
        .context("Console I/O failed")?;

    Ok(match outcome {
        ConsoleOutcome::NoProblem | ConsoleOutcome::Completed => ExitCode::SUCCESS,
        ConsoleOutcome::Failed(_) => ExitCode::LLM_FAILURE,
    })
}
