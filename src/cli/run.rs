//! CLI entry point and dispatch logic
//!
//! `run()` parses arguments, initializes logging, discovers configuration,
//! creates the tokio runtime and dispatches to the command handlers. It owns
//! all error output.

use clap::Parser;
use tracing::warn;

use promptforge_config::Config;
use promptforge_error_redaction::redact_error_message;
use promptforge_utils::error::PromptForgeError;
use promptforge_utils::exit_codes::ExitCode;
use promptforge_utils::logging::init_tracing;

use super::args::{Cli, Commands};
use super::commands;
use crate::console::ConsoleOptions;

/// Main CLI execution function.
///
/// Returns `Err(ExitCode)` after printing the error; `main` only maps the
/// code to the process exit status.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose, cli.log_format) {
        eprintln!("warning: failed to initialize logging: {e}");
    }

    let cli_args = cli.to_cli_args();
    let config = match Config::discover(&cli_args) {
        Ok(config) => config,
        Err(err) => {
            let err = PromptForgeError::from(err);
            eprintln!("{}", err.display_for_user());
            return Err(err.to_exit_code());
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("✗ Failed to create async runtime: {e}");
            return Err(ExitCode::INTERNAL);
        }
    };

    let result = rt.block_on(async {
        match cli.command {
            Commands::Ask { problem, no_wait } => {
                commands::execute_ask_command(&config, ConsoleOptions { problem, no_wait }).await
            }
            Commands::Serve(_) => commands::execute_serve_command(&config).await,
            Commands::Config { json } => commands::execute_config_command(&config, json),
        }
    });

    match result {
        Ok(code) if code == ExitCode::SUCCESS => Ok(()),
        Ok(code) => Err(code),
        Err(error) => {
            if let Some(err) = error.downcast_ref::<PromptForgeError>() {
                warn!(category = %err.category(), "Command failed");
                eprintln!("{}", redact_error_message(&err.display_for_user()));
                return Err(err.to_exit_code());
            }
            let message = redact_error_message(&format!("{error:#}"));
            warn!(error = %message, "Command failed");
            eprintln!("✗ Unexpected error: {message}");
            eprintln!("\n  Run with --verbose for more detailed output");
            Err(ExitCode::INTERNAL)
        }
    }
}
