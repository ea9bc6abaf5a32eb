//! CLI argument definitions and parsing structures

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use promptforge_config::{CliArgs, StageFailurePolicy};
use promptforge_utils::types::LogFormat;

/// promptforge - turn a rough problem statement into an optimized LLM prompt
#[derive(Parser, Debug)]
#[command(name = "promptforge")]
#[command(about = "Three-stage prompt optimization over a chat-completion API")]
#[command(long_about = r#"
promptforge sends a problem statement through three dependent completion calls
(analyze, enrich context, generate optimized prompt) and prints the result.

EXAMPLES:
  # Interactive console
  promptforge ask

  # Non-interactive
  promptforge ask --problem "How do I sort a list?" --no-wait

  # HTTP API on port 8080
  promptforge serve --port 8080

  # Show effective configuration and where each value came from
  promptforge config

CONFIGURATION:
  Configuration is loaded with precedence: CLI flags > config file > defaults
  Config file is discovered by searching upward from CWD for .promptforge/config.toml
  The API key is read from $OPENAI_API_KEY (see --api-key-env) or the user
  secrets file <config_dir>/promptforge/secrets.toml
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log output format (compact or json)
    #[arg(long, global = true, default_value = "compact")]
    pub log_format: LogFormat,

    /// Model identifier sent with every completion request
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Chat-completion endpoint URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Sampling temperature (0.0 to 2.0)
    #[arg(long, global = true)]
    pub temperature: Option<f32>,

    /// Maximum tokens per completion
    #[arg(long, global = true)]
    pub max_tokens: Option<u32>,

    /// HTTP timeout per completion, in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Environment variable holding the API key
    #[arg(long, global = true)]
    pub api_key_env: Option<String>,

    /// What to do when a stage fails: abort or degrade
    #[arg(long, global = true)]
    pub on_stage_failure: Option<StageFailurePolicy>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Prompt for a problem on the console and print the optimized prompt
    Ask {
        /// Problem statement (skips the interactive prompt)
        #[arg(long)]
        problem: Option<String>,

        /// Exit right after printing instead of waiting for Enter
        #[arg(long)]
        no_wait: bool,
    },

    /// Serve the HTTP API
    Serve(ServeArgs),

    /// Print the effective configuration with value sources
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind
    #[arg(long)]
    pub port: Option<u16>,

    /// Serve /api/openapi.json
    #[arg(long)]
    pub openapi: bool,

    /// Allowed CORS origin (repeatable; default allows any)
    #[arg(long = "cors-origin")]
    pub cors_origins: Vec<String>,
}

impl Cli {
    /// Collect configuration overrides from the parsed arguments
    #[must_use]
    pub fn to_cli_args(&self) -> CliArgs {
        let mut args = CliArgs {
            config_path: self.config.clone(),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            timeout_secs: self.timeout_secs,
            api_key_env: self.api_key_env.clone(),
            on_stage_failure: self.on_stage_failure,
            ..CliArgs::default()
        };

        if let Commands::Serve(serve) = &self.command {
            args.host = serve.host.clone();
            args.port = serve.port;
            args.cors_allowed_origins = serve.cors_origins.clone();
            args.openapi = serve.openapi.then_some(true);
        }

        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_overrides_reach_cli_args() {
        let cli = Cli::try_parse_from([
            "promptforge",
            "ask",
            "--model",
            "gpt-4o-mini",
            "--on-stage-failure",
            "degrade",
            "--no-wait",
        ])
        .unwrap();

        let args = cli.to_cli_args();
        assert_eq!(args.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(args.on_stage_failure, Some(StageFailurePolicy::Degrade));
        assert!(args.port.is_none());
        assert!(matches!(cli.command, Commands::Ask { no_wait: true, .. }));
    }

    #[test]
    fn test_serve_flags_reach_cli_args() {
        let cli = Cli::try_parse_from([
            "promptforge",
            "serve",
            "--port",
            "9000",
            "--openapi",
            "--cors-origin",
            "https://a.example",
            "--cors-origin",
            "https://b.example",
        ])
        .unwrap();

        let args = cli.to_cli_args();
        assert_eq!(args.port, Some(9000));
        assert_eq!(args.openapi, Some(true));
        assert_eq!(args.cors_allowed_origins.len(), 2);
    }

    #[test]
    fn test_invalid_policy_is_rejected() {
        let result = Cli::try_parse_from(["promptforge", "--on-stage-failure", "retry", "ask"]);
        assert!(result.is_err());
    }
}
