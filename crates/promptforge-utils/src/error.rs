use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::exit_codes::ExitCode;

/// Top-level error type for promptforge operations.
///
/// Library crates return their own narrower errors (`ConfigError`,
/// `PipelineError`, ...) which convert into this type at the CLI boundary.
///
/// # Exit Code Mapping
///
/// | Exit Code | Error Type |
/// |-----------|------------|
/// | 2 | Configuration/CLI argument errors |
/// | 70 | Pipeline aborted by a failed stage |
/// | 1 | Other errors |
#[derive(Error, Debug)]
pub enum PromptForgeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Pipeline stage '{stage}' failed: {message}")]
    Pipeline { stage: String, message: String },

    #[error("Server error: {0}")]
    Server(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PromptForgeError {
    /// Map this error to the process exit code used by the CLI
    #[must_use]
    pub fn to_exit_code(&self) -> ExitCode {
        match self {
            Self::Config(_) => ExitCode::CLI_ARGS,
            Self::Pipeline { .. } => ExitCode::LLM_FAILURE,
            Self::Server(_) | Self::Io(_) => ExitCode::INTERNAL,
        }
    }

    /// Error category used to group the report
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_) => ErrorCategory::Configuration,
            Self::Pipeline { .. } => ErrorCategory::Completion,
            Self::Server(_) => ErrorCategory::Server,
            Self::Io(_) => ErrorCategory::Io,
        }
    }

    /// Suggested actions shown under the error in the CLI
    #[must_use]
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config(err) => err.suggestions(),
            Self::Pipeline { .. } => vec![
                "Check network connectivity to the completion endpoint".to_string(),
                "Set [pipeline] on_stage_failure = \"degrade\" to keep going past failed stages"
                    .to_string(),
            ],
            Self::Server(_) => vec!["Check that the configured host and port are free".to_string()],
            Self::Io(_) => Vec::new(),
        }
    }

    /// Render the error with suggestions for terminal output
    #[must_use]
    pub fn display_for_user(&self) -> String {
        let mut out = format!("✗ {self}");
        for suggestion in self.suggestions() {
            out.push_str("\n  → ");
            out.push_str(&suggestion);
        }
        out
    }
}

/// Categories of errors for better organization and handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Completion,
    Server,
    Io,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::Completion => write!(f, "Completion"),
            Self::Server => write!(f, "Server"),
            Self::Io => write!(f, "IO"),
        }
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file {path}: {reason}")]
    InvalidFile { path: PathBuf, reason: String },

    #[error("Invalid value for '{key}': {value}")]
    InvalidValue { key: String, value: String },

    #[error(
        "API credential not found: environment variable '{env_var}' is unset or empty and no user secret is stored"
    )]
    MissingCredential { env_var: String },

    #[error("Configuration discovery failed: {0}")]
    DiscoveryFailed(String),
}

impl ConfigError {
    /// Suggested actions for resolving this error
    #[must_use]
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidFile { .. } => vec![
                "Check the TOML syntax of the configuration file".to_string(),
                "Pass --config to point at a different file".to_string(),
            ],
            Self::InvalidValue { key, .. } => {
                vec![format!("Fix '{key}' in the config file or on the command line")]
            }
            Self::MissingCredential { env_var } => vec![
                format!("Export {env_var}=<your API key>"),
                "Or store it under [openai] api_key in the user secrets file".to_string(),
            ],
            Self::DiscoveryFailed(_) => Vec::new(),
        }
    }
}
