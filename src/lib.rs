//! promptforge - three-stage prompt optimization over a chat-completion API
//!
//! A problem statement goes through three dependent completion calls:
//!
//! ```text
//! Analyze → EnrichContext → GenerateOptimizedPrompt
//! ```
//!
//! The result is exposed through a console front-end (`promptforge ask`) and
//! an HTTP API (`promptforge serve`).
//!
//! # Library use
//!
//! ```rust,no_run
//! use promptforge::{CliArgs, Config};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::discover(&CliArgs::default())?;
//! let pipeline = promptforge::cli::build_pipeline(&config)?;
//! let result = pipeline.run("How do I sort a list?").await?;
//! println!("{}", result.optimized_prompt);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod console;

pub use promptforge_config::{CliArgs, Config, ConfigBuilder, StageFailurePolicy};
pub use promptforge_llm::{
    ChatTransport, CompletionClient, CompletionFailure, CompletionOutcome, CompletionSettings,
    HttpTransport,
};
pub use promptforge_pipeline::{Pipeline, PipelineError, PipelineResult, Stage};
pub use promptforge_utils::error::{ConfigError, PromptForgeError};
pub use promptforge_utils::exit_codes::ExitCode;
