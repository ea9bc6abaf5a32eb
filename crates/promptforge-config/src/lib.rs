//! Configuration management for promptforge
//!
//! Hierarchical configuration with precedence CLI > file > defaults. The
//! configuration file is TOML with `[llm]`, `[pipeline]` and `[server]`
//! sections, discovered by searching upward for `.promptforge/config.toml`.

mod builder;
mod cli_args;
mod credential;
mod discovery;
mod model;
mod sources;
mod validation;

pub use builder::ConfigBuilder;
pub use cli_args::CliArgs;
pub use credential::{resolve_api_key_with, user_secrets_path};
pub use discovery::CONFIG_RELATIVE_PATH;
pub use model::*;
pub use promptforge_utils::error::ConfigError;
pub use promptforge_utils::types::ConfigSource;
