//! Command-line interface for promptforge
//!
//! - `args`: clap argument definitions
//! - `run`: entry point and command dispatch
//! - `commands`: command implementations

pub mod args;
mod commands;
mod run;

pub use args::{Cli, Commands, ServeArgs};
pub use commands::build_pipeline;
pub use run::run;
