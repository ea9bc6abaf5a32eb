//! CLI command implementations

mod ask;
mod common;
mod config_cmd;
mod serve;

pub use ask::execute_ask_command;
pub use common::build_pipeline;
pub use config_cmd::execute_config_command;
pub use serve::execute_serve_command;
