use anyhow::Result;

use promptforge_config::Config;
use promptforge_utils::exit_codes::ExitCode;

use super::common::build_pipeline;

/// Execute the `serve` command; runs until Ctrl+C or SIGTERM
pub async fn execute_serve_command(config: &Config) -> Result<ExitCode> {
    let pipeline = build_pipeline(config)?;
    promptforge_server::serve(pipeline, &config.server).await?;
    Ok(ExitCode::SUCCESS)
}
