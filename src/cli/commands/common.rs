//! Helpers shared by the commands that talk to the completion endpoint

use std::sync::Arc;

use promptforge_config::Config;
use promptforge_llm::{CompletionClient, CompletionSettings, HttpTransport};
use promptforge_pipeline::Pipeline;
use promptforge_utils::error::PromptForgeError;
use tracing::debug;

/// Build the pipeline from configuration.
///
/// Resolves the credential first so a missing key is reported before any
/// prompt is shown or any socket is bound.
pub fn build_pipeline(config: &Config) -> Result<Pipeline, PromptForgeError> {
    let settings = CompletionSettings::from_config(config)?;
    let transport = HttpTransport::new()
        .map_err(|e| PromptForgeError::Io(std::io::Error::other(e.to_string())))?;

    debug!(
        endpoint = %settings.endpoint(),
        model = %settings.model(),
        policy = %config.pipeline.on_stage_failure(),
        "Pipeline configured"
    );

    let client = CompletionClient::new(Arc::new(transport), settings);
    Ok(Pipeline::new(client).with_policy(config.pipeline.on_stage_failure()))
}
