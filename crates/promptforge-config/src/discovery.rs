use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use promptforge_utils::error::ConfigError;
use promptforge_utils::types::ConfigSource;

use crate::cli_args::CliArgs;
use crate::model::{Config, LlmConfig, PipelineConfig, ServerConfig};

/// Config file location relative to a project directory
pub const CONFIG_RELATIVE_PATH: &str = ".promptforge/config.toml";

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct TomlConfig {
    pub(crate) llm: Option<LlmConfig>,
    pub(crate) pipeline: Option<PipelineConfig>,
    pub(crate) server: Option<ServerConfig>,
}

/// Keys tracked for source attribution
pub(crate) const ATTRIBUTED_KEYS: &[&str] = &[
    "llm.base_url",
    "llm.model",
    "llm.temperature",
    "llm.max_tokens",
    "llm.timeout_secs",
    "llm.api_key_env",
    "pipeline.on_stage_failure",
    "server.host",
    "server.port",
    "server.cors_allowed_origins",
    "server.openapi",
];

/// Overwrite `target` when `value` is set, recording where it came from
fn overlay<T>(
    target: &mut Option<T>,
    value: Option<T>,
    key: &str,
    source: ConfigSource,
    attribution: &mut HashMap<String, ConfigSource>,
) {
    if let Some(value) = value {
        *target = Some(value);
        attribution.insert(key.to_string(), source);
    }
}

impl Config {
    /// Discover and load configuration with precedence: CLI > file > defaults
    ///
    /// Uses the current working directory as the starting point for discovery.
    pub fn discover(cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let start_dir = std::env::current_dir().map_err(|e| {
            ConfigError::DiscoveryFailed(format!("Failed to get current directory: {e}"))
        })?;
        Self::discover_from(&start_dir, cli_args)
    }

    /// Discover and load configuration starting from a specific directory
    ///
    /// Path-driven variant used by tests to avoid process-global state.
    pub fn discover_from(start_dir: &Path, cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = Config::default();
        for key in ATTRIBUTED_KEYS {
            config
                .source_attribution
                .insert((*key).to_string(), ConfigSource::Default);
        }

        let config_path = match &cli_args.config_path {
            Some(explicit) => Some(explicit.clone()),
            None => Self::discover_config_file_from(start_dir),
        };

        if let Some(path) = &config_path {
            debug!(path = %path.display(), "Loading configuration file");
            let file_config = Self::load_config_file(path)?;
            config.apply_file(file_config);
        }

        config.apply_cli(cli_args);
        config.validate()?;
        Ok(config)
    }

    /// Search upward from `start_dir` for `.promptforge/config.toml`
    #[must_use]
    pub fn discover_config_file_from(start_dir: &Path) -> Option<PathBuf> {
        start_dir
            .ancestors()
            .map(|dir| dir.join(CONFIG_RELATIVE_PATH))
            .find(|candidate| candidate.is_file())
    }

    pub(crate) fn load_config_file(path: &Path) -> Result<TomlConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::InvalidFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::InvalidFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn apply_file(&mut self, file: TomlConfig) {
        let source = ConfigSource::Config;
        let attribution = &mut self.source_attribution;

        if let Some(llm) = file.llm {
            overlay(
                &mut self.llm.base_url,
                llm.base_url,
                "llm.base_url",
                source,
                attribution,
            );
            overlay(
                &mut self.llm.model,
                llm.model,
                "llm.model",
                source,
                attribution,
            );
            overlay(
                &mut self.llm.temperature,
                llm.temperature,
                "llm.temperature",
                source,
                attribution,
            );
            overlay(
                &mut self.llm.max_tokens,
                llm.max_tokens,
                "llm.max_tokens",
                source,
                attribution,
            );
            overlay(
                &mut self.llm.timeout_secs,
                llm.timeout_secs,
                "llm.timeout_secs",
                source,
                attribution,
            );
            overlay(
                &mut self.llm.api_key_env,
                llm.api_key_env,
                "llm.api_key_env",
                source,
                attribution,
            );
        }

        if let Some(pipeline) = file.pipeline {
            overlay(
                &mut self.pipeline.on_stage_failure,
                pipeline.on_stage_failure,
                "pipeline.on_stage_failure",
                source,
                attribution,
            );
        }

        if let Some(server) = file.server {
            overlay(
                &mut self.server.host,
                server.host,
                "server.host",
                source,
                attribution,
            );
            overlay(
                &mut self.server.port,
                server.port,
                "server.port",
                source,
                attribution,
            );
            overlay(
                &mut self.server.openapi,
                server.openapi,
                "server.openapi",
                source,
                attribution,
            );
            if !server.cors_allowed_origins.is_empty() {
                self.server.cors_allowed_origins = server.cors_allowed_origins;
                attribution.insert("server.cors_allowed_origins".to_string(), source);
            }
        }
    }

    fn apply_cli(&mut self, cli: &CliArgs) {
        let source = ConfigSource::Cli;
        let attribution = &mut self.source_attribution;

        overlay(
            &mut self.llm.base_url,
            cli.base_url.clone(),
            "llm.base_url",
            source,
            attribution,
        );
        overlay(
            &mut self.llm.model,
            cli.model.clone(),
            "llm.model",
            source,
            attribution,
        );
        overlay(
            &mut self.llm.temperature,
            cli.temperature,
            "llm.temperature",
            source,
            attribution,
        );
        overlay(
            &mut self.llm.max_tokens,
            cli.max_tokens,
            "llm.max_tokens",
            source,
            attribution,
        );
        overlay(
            &mut self.llm.timeout_secs,
            cli.timeout_secs,
            "llm.timeout_secs",
            source,
            attribution,
        );
        overlay(
            &mut self.llm.api_key_env,
            cli.api_key_env.clone(),
            "llm.api_key_env",
            source,
            attribution,
        );
        overlay(
            &mut self.pipeline.on_stage_failure,
            cli.on_stage_failure,
            "pipeline.on_stage_failure",
            source,
            attribution,
        );
        overlay(
            &mut self.server.host,
            cli.host.clone(),
            "server.host",
            source,
            attribution,
        );
        overlay(
            &mut self.server.port,
            cli.port,
            "server.port",
            source,
            attribution,
        );
        overlay(
            &mut self.server.openapi,
            cli.openapi,
            "server.openapi",
            source,
            attribution,
        );
        if !cli.cors_allowed_origins.is_empty() {
            self.server.cors_allowed_origins = cli.cors_allowed_origins.clone();
            attribution.insert("server.cors_allowed_origins".to_string(), source);
        }
    }
}
