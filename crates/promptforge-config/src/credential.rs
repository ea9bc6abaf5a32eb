//! Bearer credential resolution
//!
//! Lookup order:
//! 1. The environment variable named by `[llm] api_key_env`
//! 2. `[openai] api_key` in the user secrets file
//!    (`<config_dir>/promptforge/secrets.toml`)
//!
//! Blank values count as absent.

use secrecy::SecretString;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use promptforge_utils::error::ConfigError;

use crate::model::Config;

#[derive(Debug, Deserialize)]
struct UserSecrets {
    openai: Option<OpenAiSecrets>,
}

#[derive(Debug, Deserialize)]
struct OpenAiSecrets {
    api_key: Option<String>,
}

/// Location of the per-user secrets file, if the platform has a config dir
#[must_use]
pub fn user_secrets_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("promptforge").join("secrets.toml"))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn read_secrets_file(path: &Path) -> Result<Option<String>, ConfigError> {
    if !path.is_file() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::InvalidFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let secrets: UserSecrets = toml::from_str(&content).map_err(|e| ConfigError::InvalidFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(non_blank(secrets.openai.and_then(|o| o.api_key)))
}

/// Resolve the credential from an injectable environment lookup and secrets path
pub fn resolve_api_key_with(
    env_var: &str,
    lookup_env: impl Fn(&str) -> Option<String>,
    secrets_path: Option<&Path>,
) -> Result<SecretString, ConfigError> {
    if let Some(key) = non_blank(lookup_env(env_var)) {
        debug!(source = "env", env_var = %env_var, "Resolved API credential");
        return Ok(SecretString::from(key));
    }

    if let Some(path) = secrets_path
        && let Some(key) = read_secrets_file(path)?
    {
        debug!(source = "user_secrets", path = %path.display(), "Resolved API credential");
        return Ok(SecretString::from(key));
    }

    Err(ConfigError::MissingCredential {
        env_var: env_var.to_string(),
    })
}

impl Config {
    /// Resolve the bearer credential from the process environment and user secrets
    pub fn resolve_api_key(&self) -> Result<SecretString, ConfigError> {
        let secrets_path = user_secrets_path();
        resolve_api_key_with(
            self.llm.api_key_env(),
            |name| std::env::var(name).ok(),
            secrets_path.as_deref(),
        )
    }
}
