//! Per-client completion settings resolved from configuration

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use promptforge_config::{
    Config, ConfigError, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
    DEFAULT_TIMEOUT_SECS,
};

/// Immutable client configuration shared by every completion call.
///
/// Constructed once at startup and passed by reference (or `Arc`) to each
/// call; nothing in it changes per request.
#[derive(Debug, Clone)]
pub struct CompletionSettings {
    endpoint: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
    api_key: SecretString,
}

impl CompletionSettings {
    /// Settings with the default endpoint and request parameters.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingCredential` if `api_key` is blank.
    pub fn new(api_key: SecretString) -> Result<Self, ConfigError> {
        if api_key.expose_secret().trim().is_empty() {
            return Err(ConfigError::MissingCredential {
                env_var: promptforge_config::DEFAULT_API_KEY_ENV.to_string(),
            });
        }
        Ok(Self {
            endpoint: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            api_key,
        })
    }

    /// Build settings from configuration, resolving the credential.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingCredential` if no credential is available.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let api_key = config.resolve_api_key()?;
        Self::from_config_with_key(config, api_key)
    }

    /// Build settings from configuration with an already-resolved credential
    pub fn from_config_with_key(
        config: &Config,
        api_key: SecretString,
    ) -> Result<Self, ConfigError> {
        if api_key.expose_secret().trim().is_empty() {
            return Err(ConfigError::MissingCredential {
                env_var: config.llm.api_key_env().to_string(),
            });
        }
        Ok(Self {
            endpoint: config.llm.base_url().to_string(),
            model: config.llm.model().to_string(),
            temperature: config.llm.temperature(),
            max_tokens: config.llm.max_tokens(),
            timeout: config.llm.timeout(),
            api_key,
        })
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    #[must_use]
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) fn api_key(&self) -> &SecretString {
        &self.api_key
    }
}
