use promptforge_utils::error::ConfigError;
use promptforge_utils::types::ConfigSource;

use crate::discovery::ATTRIBUTED_KEYS;
use crate::model::{Config, StageFailurePolicy};

impl Config {
    /// Create a builder for programmatic configuration.
    ///
    /// Use this when embedding promptforge and the configuration must not
    /// depend on the working directory or config files.
    ///
    /// ```rust
    /// use promptforge_config::{Config, StageFailurePolicy};
    ///
    /// let config = Config::builder()
    ///     .model("gpt-4o-mini")
    ///     .on_stage_failure(StageFailurePolicy::Degrade)
    ///     .build()
    ///     .expect("valid config");
    /// assert_eq!(config.llm.model(), "gpt-4o-mini");
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Fluent builder for [`Config`].
///
/// Values set here are attributed to [`ConfigSource::Programmatic`].
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    base_url: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    timeout_secs: Option<u64>,
    api_key_env: Option<String>,
    on_stage_failure: Option<StageFailurePolicy>,
    host: Option<String>,
    port: Option<u16>,
    cors_allowed_origins: Vec<String>,
    openapi: Option<bool>,
}

impl ConfigBuilder {
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    #[must_use]
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    #[must_use]
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    #[must_use]
    pub fn api_key_env(mut self, name: impl Into<String>) -> Self {
        self.api_key_env = Some(name.into());
        self
    }

    #[must_use]
    pub fn on_stage_failure(mut self, policy: StageFailurePolicy) -> Self {
        self.on_stage_failure = Some(policy);
        self
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    #[must_use]
    pub fn cors_allowed_origin(mut self, origin: impl Into<String>) -> Self {
        self.cors_allowed_origins.push(origin.into());
        self
    }

    #[must_use]
    pub fn openapi(mut self, enabled: bool) -> Self {
        self.openapi = Some(enabled);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<Config, ConfigError> {
        let mut config = Config::default();
        for key in ATTRIBUTED_KEYS {
            config
                .source_attribution
                .insert((*key).to_string(), ConfigSource::Default);
        }

        let mut set = |key: &str, present: bool| {
            if present {
                config
                    .source_attribution
                    .insert(key.to_string(), ConfigSource::Programmatic);
            }
        };
        set("llm.base_url", self.base_url.is_some());
        set("llm.model", self.model.is_some());
        set("llm.temperature", self.temperature.is_some());
        set("llm.max_tokens", self.max_tokens.is_some());
        set("llm.timeout_secs", self.timeout_secs.is_some());
        set("llm.api_key_env", self.api_key_env.is_some());
        set("pipeline.on_stage_failure", self.on_stage_failure.is_some());
        set("server.host", self.host.is_some());
        set("server.port", self.port.is_some());
        set(
            "server.cors_allowed_origins",
            !self.cors_allowed_origins.is_empty(),
        );
        set("server.openapi", self.openapi.is_some());

        if self.base_url.is_some() {
            config.llm.base_url = self.base_url;
        }
        if self.model.is_some() {
            config.llm.model = self.model;
        }
        if self.temperature.is_some() {
            config.llm.temperature = self.temperature;
        }
        if self.max_tokens.is_some() {
            config.llm.max_tokens = self.max_tokens;
        }
        if self.timeout_secs.is_some() {
            config.llm.timeout_secs = self.timeout_secs;
        }
        if self.api_key_env.is_some() {
            config.llm.api_key_env = self.api_key_env;
        }
        if self.on_stage_failure.is_some() {
            config.pipeline.on_stage_failure = self.on_stage_failure;
        }
        if self.host.is_some() {
            config.server.host = self.host;
        }
        if self.port.is_some() {
            config.server.port = self.port;
        }
        if !self.cors_allowed_origins.is_empty() {
            config.server.cors_allowed_origins = self.cors_allowed_origins;
        }
        if self.openapi.is_some() {
            config.server.openapi = self.openapi;
        }

        config.validate()?;
        Ok(config)
    }
}
