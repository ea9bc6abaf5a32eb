use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use promptforge_utils::types::ConfigSource;

/// Default chat-completion endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";
/// Default model identifier sent with every request
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 2048;
/// Default per-request transport timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 100;
/// Environment variable holding the bearer credential
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

/// What the pipeline does when a stage's completion fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageFailurePolicy {
    /// Stop at the first failed stage and report it (default)
    #[default]
    Abort,
    /// Use the failure's diagnostic text as the stage output and keep going
    Degrade,
}

impl fmt::Display for StageFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abort => write!(f, "abort"),
            Self::Degrade => write!(f, "degrade"),
        }
    }
}

impl FromStr for StageFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abort" => Ok(Self::Abort),
            "degrade" => Ok(Self::Degrade),
            other => Err(format!(
                "Unknown stage failure policy '{other}'. Expected 'abort' or 'degrade'."
            )),
        }
    }
}

/// Configuration for promptforge.
///
/// Build it with [`Config::discover`] for CLI semantics, or with
/// [`Config::builder`] when embedding.
///
/// ```toml
/// [llm]
/// base_url = "https://api.openai.com/v1/chat/completions"
/// model = "gpt-3.5-turbo"
/// temperature = 0.7
/// max_tokens = 2048
/// timeout_secs = 100
/// api_key_env = "OPENAI_API_KEY"
///
/// [pipeline]
/// on_stage_failure = "abort"
///
/// [server]
/// host = "127.0.0.1"
/// port = 8080
/// cors_allowed_origins = []
/// openapi = false
/// ```
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Completion endpoint and request parameters.
    pub llm: LlmConfig,
    /// Pipeline behavior.
    pub pipeline: PipelineConfig,
    /// HTTP front-end settings.
    pub server: ServerConfig,
    /// Source attribution for each setting, keyed by `section.key`.
    pub source_attribution: HashMap<String, ConfigSource>,
}

/// `[llm]` section
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout_secs: Option<u64>,
    /// Name of the environment variable holding the bearer credential
    pub api_key_env: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: Some(DEFAULT_BASE_URL.to_string()),
            model: Some(DEFAULT_MODEL.to_string()),
            temperature: Some(DEFAULT_TEMPERATURE),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            api_key_env: Some(DEFAULT_API_KEY_ENV.to_string()),
        }
    }
}

impl LlmConfig {
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    #[must_use]
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    #[must_use]
    pub fn temperature(&self) -> f32 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    #[must_use]
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    #[must_use]
    pub fn api_key_env(&self) -> &str {
        self.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV)
    }
}

/// `[pipeline]` section
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PipelineConfig {
    pub on_stage_failure: Option<StageFailurePolicy>,
}

impl PipelineConfig {
    #[must_use]
    pub fn on_stage_failure(&self) -> StageFailurePolicy {
        self.on_stage_failure.unwrap_or_default()
    }
}

/// `[server]` section
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Empty means any origin is allowed
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
    /// Serve `/api/openapi.json`
    pub openapi: Option<bool>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Some(DEFAULT_HOST.to_string()),
            port: Some(DEFAULT_PORT),
            cors_allowed_origins: Vec::new(),
            openapi: Some(false),
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    #[must_use]
    pub fn openapi(&self) -> bool {
        self.openapi.unwrap_or(false)
    }

    /// `host:port` suitable for `TcpListener::bind`
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host(), self.port())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_completion_contract() {
        let llm = LlmConfig::default();
        assert_eq!(llm.model(), "gpt-3.5-turbo");
        assert_eq!(llm.temperature(), 0.7);
        assert_eq!(llm.max_tokens(), 2048);
        assert_eq!(llm.base_url(), "https://api.openai.com/v1/chat/completions");
        assert_eq!(llm.api_key_env(), "OPENAI_API_KEY");
    }

    #[test]
    fn test_accessors_fall_back_when_unset() {
        let llm = LlmConfig {
            base_url: None,
            model: None,
            temperature: None,
            max_tokens: None,
            timeout_secs: None,
            api_key_env: None,
        };
        assert_eq!(llm.model(), DEFAULT_MODEL);
        assert_eq!(llm.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_stage_failure_policy_round_trips_through_str() {
        assert_eq!("abort".parse(), Ok(StageFailurePolicy::Abort));
        assert_eq!("degrade".parse(), Ok(StageFailurePolicy::Degrade));
        assert!("retry".parse::<StageFailurePolicy>().is_err());
        assert_eq!(StageFailurePolicy::default(), StageFailurePolicy::Abort);
    }

    #[test]
    fn test_server_bind_address() {
        let server = ServerConfig {
            host: Some("0.0.0.0".to_string()),
            port: Some(9000),
            ..ServerConfig::default()
        };
        assert_eq!(server.bind_address(), "0.0.0.0:9000");
    }
}
