use promptforge_utils::error::ConfigError;

use crate::model::Config;

fn invalid(key: &str, value: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.into(),
    }
}

impl Config {
    /// Validate value ranges after all sources are merged
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.llm.base_url();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(invalid(
                "llm.base_url",
                format!("'{base_url}' must start with http:// or https://"),
            ));
        }

        if self.llm.model().trim().is_empty() {
            return Err(invalid("llm.model", "model must not be empty"));
        }

        let temperature = self.llm.temperature();
        if !temperature.is_finite() || !(0.0..=2.0).contains(&temperature) {
            return Err(invalid(
                "llm.temperature",
                format!("{temperature} is outside 0.0..=2.0"),
            ));
        }

        if self.llm.max_tokens() == 0 {
            return Err(invalid("llm.max_tokens", "must be greater than 0"));
        }

        if self.llm.timeout().is_zero() {
            return Err(invalid("llm.timeout_secs", "must be greater than 0"));
        }

        if self.llm.api_key_env().trim().is_empty() {
            return Err(invalid("llm.api_key_env", "variable name must not be empty"));
        }

        Ok(())
    }
}
