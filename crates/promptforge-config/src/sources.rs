use std::collections::BTreeMap;

use promptforge_utils::types::ConfigSource;

use crate::model::Config;

impl Config {
    fn source_of(&self, key: &str) -> ConfigSource {
        self.source_attribution
            .get(key)
            .copied()
            .unwrap_or(ConfigSource::Default)
    }

    /// Effective configuration as `key -> (value, source)`, sorted by key.
    ///
    /// Only the name of the credential variable is listed, never its value.
    #[must_use]
    pub fn effective_config(&self) -> BTreeMap<String, (String, String)> {
        let entries = [
            ("llm.base_url", self.llm.base_url().to_string()),
            ("llm.model", self.llm.model().to_string()),
            ("llm.temperature", self.llm.temperature().to_string()),
            ("llm.max_tokens", self.llm.max_tokens().to_string()),
            ("llm.timeout_secs", self.llm.timeout().as_secs().to_string()),
            ("llm.api_key_env", self.llm.api_key_env().to_string()),
            (
                "pipeline.on_stage_failure",
                self.pipeline.on_stage_failure().to_string(),
            ),
            ("server.host", self.server.host().to_string()),
            ("server.port", self.server.port().to_string()),
            (
                "server.cors_allowed_origins",
                if self.server.cors_allowed_origins.is_empty() {
                    "*".to_string()
                } else {
                    self.server.cors_allowed_origins.join(", ")
                },
            ),
            ("server.openapi", self.server.openapi().to_string()),
        ];

        entries
            .into_iter()
            .map(|(key, value)| {
                let source = self.source_of(key).to_string();
                (key.to_string(), (value, source))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_config_lists_every_key_with_source() {
        let config = Config::builder().model("gpt-4o").build().unwrap();
        let effective = config.effective_config();

        assert_eq!(
            effective.get("llm.model"),
            Some(&("gpt-4o".to_string(), "programmatic".to_string()))
        );
        assert_eq!(
            effective.get("server.cors_allowed_origins"),
            Some(&("*".to_string(), "default".to_string()))
        );
        assert_eq!(effective.len(), 11);
    }
}
