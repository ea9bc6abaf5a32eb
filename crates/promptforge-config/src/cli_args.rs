use std::path::PathBuf;

use crate::model::StageFailurePolicy;

/// Configuration overrides collected from the command line.
///
/// Every field is optional; `None` (or an empty list) leaves the file or
/// default value in place.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Explicit config file; skips upward discovery
    pub config_path: Option<PathBuf>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout_secs: Option<u64>,
    pub api_key_env: Option<String>,
    pub on_stage_failure: Option<StageFailurePolicy>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub cors_allowed_origins: Vec<String>,
    pub openapi: Option<bool>,
}
