use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use promptforge_pipeline::PipelineResult;

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct PromptRequest {
    /// Free-text problem statement to optimize
    #[serde(default)]
    pub problem: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PromptDetails {
    pub analysis: String,
    pub context: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePromptResponse {
    pub success: bool,
    pub optimized_prompt: String,
    pub details: PromptDetails,
}

impl From<PipelineResult> for GeneratePromptResponse {
    fn from(result: PipelineResult) -> Self {
        Self {
            success: true,
            optimized_prompt: result.optimized_prompt,
            details: PromptDetails {
                analysis: result.analysis,
                context: result.context,
            },
        }
    }
}

/// Body of a rejected request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

/// RFC 7807 problem detail
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// RFC 3339 UTC timestamp
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_body_uses_camel_case() {
        let response = GeneratePromptResponse::from(PipelineResult {
            analysis: "A".to_string(),
            context: "C".to_string(),
            optimized_prompt: "P".to_string(),
        });
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "success": true,
                "optimizedPrompt": "P",
                "details": { "analysis": "A", "context": "C" }
            })
        );
    }

    #[test]
    fn test_missing_problem_deserializes_as_none() {
        let request: PromptRequest = serde_json::from_str("{}").unwrap();
        assert!(request.problem.is_none());
        let request: PromptRequest = serde_json::from_str(r#"{"problem":null}"#).unwrap();
        assert!(request.problem.is_none());
    }
}
