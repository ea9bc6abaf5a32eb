use axum::{Json, extract::State};
use tracing::{error, info};

use promptforge_error_redaction::redact_error_message;
use promptforge_pipeline::is_blank_problem;

use crate::error::{ApiError, ApiResult};
use crate::models::{
    ErrorResponse, GeneratePromptResponse, HealthResponse, ProblemDetails, PromptRequest,
};
use crate::state::AppState;

/// Run the optimization pipeline for a problem statement
#[utoipa::path(
    post,
    path = "/api/generate-prompt",
    tag = "prompt",
    request_body = PromptRequest,
    responses(
        (status = 200, description = "Optimized prompt generated", body = GeneratePromptResponse),
        (status = 400, description = "Problem missing or blank", body = ErrorResponse),
        (status = 500, description = "Pipeline failed", body = ProblemDetails, content_type = "application/problem+json")
    )
)]
pub async fn generate_prompt(
    State(state): State<AppState>,
    Json(req): Json<PromptRequest>,
) -> ApiResult<Json<GeneratePromptResponse>> {
    let problem = match req.problem {
        Some(problem) if !is_blank_problem(&problem) => problem,
        _ => return Err(ApiError::BadRequest("Problem cannot be empty".into())),
    };

    info!(problem_chars = problem.chars().count(), "Generating prompt");

    match state.pipeline.run(&problem).await {
        Ok(result) => Ok(Json(result.into())),
        Err(err) => {
            let detail = redact_error_message(&err.to_string());
            error!(stage = %err.stage(), error = %detail, "Prompt generation failed");
            Err(ApiError::Generation(detail))
        }
    }
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
