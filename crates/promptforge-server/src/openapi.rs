use utoipa::OpenApi;

use crate::{handlers, models};

#[derive(OpenApi)]
#[openapi(
    paths(handlers::generate_prompt, handlers::health),
    components(schemas(
        models::PromptRequest,
        models::PromptDetails,
        models::GeneratePromptResponse,
        models::ErrorResponse,
        models::ProblemDetails,
        models::HealthResponse,
    )),
    tags(
        (name = "prompt", description = "Prompt optimization"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
