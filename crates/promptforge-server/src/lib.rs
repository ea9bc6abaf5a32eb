//! HTTP front-end for the prompt optimization pipeline
//!
//! Routes:
//! - `POST /api/generate-prompt`
//! - `GET /api/health`
//! - `GET /api/openapi.json` (when enabled)

mod error;
mod handlers;
mod models;
mod openapi;
mod server;
mod state;

pub use error::{ApiError, ApiResult};
pub use models::{
    ErrorResponse, GeneratePromptResponse, HealthResponse, ProblemDetails, PromptDetails,
    PromptRequest,
};
pub use openapi::ApiDoc;
pub use server::{create_router, serve};
pub use state::AppState;
