use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::{ErrorResponse, ProblemDetails};

const PROBLEM_JSON: &str = "application/problem+json";

#[derive(Error, Debug)]
pub enum ApiError {
    /// Client input rejected before the pipeline ran
    #[error("{0}")]
    BadRequest(String),

    /// The pipeline failed; the message is already redacted
    #[error("{0}")]
    Generation(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(error) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    success: false,
                    error,
                }),
            )
                .into_response(),
            ApiError::Generation(detail) => {
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                let body = Json(ProblemDetails {
                    problem_type: "about:blank".to_string(),
                    title: "Error generating prompt".to_string(),
                    status: status.as_u16(),
                    detail,
                });
                let mut response = (status, body).into_response();
                response
                    .headers_mut()
                    .insert(CONTENT_TYPE, HeaderValue::from_static(PROBLEM_JSON));
                response
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
