use axum::{
    Json, Router,
    http::{self, HeaderValue},
    routing::{get, post},
};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use utoipa::OpenApi;

use promptforge_config::ServerConfig;
use promptforge_pipeline::Pipeline;
use promptforge_utils::error::PromptForgeError;

use crate::handlers;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Build the application router.
///
/// `/api/openapi.json` is mounted only when `server.openapi` is enabled.
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let mut router = Router::new()
        .route("/api/generate-prompt", post(handlers::generate_prompt))
        .route("/api/health", get(handlers::health));

    if config.openapi() {
        router = router.route(
            "/api/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        );
    }

    router
        .layer(create_cors_layer(&config.cors_allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind, serve until Ctrl+C or SIGTERM, then drain in-flight requests
pub async fn serve(pipeline: Pipeline, config: &ServerConfig) -> Result<(), PromptForgeError> {
    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| PromptForgeError::Server(format!("Failed to bind {address}: {e}")))?;

    let local = listener
        .local_addr()
        .map(|a| a.to_string())
        .unwrap_or(address);
    info!(address = %local, openapi = config.openapi(), "Server listening");

    let app = create_router(AppState::new(pipeline), config);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| PromptForgeError::Server(e.to_string()))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}

/// Allow everything when no origins are configured
fn create_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = if allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([http::Method::GET, http::Method::POST, http::Method::OPTIONS])
            .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
    };

    cors.max_age(Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use promptforge_llm::test_support::ScriptedTransport;
    use promptforge_llm::{CompletionClient, CompletionSettings};
    use secrecy::SecretString;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state() -> AppState {
        let settings = CompletionSettings::new(SecretString::from("k".to_string())).unwrap();
        let client = CompletionClient::new(Arc::new(ScriptedTransport::default()), settings);
        AppState::new(Pipeline::new(client))
    }

    #[tokio::test]
    async fn test_preflight_allows_configured_origin() {
        let config = ServerConfig {
            cors_allowed_origins: vec!["https://app.example.com".to_string()],
            ..ServerConfig::default()
        };
        let app = create_router(state(), &config);

        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/generate-prompt")
                    .header("origin", "https://app.example.com")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .unwrap(),
            "https://app.example.com"
        );
    }

    #[tokio::test]
    async fn test_default_cors_allows_any_origin() {
        let app = create_router(state(), &ServerConfig::default());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .header("origin", "https://anywhere.test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_openapi_route_disabled_by_default() {
        let app = create_router(state(), &ServerConfig::default());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
