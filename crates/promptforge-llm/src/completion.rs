//! Single chat-completion call
//!
//! [`CompletionClient::call`] sends one system message and one user message
//! and never fails with an `Err`: every failure is folded into a
//! [`CompletionOutcome::Failed`] whose display text is the diagnostic
//! sentinel (`"API Error: ..."`, `"Unable to parse response"`,
//! `"No response generated"`).

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, warn};

use promptforge_error_redaction::redact_secret;

use crate::settings::CompletionSettings;
use crate::transport::{ChatTransport, InboundResponse, OutboundRequest};
use crate::types::{ChatMessage, CompletionRequest};

/// Why a completion call produced no usable text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionFailure {
    /// Network, DNS, TLS or timeout failure
    #[error("API Error: {0}")]
    Transport(String),

    /// Endpoint answered with a non-2xx status
    #[error("API Error: {message}")]
    Status { status: u16, message: String },

    /// Body was not JSON, or `content` had an unexpected type
    #[error("API Error: {0}")]
    MalformedBody(String),

    /// Body parsed but lacked `choices[0].message`
    #[error("Unable to parse response")]
    Unparseable,

    /// `content` was null or missing from the message
    #[error("No response generated")]
    EmptyContent,
}

impl CompletionFailure {
    /// Short label used in structured logs
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Status { .. } => "status",
            Self::MalformedBody(_) => "malformed_body",
            Self::Unparseable => "unparseable",
            Self::EmptyContent => "empty_content",
        }
    }
}

/// Result of one completion call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    Completed(String),
    Failed(CompletionFailure),
}

impl CompletionOutcome {
    /// Text of the outcome: the model's reply or the diagnostic sentinel
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Completed(text) => text,
            Self::Failed(failure) => failure.to_string(),
        }
    }

    pub fn into_result(self) -> Result<String, CompletionFailure> {
        match self {
            Self::Completed(text) => Ok(text),
            Self::Failed(failure) => Err(failure),
        }
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Client for the chat-completion endpoint.
///
/// Cheap to clone; the transport and settings are shared.
#[derive(Clone)]
pub struct CompletionClient {
    transport: Arc<dyn ChatTransport>,
    settings: Arc<CompletionSettings>,
}

impl std::fmt::Debug for CompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionClient")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl CompletionClient {
    pub fn new(transport: Arc<dyn ChatTransport>, settings: CompletionSettings) -> Self {
        Self {
            transport,
            settings: Arc::new(settings),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &CompletionSettings {
        &self.settings
    }

    /// Send one completion request with the given system and user messages
    pub async fn call(&self, system: &str, user: &str) -> CompletionOutcome {
        let started = Instant::now();
        let outcome = match self.build_request(system, user) {
            Ok(request) => match self.transport.send(request).await {
                Ok(response) => interpret_response(&response),
                Err(e) => CompletionOutcome::Failed(CompletionFailure::Transport(e.to_string())),
            },
            Err(failure) => CompletionOutcome::Failed(failure),
        };
        let outcome = self.scrub(outcome);

        match &outcome {
            CompletionOutcome::Completed(text) => debug!(
                model = %self.settings.model(),
                duration_ms = started.elapsed().as_millis() as u64,
                output_chars = text.chars().count(),
                "Completion succeeded"
            ),
            CompletionOutcome::Failed(failure) => warn!(
                model = %self.settings.model(),
                duration_ms = started.elapsed().as_millis() as u64,
                kind = failure.kind(),
                error = %failure,
                "Completion failed"
            ),
        }

        outcome
    }

    fn build_request(
        &self,
        system: &str,
        user: &str,
    ) -> Result<OutboundRequest, CompletionFailure> {
        let body = CompletionRequest {
            model: self.settings.model().to_string(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature: self.settings.temperature(),
            max_tokens: self.settings.max_tokens(),
        };
        let body = serde_json::to_vec(&body)
            .map_err(|e| CompletionFailure::Transport(format!("Failed to encode request: {e}")))?;

        let mut auth = HeaderValue::from_str(&format!(
            "Bearer {}",
            self.settings.api_key().expose_secret()
        ))
        .map_err(|_| {
            CompletionFailure::Transport("API key contains invalid header characters".to_string())
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        debug!(
            model = %self.settings.model(),
            max_tokens = self.settings.max_tokens(),
            temperature = self.settings.temperature(),
            timeout_secs = self.settings.timeout().as_secs(),
            "Sending completion request"
        );

        Ok(OutboundRequest {
            url: self.settings.endpoint().to_string(),
            headers,
            body,
            timeout: self.settings.timeout(),
        })
    }

    /// Remove the credential from any diagnostic that echoes it back
    fn scrub(&self, outcome: CompletionOutcome) -> CompletionOutcome {
        let secret = self.settings.api_key().expose_secret();
        match outcome {
            CompletionOutcome::Failed(CompletionFailure::Transport(m)) => {
                CompletionOutcome::Failed(CompletionFailure::Transport(redact_secret(&m, secret)))
            }
            CompletionOutcome::Failed(CompletionFailure::MalformedBody(m)) => {
                CompletionOutcome::Failed(CompletionFailure::MalformedBody(redact_secret(
                    &m, secret,
                )))
            }
            other => other,
        }
    }
}

fn status_message(status: StatusCode) -> String {
    format!(
        "Response status code does not indicate success: {} ({}).",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    )
}

/// Map a raw response to an outcome.
///
/// Shape checks walk a `serde_json::Value` so that a missing message can be
/// told apart from a message with no usable content.
pub(crate) fn interpret_response(response: &InboundResponse) -> CompletionOutcome {
    if !response.status.is_success() {
        return CompletionOutcome::Failed(CompletionFailure::Status {
            status: response.status.as_u16(),
            message: status_message(response.status),
        });
    }

    let body: Value = match serde_json::from_str(&response.body) {
        Ok(value) => value,
        Err(e) => {
            return CompletionOutcome::Failed(CompletionFailure::MalformedBody(e.to_string()));
        }
    };

    let Some(message) = body
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
    else {
        return CompletionOutcome::Failed(CompletionFailure::Unparseable);
    };

    // A message without `content` counts the same as `content: null`.
    match message.get("content") {
        Some(Value::String(text)) => CompletionOutcome::Completed(text.clone()),
        None | Some(Value::Null) => CompletionOutcome::Failed(CompletionFailure::EmptyContent),
        Some(other) => CompletionOutcome::Failed(CompletionFailure::MalformedBody(format!(
            "Expected string content, found {}",
            json_type_name(other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedTransport, completion_body};
    use crate::transport::TransportError;
    use secrecy::SecretString;
    use std::time::Duration;

    fn ok(body: &str) -> InboundResponse {
        InboundResponse::new(StatusCode::OK, body)
    }

    fn client_with(transport: Arc<ScriptedTransport>) -> CompletionClient {
        let settings = CompletionSettings::new(SecretString::from("sk-test".to_string())).unwrap();
        CompletionClient::new(transport, settings)
    }

    #[test]
    fn test_valid_response_yields_content() {
        let outcome = interpret_response(&ok(&completion_body("X")));
        assert_eq!(outcome, CompletionOutcome::Completed("X".to_string()));
    }

    #[test]
    fn test_empty_content_string_is_returned_verbatim() {
        let outcome = interpret_response(&ok(&completion_body("")));
        assert_eq!(outcome.into_text(), "");
    }

    #[test]
    fn test_empty_choices_is_unparseable() {
        let outcome = interpret_response(&ok(r#"{"choices":[]}"#));
        assert_eq!(outcome.into_text(), "Unable to parse response");
    }

    #[test]
    fn test_missing_choices_is_unparseable() {
        let outcome = interpret_response(&ok(r#"{"id":"cmpl-1"}"#));
        assert_eq!(outcome.into_text(), "Unable to parse response");
    }

    #[test]
    fn test_missing_message_is_unparseable() {
        let outcome = interpret_response(&ok(r#"{"choices":[{"index":0}]}"#));
        assert_eq!(
            outcome,
            CompletionOutcome::Failed(CompletionFailure::Unparseable)
        );
    }

    #[test]
    fn test_null_content_is_no_response() {
        let outcome = interpret_response(&ok(r#"{"choices":[{"message":{"content":null}}]}"#));
        assert_eq!(outcome.into_text(), "No response generated");
    }

    #[test]
    fn test_message_without_content_is_no_response() {
        let outcome = interpret_response(&ok(r#"{"choices":[{"message":{"role":"assistant"}}]}"#));
        assert_eq!(
            outcome,
            CompletionOutcome::Failed(CompletionFailure::EmptyContent)
        );
        assert_eq!(outcome.into_text(), "No response generated");
    }

    #[test]
    fn test_non_string_content_is_api_error() {
        let outcome = interpret_response(&ok(r#"{"choices":[{"message":{"content":42}}]}"#));
        assert!(outcome.into_text().starts_with("API Error:"));
    }

    #[test]
    fn test_invalid_json_is_api_error() {
        let outcome = interpret_response(&ok("<html>oops</html>"));
        assert!(matches!(
            outcome,
            CompletionOutcome::Failed(CompletionFailure::MalformedBody(_))
        ));
        assert!(outcome.into_text().starts_with("API Error: "));
    }

    #[test]
    fn test_unauthorized_status_message() {
        let outcome = interpret_response(&InboundResponse::new(
            StatusCode::UNAUTHORIZED,
            r#"{"error":{"message":"bad key"}}"#,
        ));
        assert_eq!(
            outcome.into_text(),
            "API Error: Response status code does not indicate success: 401 (Unauthorized)."
        );
    }

    #[test]
    fn test_status_checked_before_body() {
        let outcome = interpret_response(&InboundResponse::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            completion_body("should be ignored"),
        ));
        match outcome {
            CompletionOutcome::Failed(CompletionFailure::Status { status, .. }) => {
                assert_eq!(status, 500)
            }
            other => panic!("Expected status failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_call_sends_two_messages_with_defaults() {
        let transport = Arc::new(ScriptedTransport::completions(["X"]));
        let client = client_with(transport.clone());

        let outcome = client.call("be helpful", "hello").await;
        assert_eq!(outcome.into_text(), "X");

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.url, "https://api.openai.com/v1/chat/completions");
        assert_eq!(request.timeout, Duration::from_secs(100));

        let body = request.json_body().unwrap();
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["max_tokens"], 2048);
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);

        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], "be helpful");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[1]["content"], "hello");
    }

    #[tokio::test]
    async fn test_call_sends_bearer_header() {
        let transport = Arc::new(ScriptedTransport::completions(["X"]));
        let client = client_with(transport.clone());

        client.call("s", "u").await;

        let request = &transport.requests()[0];
        let auth = request.headers.get(AUTHORIZATION).unwrap();
        assert_eq!(auth.to_str().unwrap(), "Bearer sk-test");
        assert!(auth.is_sensitive());
        assert_eq!(
            request.headers.get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_transport_failure_is_api_error() {
        let transport = Arc::new(ScriptedTransport::new(vec![Err(
            TransportError::Connect("No such host is known".to_string()),
        )]));
        let client = client_with(transport);

        let text = client.call("s", "u").await.into_text();
        assert_eq!(text, "API Error: Connection failed: No such host is known");
    }

    #[tokio::test]
    async fn test_timeout_is_api_error() {
        let transport = Arc::new(ScriptedTransport::new(vec![Err(TransportError::Timeout(
            Duration::from_secs(100),
        ))]));
        let client = client_with(transport);

        let text = client.call("s", "u").await.into_text();
        assert!(text.starts_with("API Error: "));
        assert!(text.contains("100 seconds"));
    }

    #[tokio::test]
    async fn test_echoed_credential_is_scrubbed() {
        let transport = Arc::new(ScriptedTransport::new(vec![Err(TransportError::Other(
            "proxy rejected token sk-test".to_string(),
        ))]));
        let client = client_with(transport);

        let text = client.call("s", "u").await.into_text();
        assert!(!text.contains("sk-test"));
    }

    #[tokio::test]
    async fn test_each_call_is_sent_once() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(InboundResponse::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "",
        ))]));
        let client = client_with(transport.clone());

        let outcome = client.call("s", "u").await;
        assert!(!outcome.is_completed());
        assert_eq!(transport.requests().len(), 1);
    }
}
