//! reqwest-backed [`ChatTransport`]
//!
//! One `reqwest::Client` is built per transport and reused for every call so
//! connections are pooled. Requests are sent exactly once.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use promptforge_error_redaction::redact_error_message;

use crate::transport::{ChatTransport, InboundResponse, OutboundRequest, TransportError};

/// Default connect timeout (30 seconds)
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared HTTP transport for the chat-completion endpoint
#[derive(Clone)]
pub struct HttpTransport {
    client: Arc<Client>,
}

impl HttpTransport {
    /// Create a transport with the default pool and connect settings
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Other` if the client cannot be constructed
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| TransportError::Other(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client: Arc::new(client),
        })
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport").finish_non_exhaustive()
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, request: OutboundRequest) -> Result<InboundResponse, TransportError> {
        let timeout = request.timeout;

        debug!(
            url = %request.url,
            timeout_secs = timeout.as_secs(),
            body_bytes = request.body.len(),
            "Executing HTTP request"
        );

        let response = self
            .client
            .post(&request.url)
            .headers(request.headers)
            .body(request.body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| map_send_error(&e, timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| map_send_error(&e, timeout))?;

        debug!(
            status = status.as_u16(),
            body_bytes = body.len(),
            "Received HTTP response"
        );

        Ok(InboundResponse { status, body })
    }
}

fn map_send_error(error: &reqwest::Error, timeout: Duration) -> TransportError {
    if error.is_timeout() {
        return TransportError::Timeout(timeout);
    }
    let message = redact_error_message(&error.to_string());
    if error.is_connect() {
        TransportError::Connect(message)
    } else {
        TransportError::Other(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_transport_construction() {
        assert!(HttpTransport::new().is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_transport_error() {
        let transport = HttpTransport::new().unwrap();
        // Port 9 on localhost is the discard port; nothing listens there in CI.
        let request = OutboundRequest {
            url: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            headers: reqwest::header::HeaderMap::new(),
            body: b"{}".to_vec(),
            timeout: Duration::from_secs(5),
        };

        let result = transport.send(request).await;
        assert!(result.is_err());
    }
}
