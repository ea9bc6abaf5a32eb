//! Transport seam between the completion client and the network

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use std::time::Duration;
use thiserror::Error;

/// A fully-built POST request ready to be sent
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub url: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    pub timeout: Duration,
}

impl OutboundRequest {
    /// Body parsed as JSON (test and logging helper)
    pub fn json_body(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Raw response: status plus the body read as text
#[derive(Debug, Clone)]
pub struct InboundResponse {
    pub status: StatusCode,
    pub body: String,
}

impl InboundResponse {
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Failure before any HTTP status was received
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("The request was canceled due to the configured timeout of {} seconds elapsing.", .0.as_secs())]
    Timeout(Duration),

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("{0}")]
    Other(String),
}

/// Sends one request and returns the raw response.
///
/// Implementations must not retry; a failed exchange surfaces exactly once.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> Result<InboundResponse, TransportError>;
}
