//! Scripted transport for tests
//!
//! Enabled for this crate's tests and, via the `test-utils` feature, for
//! downstream crates that need a pipeline without network access.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::transport::{ChatTransport, InboundResponse, OutboundRequest, TransportError};

/// Body of a well-formed completion response carrying `text`
#[must_use]
pub fn completion_body(text: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": text },
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

/// Transport that replays queued responses and records every request.
///
/// Once the script is exhausted, further calls fail with a transport error.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<InboundResponse, TransportError>>>,
    requests: Mutex<Vec<OutboundRequest>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Result<InboundResponse, TransportError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Successful completions, one per call, in order
    pub fn completions<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(
            texts
                .into_iter()
                .map(|text| {
                    Ok(InboundResponse::new(
                        StatusCode::OK,
                        completion_body(text.as_ref()),
                    ))
                })
                .collect(),
        )
    }

    /// Every request sent so far
    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// `messages[i].content` of every request sent so far
    pub fn user_messages(&self) -> Vec<String> {
        self.message_contents(1)
    }

    pub fn system_messages(&self) -> Vec<String> {
        self.message_contents(0)
    }

    fn message_contents(&self, index: usize) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(|r| r.json_body().ok())
            .filter_map(|body| {
                body["messages"][index]["content"]
                    .as_str()
                    .map(str::to_string)
            })
            .collect()
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn send(&self, request: OutboundRequest) -> Result<InboundResponse, TransportError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or_else(|| Err(TransportError::Other("script exhausted".to_string())))
    }
}
