//! Shared test helpers and mock provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use rekon::error::{RekonError, Result};
use rekon::provider::{ChatProvider, ProviderRequest, ProviderResponse};
use rekon::types::{FinishReason, ToolCall, Usage};

enum Scripted {
    Response(ProviderResponse),
    AuthFailure(String),
}

/// A mock provider that returns scripted responses in order.
pub struct MockProvider {
    model_id: String,
    script: Mutex<Vec<Scripted>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl MockProvider {
    pub fn new(model_id: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
            script: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a final text response.
    pub fn queue_response(&self, text: &str) {
        self.script
            .lock()
            .unwrap()
            .push(Scripted::Response(ProviderResponse {
                text: text.to_string(),
                tool_calls: vec![],
                usage: Usage {
                    input_tokens: 10,
                    output_tokens: 20,
                    total_tokens: 30,
                },
                finish_reason: Some(FinishReason::Stop),
            }));
    }

    /// Queue a tool call response.
    pub fn queue_tool_call(&self, id: &str, name: &str, args: serde_json::Value) {
        self.script
            .lock()
            .unwrap()
            .push(Scripted::Response(ProviderResponse {
                text: String::new(),
                tool_calls: vec![ToolCall {
                    id: id.to_string(),
                    name: name.to_string(),
                    arguments: args,
                }],
                usage: Usage {
                    input_tokens: 10,
                    output_tokens: 5,
                    total_tokens: 15,
                },
                finish_reason: Some(FinishReason::ToolCalls),
            }));
    }

    /// Queue an authentication failure.
    pub fn queue_auth_failure(&self, message: &str) {
        self.script
            .lock()
            .unwrap()
            .push(Scripted::AuthFailure(message.to_string()));
    }

    /// Number of generate calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<ProviderRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        let mut script = self.script.lock().unwrap();
        if script.is_empty() {
            return Ok(ProviderResponse {
                text: "Mock response".to_string(),
                tool_calls: vec![],
                usage: Usage::default(),
                finish_reason: Some(FinishReason::Stop),
            });
        }
        match script.remove(0) {
            Scripted::Response(resp) => Ok(resp),
            Scripted::AuthFailure(msg) => Err(RekonError::Authentication(msg)),
        }
    }
}
