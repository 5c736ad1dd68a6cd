//! Chat provider trait and the Gemini implementation.

pub mod gemini;
pub mod http;

pub use gemini::GeminiProvider;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{FinishReason, ModelMessage, ToolCall, Usage};

/// A request sent to a chat provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub messages: Vec<ModelMessage>,
    pub settings: crate::types::GenerationSettings,
    pub tools: Option<Vec<ToolDefinition>>,
}

/// Tool definition sent to the provider API.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Response from a provider: either final text, or one or more tool calls.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub text: String,
    pub tool_calls: Vec<ToolCall>,
    pub usage: Usage,
    pub finish_reason: Option<FinishReason>,
}

impl ProviderResponse {
    /// Whether the model requested any tool invocations.
    pub fn requests_tools(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Core trait implemented by chat providers.
///
/// A provider call blocks for the duration of the network round trip; no
/// cancellation is offered mid-call. Failures surface as `Authentication`,
/// `Transport`, or `Api` errors and abort the current turn.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &str;

    /// The model ID this provider instance serves.
    fn model_id(&self) -> &str;

    /// Run one generation against the full message history.
    async fn generate(&self, request: &ProviderRequest) -> Result<ProviderResponse>;
}

#[async_trait]
impl<T: ChatProvider + ?Sized> ChatProvider for std::sync::Arc<T> {
    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }

    async fn generate(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
        (**self).generate(request).await
    }
}
