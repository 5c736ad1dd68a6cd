//! Interactive session: one transcript, one provider, one tool set.

pub mod transcript;

pub use transcript::Transcript;

use std::sync::Arc;

use crate::agent::{self, DEFAULT_MAX_TOOL_ITERATIONS};
use crate::error::Result;
use crate::provider::ChatProvider;
use crate::tools::ToolRegistry;
use crate::types::{GenerationSettings, TurnResult};

/// Binds a transcript and credentials (via the provider) to one
/// interactive session. Passed around as an explicit handle; there is no
/// global session state.
pub struct Session {
    provider: Box<dyn ChatProvider>,
    registry: Arc<ToolRegistry>,
    transcript: Transcript,
    system_prompt: Option<String>,
    settings: GenerationSettings,
    max_tool_iterations: usize,
}

impl Session {
    pub fn new(provider: Box<dyn ChatProvider>, registry: Arc<ToolRegistry>) -> Self {
        Self {
            provider,
            registry,
            transcript: Transcript::new(),
            system_prompt: None,
            settings: GenerationSettings::default(),
            max_tool_iterations: DEFAULT_MAX_TOOL_ITERATIONS,
        }
    }

    /// Set system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Set generation settings.
    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Override the per-turn tool iteration bound.
    pub fn with_max_tool_iterations(mut self, limit: usize) -> Self {
        self.max_tool_iterations = limit;
        self
    }

    /// Run one user turn to completion, including any nested tool calls.
    ///
    /// On success the turn's messages are committed to the transcript; on
    /// error the transcript is exactly as it was before the call.
    pub async fn send(&mut self, text: &str) -> Result<TurnResult> {
        let result = agent::run_turn(
            self.provider.as_ref(),
            &self.registry,
            self.transcript.messages(),
            self.system_prompt.as_deref(),
            text,
            &self.settings,
            self.max_tool_iterations,
        )
        .await?;

        for msg in &result.messages {
            self.transcript.append(msg.clone());
        }
        Ok(result)
    }

    /// Discard the conversation, keeping credentials and tools.
    pub fn reset(&mut self) {
        self.transcript.reset();
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn model_id(&self) -> &str {
        self.provider.model_id()
    }
}
