//! ReAct agent loop.
//!
//! One call per user turn: the model is asked for an action; tool calls
//! are executed through the registry and fed back until the model produces
//! a final text answer or the iteration bound is hit.

use tracing::{debug, warn};

use crate::error::{RekonError, Result};
use crate::provider::{ChatProvider, ProviderRequest};
use crate::tools::ToolRegistry;
use crate::types::{
    ContentPart, GenerationSettings, ModelMessage, Role, ToolResult, TurnResult, TurnStep, Usage,
};

/// Default bound on model calls per user turn.
///
/// The loop makes at most this many model calls before giving up with
/// `MaxIterationsExceeded`; a tool-using turn typically needs two or three.
pub const DEFAULT_MAX_TOOL_ITERATIONS: usize = 5;

/// Run one user turn through the ReAct loop.
///
/// `history` is the committed transcript from previous turns; the messages
/// produced this turn are returned in `TurnResult::messages` and are only
/// committed by the caller on success, so a failed turn leaves the
/// transcript untouched.
pub async fn run_turn(
    provider: &dyn ChatProvider,
    registry: &ToolRegistry,
    history: &[ModelMessage],
    system_prompt: Option<&str>,
    user_text: &str,
    settings: &GenerationSettings,
    max_tool_iterations: usize,
) -> Result<TurnResult> {
    let tool_defs = if registry.is_empty() {
        None
    } else {
        Some(registry.definitions())
    };

    let mut prelude: Vec<ModelMessage> = Vec::new();
    if let Some(sys) = system_prompt {
        prelude.push(ModelMessage::system(sys));
    }
    prelude.extend_from_slice(history);

    // Messages produced this turn, committed by the caller on success.
    let mut turn_messages = vec![ModelMessage::user(user_text)];

    let mut steps = Vec::new();
    let mut total_usage = Usage::default();

    for iteration in 0..max_tool_iterations {
        let mut messages = prelude.clone();
        messages.extend(turn_messages.iter().cloned());

        let request = ProviderRequest {
            messages,
            settings: settings.clone(),
            tools: tool_defs.clone(),
        };

        debug!(iteration, "agent loop: awaiting model");
        let response = provider.generate(&request).await?;
        total_usage.merge(&response.usage);

        let mut step = TurnStep {
            text: response.text.clone(),
            tool_calls: response.tool_calls.clone(),
            tool_results: Vec::new(),
            usage: response.usage.clone(),
            finish_reason: response.finish_reason,
        };

        if !response.requests_tools() {
            // Final answer: commit the assistant reply and end the turn.
            turn_messages.push(ModelMessage::assistant(&response.text));
            steps.push(step);
            return Ok(TurnResult {
                text: response.text,
                steps,
                messages: turn_messages,
                usage: total_usage,
                finish_reason: response.finish_reason,
            });
        }

        // Record the assistant message carrying the tool calls.
        let mut assistant_content: Vec<ContentPart> = Vec::new();
        if !response.text.is_empty() {
            assistant_content.push(ContentPart::Text {
                text: response.text.clone(),
            });
        }
        for tc in &response.tool_calls {
            assistant_content.push(ContentPart::ToolCall(tc.clone()));
        }
        turn_messages.push(ModelMessage {
            role: Role::Assistant,
            content: assistant_content,
            timestamp: Some(chrono::Utc::now()),
        });

        // Execute each requested tool. Tool-level failures become error
        // results the model can react to; adapter-level errors abort.
        for tc in &response.tool_calls {
            let result = match registry.dispatch(tc) {
                Ok(value) => ToolResult {
                    tool_call_id: tc.id.clone(),
                    tool_name: tc.name.clone(),
                    result: value,
                    is_error: false,
                },
                Err(e) if !e.aborts_turn() => {
                    warn!(tool = %tc.name, error = %e, "tool execution failed");
                    ToolResult {
                        tool_call_id: tc.id.clone(),
                        tool_name: tc.name.clone(),
                        result: serde_json::json!({"error": e.to_string()}),
                        is_error: true,
                    }
                }
                Err(e) => return Err(e),
            };
            step.tool_results.push(result.clone());
            turn_messages.push(ModelMessage::tool_result(result));
        }

        steps.push(step);
    }

    Err(RekonError::MaxIterationsExceeded {
        limit: max_tool_iterations,
    })
}
