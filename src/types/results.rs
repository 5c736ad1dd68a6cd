//! Turn result types.

use super::generation::FinishReason;
use super::message::{ModelMessage, ToolCall, ToolResult};
use super::usage::Usage;

/// Result of one completed user turn.
#[derive(Debug, Clone)]
pub struct TurnResult {
    /// Final assistant reply for the turn.
    pub text: String,
    /// All steps taken this turn (more than one if tools were used).
    pub steps: Vec<TurnStep>,
    /// Messages produced this turn, in append order: the user message,
    /// any assistant tool-call and tool-result messages, then the final
    /// assistant reply. These are what the session commits on success.
    pub messages: Vec<ModelMessage>,
    /// Aggregated usage across all steps.
    pub usage: Usage,
    /// Finish reason of the final step.
    pub finish_reason: Option<FinishReason>,
}

/// A single step of the agent loop (one model call).
#[derive(Debug, Clone)]
pub struct TurnStep {
    pub text: String,
    pub tool_calls: Vec<ToolCall>,
    pub tool_results: Vec<ToolResult>,
    pub usage: Usage,
    pub finish_reason: Option<FinishReason>,
}
