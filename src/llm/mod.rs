// Scouting report generation over the Anthropic Messages API.

pub mod client;
pub mod prompt;

pub use client::{AnthropicClient, LlmClient};

/// Events emitted by a streaming LLM task back to the orchestrator.
///
/// Every event carries the `generation` it was spawned under so the app loop
/// can discard events from a superseded report task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmEvent {
    /// A chunk of streamed report text.
    Token { text: String, generation: u64 },
    /// The stream finished; `full_text` is the whole report.
    Complete {
        full_text: String,
        input_tokens: u32,
        output_tokens: u32,
        generation: u64,
    },
    /// The stream failed. The orchestrator substitutes the fixed fallback
    /// report; this never reaches the user as an error.
    Error { message: String, generation: u64 },
}

impl LlmEvent {
    pub fn generation(&self) -> u64 {
        match self {
            LlmEvent::Token { generation, .. }
            | LlmEvent::Complete { generation, .. }
            | LlmEvent::Error { generation, .. } => *generation,
        }
    }
}
