//! The chat orchestration loop.
//!
//! One user message is handled as a bounded sequence of rounds:
//!
//! 1. **Build** the transcript (policy prompt, custom instructions, history, user turn)
//! 2. **Call** the LLM and **parse** its reply into an [`LlmDecision`]
//! 3. **If `tool_call`**: execute the tool, inject call and result, go back to 2
//! 4. **If `final`**: respond
//!
//! Tool executions are capped at `max_tool_rounds` (default 1) per message. A
//! tool call past the cap is replaced by a fixed fallback answer, so a turn
//! makes at most `max_tool_rounds + 1` LLM calls.
//!
//! [`LlmDecision`]: skillweave_core::LlmDecision

pub mod message_builder;
pub mod orchestrator;
pub mod parser;
pub mod prompt;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use message_builder::{InjectedToolResult, MessageBuilder};
pub use orchestrator::ChatOrchestrator;
pub use parser::{
    PARSE_FALLBACK_MESSAGE, ParseFailure, ROUND_CAP_MESSAGE, ResponseParser, parse_fallback,
    round_cap_fallback,
};
pub use prompt::render_policy_prompt;
