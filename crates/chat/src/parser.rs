//! LLM reply parsing.
//!
//! Model output is untrusted text. The parser pulls one JSON object out of
//! it and reads it as an [`LlmDecision`]. Anything it cannot read becomes a
//! fixed fallback answer; [`ResponseParser::parse`] never fails.

use regex_lite::Regex;
use skillweave_core::decision::{FinalDecision, LlmDecision};
use std::sync::LazyLock;

/// Answer substituted when the model's reply cannot be parsed.
pub const PARSE_FALLBACK_MESSAGE: &str = "I'm sorry, I encountered an issue processing your request. \
The administrators have been notified. Please try again.";

/// Answer substituted when the model asks for a tool past the round cap.
pub const ROUND_CAP_MESSAGE: &str =
    "I'm sorry, I was unable to complete that request right now. Please try again.";

static REASONING_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<think(?:ing)?>.*?</think(?:ing)?>").expect("reasoning-block pattern is valid")
});

/// Why a reply could not be read as a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    /// Nothing left after stripping reasoning and whitespace.
    Empty,
    /// The candidate text is not JSON.
    InvalidJson(String),
    /// Valid JSON, but not a `final` or `tool_call` object.
    UnrecognizedShape(String),
}

impl std::fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseFailure::Empty => write!(f, "empty reply"),
            ParseFailure::InvalidJson(e) => write!(f, "invalid JSON: {e}"),
            ParseFailure::UnrecognizedShape(e) => write!(f, "unrecognized decision: {e}"),
        }
    }
}

pub fn parse_fallback() -> FinalDecision {
    FinalDecision::new(PARSE_FALLBACK_MESSAGE)
        .with_suggested_actions(["try_again", "contact_support"])
}

pub fn round_cap_fallback() -> FinalDecision {
    FinalDecision::new(ROUND_CAP_MESSAGE).with_suggested_actions(["try_again"])
}

pub struct ResponseParser;

impl ResponseParser {
    /// Parse a reply, degrading to [`parse_fallback`] on any failure.
    pub fn parse(raw: &str) -> LlmDecision {
        Self::try_parse(raw).unwrap_or_else(|_| LlmDecision::Final(parse_fallback()))
    }

    /// Parse a reply, reporting why it failed.
    pub fn try_parse(raw: &str) -> Result<LlmDecision, ParseFailure> {
        let stripped = REASONING_BLOCK.replace_all(raw, "");
        let text = stripped.trim();
        if text.is_empty() {
            return Err(ParseFailure::Empty);
        }

        let candidate = extract_object(text).unwrap_or(text);
        let value: serde_json::Value = serde_json::from_str(candidate)
            .map_err(|e| ParseFailure::InvalidJson(e.to_string()))?;
        serde_json::from_value(value).map_err(|e| ParseFailure::UnrecognizedShape(e.to_string()))
    }
}

/// The span from the first `{` to the last `}`, if there is one.
fn extract_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
