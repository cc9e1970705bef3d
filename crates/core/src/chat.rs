//! Chat request/response value objects.
//!
//! Both are built fresh per HTTP request and dropped after the response;
//! session continuity is carried by the caller in `conversation_history`.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::decision::MaterialRef;
use crate::error::ChatError;
use crate::message::ConversationTurn;

/// The message returned to clients whose `message` field is missing or blank.
pub const INVALID_MESSAGE: &str = "Message is required and must be a non-empty string";

/// An incoming chat request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    #[serde(default)]
    pub conversation_history: Vec<ConversationTurn>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_instructions: Option<String>,

    /// Client context; accepted but not used by the orchestrator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Parse a raw JSON body, rejecting a missing, non-string, or blank `message`.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ChatError> {
        let message_ok = value
            .get("message")
            .and_then(|m| m.as_str())
            .is_some_and(|m| !m.trim().is_empty());
        if !message_ok {
            return Err(ChatError::InvalidRequest(INVALID_MESSAGE.into()));
        }

        serde_json::from_value(value)
            .map_err(|e| ChatError::InvalidRequest(format!("Malformed chat request: {e}")))
    }

    /// Check the request before any external call is made.
    pub fn validate(&self) -> Result<(), ChatError> {
        if self.message.trim().is_empty() {
            return Err(ChatError::InvalidRequest(INVALID_MESSAGE.into()));
        }
        Ok(())
    }

    /// The caller's session ID, if non-blank.
    pub fn session(&self) -> Option<&str> {
        self.session_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// The response to one chat turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub message: String,
    pub related_materials: Vec<MaterialRef>,
    pub suggested_actions: Vec<String>,
    pub conversation_state: ConversationState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationState {
    pub session_id: String,
    /// RFC 3339 UTC timestamp with millisecond precision (lexicographically sortable).
    pub last_updated: String,
}

impl ConversationState {
    /// State for `session_id`, or a freshly generated session, stamped now.
    pub fn now(session_id: Option<&str>) -> Self {
        Self {
            session_id: session_id.map_or_else(generate_session_id, str::to_string),
            last_updated: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// `session_<unix millis>_<random suffix>`.
pub fn generate_session_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("session_{}_{}", Utc::now().timestamp_millis(), &suffix[..8])
}
