//! The structured decision an LLM reply is parsed into.
//!
//! The wire shape is a JSON object tagged by `type`:
//!
//! ```json
//! {"type": "final", "message": "...", "relatedMaterials": [], "suggestedActions": []}
//! {"type": "tool_call", "tool": "search_materials", "args": {"query": "react hooks"}}
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use crate::graph::NodeType;

/// A decision emitted by the model for one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LlmDecision {
    /// A user-ready answer that ends the turn.
    Final(FinalDecision),
    /// A request to run a backend tool and see its result.
    ToolCall(ToolCallDecision),
}

impl LlmDecision {
    pub fn is_final(&self) -> bool {
        matches!(self, LlmDecision::Final(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalDecision {
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub related_materials: Vec<MaterialRef>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub suggested_actions: Vec<String>,
}

/// An explicit `null` reads the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl FinalDecision {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_suggested_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggested_actions = actions.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallDecision {
    /// Tool name as emitted by the model; may name a tool that doesn't exist.
    pub tool: String,

    #[serde(default)]
    pub args: serde_json::Value,
}

impl ToolCallDecision {
    pub fn new(tool: impl Into<String>, args: serde_json::Value) -> Self {
        Self {
            tool: tool.into(),
            args,
        }
    }

    /// The tagged JSON form of this decision, as the model emitted it.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "tool_call",
            "tool": self.tool,
            "args": self.args,
        })
    }
}

/// A graph node cited in a final answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRef {
    pub node_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
}
