//! Tool trait — the backend capabilities the model may call.
//!
//! The model requests a tool by name with JSON arguments; the registry looks
//! it up and runs it. Unknown tools and bad arguments come back as an
//! `{"error": ...}` payload for the model to read, not as a failure of the turn.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use crate::error::ToolError;

/// A tool definition rendered into the policy prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

/// The result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// The tool that produced this output
    pub tool: String,

    /// The tool output, injected back to the model verbatim
    pub output: serde_json::Value,

    /// Whether `output` is an error payload
    #[serde(default)]
    pub is_error: bool,
}

impl ToolResult {
    fn error(tool: &str, message: impl Into<String>) -> Self {
        Self {
            tool: tool.to_string(),
            output: serde_json::json!({ "error": message.into() }),
            is_error: true,
        }
    }
}

/// The core Tool trait.
///
/// Each tool (search_materials, request_material_addition) implements this
/// trait and is registered in the ToolRegistry.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "search_materials").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the LLM).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments.
    async fn execute(&self, arguments: serde_json::Value) -> std::result::Result<serde_json::Value, ToolError>;

    /// Convert this tool into a ToolDefinition for the policy prompt.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// A registry of available tools.
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// All tool definitions, sorted by name.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<_> = self.tools.values().map(|t| t.to_definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Execute a tool by name.
    ///
    /// Only failures of the tool's collaborators (store, embedding) are
    /// returned as `Err`.
    pub async fn execute(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> std::result::Result<ToolResult, ToolError> {
        let Some(tool) = self.tools.get(name) else {
            return Ok(ToolResult::error(name, format!("Unknown tool: {name}")));
        };

        match tool.execute(arguments).await {
            Ok(output) => Ok(ToolResult {
                tool: name.to_string(),
                output,
                is_error: false,
            }),
            Err(ToolError::InvalidArguments(reason)) => Ok(ToolResult::error(name, reason)),
            Err(e) => Err(e),
        }
    }

    /// List all registered tool names.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
