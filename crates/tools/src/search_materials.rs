//! Semantic search over the knowledge graph, exposed as a tool.

use async_trait::async_trait;
use skillweave_core::error::ToolError;
use skillweave_core::tool::Tool;
use skillweave_graph::SimilaritySearch;
use tracing::debug;

/// Result-count bounds applied to the model's `limit` argument.
#[derive(Debug, Clone, Copy)]
pub struct SearchLimits {
    /// Used when `limit` is absent or not a positive integer.
    pub default: usize,
    /// Larger requests are clamped to this.
    pub max: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self { default: 5, max: 25 }
    }
}

impl SearchLimits {
    pub fn resolve(&self, requested: Option<i64>) -> usize {
        match requested {
            Some(n) if n > 0 => (n as usize).min(self.max),
            _ => self.default.min(self.max),
        }
    }
}

pub struct SearchMaterialsTool {
    search: SimilaritySearch,
    limits: SearchLimits,
}

impl SearchMaterialsTool {
    pub fn new(search: SimilaritySearch, limits: SearchLimits) -> Self {
        Self { search, limits }
    }
}

#[async_trait]
impl Tool for SearchMaterialsTool {
    fn name(&self) -> &str {
        "search_materials"
    }

    fn description(&self) -> &str {
        "Semantic search over skills and learning resources in the knowledge graph. \
         Returns matching nodes with their similarity to the query, highest first."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "What the user wants to learn, in natural language"
                },
                "limit": {
                    "type": "integer",
                    "description": format!("Maximum number of results (default {})", self.limits.default),
                    "default": self.limits.default
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let query = arguments["query"]
            .as_str()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'query' argument".into()))?;

        let limit = self.limits.resolve(arguments["limit"].as_i64());
        debug!(query, limit, "Searching materials");

        let outcome = self.search.search(query, limit).await?;
        serde_json::to_value(&outcome).map_err(|e| ToolError::ExecutionFailed {
            tool_name: self.name().into(),
            reason: e.to_string(),
        })
    }
}
