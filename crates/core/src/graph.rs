//! KnowledgeStore trait — the skill/resource graph.
//!
//! The graph holds two node types: `Skill` nodes (things to learn) and `Url`
//! nodes (resources that teach them). Skills link to their prerequisites;
//! resources link to the skills they teach. Either node type may carry an
//! embedding vector used for semantic search.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::StoreError;

/// The type of a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    #[serde(alias = "Skill", alias = "SKILL")]
    Skill,
    #[serde(alias = "URL", alias = "Url")]
    Url,
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeType::Skill => write!(f, "skill"),
            NodeType::Url => write!(f, "url"),
        }
    }
}

/// A node in the knowledge graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,

    pub name: String,

    #[serde(rename = "type")]
    pub node_type: NodeType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Resource location (URL nodes only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl GraphNode {
    pub fn skill(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            node_type: NodeType::Skill,
            description: None,
            url: None,
        }
    }

    pub fn resource(id: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            node_type: NodeType::Url,
            description: None,
            url: Some(url.into()),
        }
    }

    pub fn to_ref(&self) -> NodeRef {
        NodeRef {
            id: self.id.clone(),
            name: self.name.clone(),
            node_type: self.node_type,
        }
    }
}

/// The `{id, name, type}` projection returned by search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRef {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
}

/// A node together with its stored (pre-normalized) embedding vector.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedNode {
    pub node: NodeRef,
    pub embedding: Vec<f32>,
}

/// Relationship kinds between graph nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Skill → Skill: `from` must be learned before `to`
    Prerequisite,
    /// URL → Skill: the resource teaches the skill
    Teaches,
}

/// A directed edge in the knowledge graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
}

/// Read access to the knowledge graph.
///
/// Every method acquires whatever connection or lock it needs for the
/// duration of the call and releases it before returning, on error paths too.
///
/// Implementations: JSON snapshot file, in-memory (for testing).
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// The backend name (e.g., "json", "in_memory").
    fn name(&self) -> &str;

    /// All Skill/URL nodes that carry an embedding, in retrieval order.
    async fn embedded_nodes(&self) -> Result<Vec<EmbeddedNode>, StoreError>;

    /// All nodes, without vectors.
    async fn nodes(&self) -> Result<Vec<GraphNode>, StoreError>;

    /// Look up a node by ID.
    async fn node(&self, id: &str) -> Result<Option<GraphNode>, StoreError>;

    /// All edges.
    async fn edges(&self) -> Result<Vec<GraphEdge>, StoreError>;
}
