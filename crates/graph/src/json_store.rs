//! JSON snapshot backend: the whole graph exported to a single file.
//!
//! Format:
//!
//! ```json
//! {
//!   "nodes": [{"id": "s1", "name": "React hooks", "type": "skill", "embedding": [0.1, ...]}],
//!   "edges": [{"from": "u1", "to": "s1", "kind": "teaches"}]
//! }
//! ```
//!
//! The file is opened and read for every operation and nothing is cached, so
//! an exporter can replace it while the server runs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use skillweave_core::error::StoreError;
use skillweave_core::graph::{EmbeddedNode, GraphEdge, GraphNode, KnowledgeStore};
use std::path::{Path, PathBuf};
use tracing::debug;

/// On-disk snapshot layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<SnapshotNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotNode {
    #[serde(flatten)]
    pub node: GraphNode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

/// A read-only store over a JSON snapshot file.
pub struct JsonGraphStore {
    path: PathBuf,
}

impl JsonGraphStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `snapshot` to `path`, creating parent directories.
    pub async fn write_snapshot(path: &Path, snapshot: &GraphSnapshot) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StoreError::QueryFailed(format!("Failed to create graph directory: {e}"))
            })?;
        }
        let content = serde_json::to_string_pretty(snapshot)
            .map_err(|e| StoreError::QueryFailed(format!("Failed to serialize graph: {e}")))?;
        tokio::fs::write(path, content)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("Failed to write graph file: {e}")))
    }

    async fn load(&self) -> Result<GraphSnapshot, StoreError> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            StoreError::Unavailable(format!("{}: {e}", self.path.display()))
        })?;
        let snapshot: GraphSnapshot = serde_json::from_str(&content)
            .map_err(|e| StoreError::Corrupt(format!("{}: {e}", self.path.display())))?;
        debug!(
            path = %self.path.display(),
            nodes = snapshot.nodes.len(),
            edges = snapshot.edges.len(),
            "Graph snapshot loaded"
        );
        Ok(snapshot)
    }
}

#[async_trait]
impl KnowledgeStore for JsonGraphStore {
    fn name(&self) -> &str {
        "json"
    }

    async fn embedded_nodes(&self) -> Result<Vec<EmbeddedNode>, StoreError> {
        let snapshot = self.load().await?;
        Ok(snapshot
            .nodes
            .into_iter()
            .filter_map(|n| {
                n.embedding.map(|embedding| EmbeddedNode {
                    node: n.node.to_ref(),
                    embedding,
                })
            })
            .collect())
    }

    async fn nodes(&self) -> Result<Vec<GraphNode>, StoreError> {
        Ok(self.load().await?.nodes.into_iter().map(|n| n.node).collect())
    }

    async fn node(&self, id: &str) -> Result<Option<GraphNode>, StoreError> {
        Ok(self
            .load()
            .await?
            .nodes
            .into_iter()
            .find(|n| n.node.id == id)
            .map(|n| n.node))
    }

    async fn edges(&self) -> Result<Vec<GraphEdge>, StoreError> {
        Ok(self.load().await?.edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillweave_core::graph::{EdgeKind, NodeType};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SNAPSHOT: &str = r#"{
        "nodes": [
            {"id": "s1", "name": "React hooks", "type": "Skill", "embedding": [1.0, 0.0]},
            {"id": "s0", "name": "JavaScript", "type": "skill"},
            {"id": "u1", "name": "Hooks at a glance", "type": "URL",
             "url": "https://react.dev/reference/react", "embedding": [0.0, 1.0]}
        ],
        "edges": [
            {"from": "s0", "to": "s1", "kind": "prerequisite"},
            {"from": "u1", "to": "s1", "kind": "teaches"}
        ]
    }"#;

    fn snapshot_file(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[tokio::test]
    async fn reads_embedded_nodes_in_snapshot_order() {
        let f = snapshot_file(SNAPSHOT);
        let store = JsonGraphStore::new(f.path());

        let embedded = store.embedded_nodes().await.unwrap();
        assert_eq!(embedded.len(), 2);
        assert_eq!(embedded[0].node.id, "s1");
        assert_eq!(embedded[1].node.node_type, NodeType::Url);
        assert_eq!(embedded[1].embedding, vec![0.0, 1.0]);
    }

    #[tokio::test]
    async fn reads_nodes_and_edges() {
        let f = snapshot_file(SNAPSHOT);
        let store = JsonGraphStore::new(f.path());

        assert_eq!(store.nodes().await.unwrap().len(), 3);
        let u1 = store.node("u1").await.unwrap().unwrap();
        assert_eq!(u1.url.as_deref(), Some("https://react.dev/reference/react"));
        assert!(store.node("nope").await.unwrap().is_none());

        let edges = store.edges().await.unwrap();
        assert_eq!(edges[1].kind, EdgeKind::Teaches);
    }

    #[tokio::test]
    async fn missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonGraphStore::new(dir.path().join("absent.json"));
        assert!(matches!(
            store.embedded_nodes().await,
            Err(StoreError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn malformed_file_is_corrupt() {
        let f = snapshot_file("{ nodes: oops");
        let store = JsonGraphStore::new(f.path());
        assert!(matches!(store.nodes().await, Err(StoreError::Corrupt(_))));
    }

    #[tokio::test]
    async fn picks_up_replaced_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph").join("graph.json");

        let mut snapshot = GraphSnapshot::default();
        JsonGraphStore::write_snapshot(&path, &snapshot).await.unwrap();
        let store = JsonGraphStore::new(&path);
        assert!(store.embedded_nodes().await.unwrap().is_empty());

        snapshot.nodes.push(SnapshotNode {
            node: GraphNode::skill("s9", "Rust"),
            embedding: Some(vec![1.0]),
        });
        JsonGraphStore::write_snapshot(&path, &snapshot).await.unwrap();
        assert_eq!(store.embedded_nodes().await.unwrap().len(), 1);
    }
}
