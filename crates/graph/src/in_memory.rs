//! In-memory graph store, for tests and demos.

use async_trait::async_trait;
use skillweave_core::error::StoreError;
use skillweave_core::graph::{EmbeddedNode, GraphEdge, GraphNode, KnowledgeStore};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Graph {
    nodes: Vec<(GraphNode, Option<Vec<f32>>)>,
    edges: Vec<GraphEdge>,
}

/// A graph store that keeps nodes, vectors and edges in a Vec.
///
/// Each read takes the lock for the duration of one call only.
#[derive(Clone, Default)]
pub struct InMemoryGraphStore {
    graph: Arc<RwLock<Graph>>,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a node. Node order is insertion order.
    pub async fn add_node(&self, node: GraphNode, embedding: Option<Vec<f32>>) {
        let mut graph = self.graph.write().await;
        match graph.nodes.iter().position(|(n, _)| n.id == node.id) {
            Some(i) => graph.nodes[i] = (node, embedding),
            None => graph.nodes.push((node, embedding)),
        }
    }

    pub async fn add_edge(&self, edge: GraphEdge) {
        self.graph.write().await.edges.push(edge);
    }

    pub async fn len(&self) -> usize {
        self.graph.read().await.nodes.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl KnowledgeStore for InMemoryGraphStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn embedded_nodes(&self) -> Result<Vec<EmbeddedNode>, StoreError> {
        let graph = self.graph.read().await;
        Ok(graph
            .nodes
            .iter()
            .filter_map(|(n, e)| {
                e.as_ref().map(|embedding| EmbeddedNode {
                    node: n.to_ref(),
                    embedding: embedding.clone(),
                })
            })
            .collect())
    }

    async fn nodes(&self) -> Result<Vec<GraphNode>, StoreError> {
        let graph = self.graph.read().await;
        Ok(graph.nodes.iter().map(|(n, _)| n.clone()).collect())
    }

    async fn node(&self, id: &str) -> Result<Option<GraphNode>, StoreError> {
        let graph = self.graph.read().await;
        Ok(graph.nodes.iter().find(|(n, _)| n.id == id).map(|(n, _)| n.clone()))
    }

    async fn edges(&self) -> Result<Vec<GraphEdge>, StoreError> {
        Ok(self.graph.read().await.edges.clone())
    }
}
