//! Semantic similarity search over the embedded nodes of a knowledge store.

use serde::{Deserialize, Serialize};
use skillweave_core::embedding::Embedder;
use skillweave_core::error::SearchError;
use skillweave_core::graph::{KnowledgeStore, NodeRef};
use std::sync::Arc;
use tracing::debug;
use crate::vector::rank_by_similarity;

/// Note returned when the store has no node carrying a vector.
pub const NO_EMBEDDINGS_NOTE: &str = "no embeddings available";

/// A node with its similarity to the query, in [-1, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredNode {
    pub node: NodeRef,
    pub similarity: f32,
}

/// Search output, returned to the model verbatim as the tool result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub results: Vec<ScoredNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Embeds a query and ranks every embedded node by dot product against it.
///
/// No thresholding: the caller judges relevance. Store and embedding failures
/// propagate; nothing is retried here.
#[derive(Clone)]
pub struct SimilaritySearch {
    store: Arc<dyn KnowledgeStore>,
    embedder: Arc<dyn Embedder>,
}

impl SimilaritySearch {
    pub fn new(store: Arc<dyn KnowledgeStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self { store, embedder }
    }

    pub fn store(&self) -> &Arc<dyn KnowledgeStore> {
        &self.store
    }

    pub async fn search(&self, query: &str, limit: usize) -> Result<SearchOutcome, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let candidates = self.store.embedded_nodes().await?;
        if candidates.is_empty() {
            debug!(store = self.store.name(), "Search skipped, store has no embeddings");
            return Ok(SearchOutcome {
                results: Vec::new(),
                note: Some(NO_EMBEDDINGS_NOTE.into()),
            });
        }

        let query_vector = self.embedder.embed(query).await?;
        let results = rank_by_similarity(&candidates, &query_vector, limit);

        debug!(
            store = self.store.name(),
            model = self.embedder.model(),
            candidates = candidates.len(),
            returned = results.len(),
            "Similarity search complete"
        );

        Ok(SearchOutcome {
            results,
            note: None,
        })
    }
}
