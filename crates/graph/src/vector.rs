//! Vector similarity utilities.
//!
//! Stored node embeddings and query embeddings are both unit vectors, so the
//! plain dot product is the cosine similarity.

use skillweave_core::graph::EmbeddedNode;
use tracing::warn;
use crate::search::ScoredNode;

/// Dot product of two equal-length vectors, accumulated in f64.
///
/// Returns `None` when the lengths differ.
pub fn dot(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() {
        return None;
    }
    let sum: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| *x as f64 * *y as f64)
        .sum();
    Some(sum as f32)
}

/// Score candidates against `query`, highest first, keeping at most `limit`.
///
/// The sort is stable: equal scores keep retrieval order. Candidates whose
/// vector length differs from the query's, or whose score is not finite, are
/// skipped.
pub fn rank_by_similarity(
    candidates: &[EmbeddedNode],
    query: &[f32],
    limit: usize,
) -> Vec<ScoredNode> {
    let mut scored: Vec<ScoredNode> = candidates
        .iter()
        .filter_map(|candidate| match dot(&candidate.embedding, query) {
            Some(similarity) if similarity.is_finite() => Some(ScoredNode {
                node: candidate.node.clone(),
                similarity,
            }),
            Some(similarity) => {
                warn!(
                    node_id = %candidate.node.id,
                    similarity = %similarity,
                    "Skipping node with non-finite similarity"
                );
                None
            }
            None => {
                warn!(
                    node_id = %candidate.node.id,
                    stored = candidate.embedding.len(),
                    query = query.len(),
                    "Skipping node with mismatched embedding dimensions"
                );
                None
            }
        })
        .collect();

    scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    scored.truncate(limit);
    scored
}
