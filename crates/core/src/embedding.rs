//! Text to fixed-length unit vector.

use async_trait::async_trait;
use crate::error::EmbeddingError;

/// Maps a text to a fixed-length, L2-normalized vector.
///
/// Assumed deterministic for a given model version. Vectors stored in the
/// knowledge store must come from the same model for scores to mean anything.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// The embedding model name (e.g., "text-embedding-3-small").
    fn model(&self) -> &str;

    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}
