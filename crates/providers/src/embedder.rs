//! Query embedder backed by a provider's `/embeddings` endpoint.

use async_trait::async_trait;
use skillweave_core::embedding::Embedder;
use skillweave_core::error::EmbeddingError;
use skillweave_core::provider::{EmbeddingRequest, Provider};
use std::sync::Arc;
use tracing::debug;

/// Embeds single texts through any [`Provider`] that implements `embed`.
///
/// Output vectors are L2-normalized so dot-product scores against stored
/// (normalized) node embeddings are cosine similarities.
pub struct ProviderEmbedder {
    provider: Arc<dyn Provider>,
    model: String,
    dimensions: Option<usize>,
}

impl ProviderEmbedder {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            dimensions: None,
        }
    }

    /// Reject vectors whose length differs from `dimensions`.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }
}

#[async_trait]
impl Embedder for ProviderEmbedder {
    fn model(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let response = self
            .provider
            .embed(EmbeddingRequest {
                model: self.model.clone(),
                inputs: vec![text.to_string()],
            })
            .await
            .map_err(|e| EmbeddingError::Failed(e.to_string()))?;

        let mut vector = response
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::Failed("Provider returned no embeddings".into()))?;

        if let Some(expected) = self.dimensions
            && vector.len() != expected
        {
            return Err(EmbeddingError::DimensionMismatch {
                expected,
                actual: vector.len(),
            });
        }

        l2_normalize(&mut vector);
        debug!(model = %self.model, dims = vector.len(), "Embedded query");
        Ok(vector)
    }
}

/// Scale `v` to unit length in place. Zero vectors are left untouched.
pub fn l2_normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    if norm < 1e-12 {
        return;
    }
    for x in v.iter_mut() {
        *x = (*x as f64 / norm) as f32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillweave_core::error::ProviderError;
    use skillweave_core::provider::{EmbeddingResponse, ProviderRequest, ProviderResponse};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedEmbeddings {
        vector: Option<Vec<f32>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Provider for FixedEmbeddings {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn complete(&self, _: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            Err(ProviderError::NotConfigured("completion".into()))
        }

        async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.vector {
                Some(v) => Ok(EmbeddingResponse {
                    embeddings: vec![v.clone()],
                    model: request.model,
                    usage: None,
                }),
                None => Err(ProviderError::Network("connection refused".into())),
            }
        }
    }

    fn embedder(vector: Option<Vec<f32>>) -> (Arc<FixedEmbeddings>, ProviderEmbedder) {
        let provider = Arc::new(FixedEmbeddings {
            vector,
            calls: AtomicUsize::new(0),
        });
        let embedder = ProviderEmbedder::new(provider.clone(), "text-embedding-3-small");
        (provider, embedder)
    }

    #[test]
    fn normalize_produces_unit_vector() {
        let mut v = vec![3.0, 4.0];
        l2_normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn normalize_leaves_zero_vector() {
        let mut v = vec![0.0, 0.0, 0.0];
        l2_normalize(&mut v);
        assert_eq!(v, vec![0.0, 0.0, 0.0]);
    }

    #[tokio::test]
    async fn embed_normalizes_output() {
        let (_, e) = embedder(Some(vec![0.0, 2.0]));
        let v = e.embed("react hooks").await.unwrap();
        assert_eq!(v, vec![0.0, 1.0]);
        assert_eq!(e.model(), "text-embedding-3-small");
    }

    #[tokio::test]
    async fn blank_text_is_rejected_without_calling_provider() {
        let (provider, e) = embedder(Some(vec![1.0]));
        assert!(matches!(e.embed("  ").await, Err(EmbeddingError::EmptyInput)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn dimension_check() {
        let (_, e) = embedder(Some(vec![1.0, 0.0]));
        let e = e.with_dimensions(3);
        let err = e.embed("x").await.unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch { expected: 3, actual: 2 }
        ));
    }

    #[tokio::test]
    async fn provider_failure_maps_to_failed() {
        let (_, e) = embedder(None);
        assert!(matches!(e.embed("x").await, Err(EmbeddingError::Failed(_))));
    }
}
