//! Build the chat provider and query embedder from configuration.

use skillweave_config::AppConfig;
use skillweave_core::embedding::Embedder;
use skillweave_core::provider::Provider;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use crate::embedder::ProviderEmbedder;
use crate::openai_compat::OpenAiCompatProvider;

/// The LLM provider named by `llm.provider`.
pub fn build_chat_provider(config: &AppConfig) -> Arc<dyn Provider> {
    let llm = &config.llm;
    let base_url = llm
        .api_url
        .clone()
        .unwrap_or_else(|| default_base_url(&llm.provider));

    info!(provider = %llm.provider, model = %llm.model, url = %base_url, "Building chat provider");

    Arc::new(OpenAiCompatProvider::with_timeout(
        &llm.provider,
        base_url,
        llm.api_key.clone().unwrap_or_default(),
        Duration::from_secs(llm.timeout_secs),
    ))
}

/// The query embedder. Falls back to the LLM endpoint and key when the
/// `[embedding]` section leaves them unset.
pub fn build_embedder(config: &AppConfig) -> Arc<dyn Embedder> {
    let emb = &config.embedding;
    let base_url = emb
        .api_url
        .clone()
        .or_else(|| config.llm.api_url.clone())
        .unwrap_or_else(|| default_base_url(&config.llm.provider));
    let api_key = emb
        .api_key
        .clone()
        .or_else(|| config.llm.api_key.clone())
        .unwrap_or_default();

    let provider = Arc::new(OpenAiCompatProvider::with_timeout(
        format!("{}-embeddings", config.llm.provider),
        base_url,
        api_key,
        Duration::from_secs(emb.timeout_secs),
    ));

    let embedder = ProviderEmbedder::new(provider, &emb.model);
    match emb.dimensions {
        Some(d) => Arc::new(embedder.with_dimensions(d)),
        None => Arc::new(embedder),
    }
}

/// Get the default base URL for well-known providers.
pub fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        "llamacpp" | "llama.cpp" => "http://localhost:8080/v1".into(),
        _ => "https://api.openai.com/v1".into(),
    }
}
