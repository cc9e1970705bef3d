//! LLM and embedding provider implementations for skillweave.
//!
//! The chat provider implements `skillweave_core::Provider`; the embedder
//! implements `skillweave_core::Embedder` on top of any provider that
//! supports `embed`. The factory builds both from configuration.

pub mod embedder;
pub mod factory;
pub mod openai_compat;

pub use embedder::{ProviderEmbedder, l2_normalize};
pub use factory::{build_chat_provider, build_embedder};
pub use openai_compat::OpenAiCompatProvider;
