//! # skillweave core
//!
//! Domain types, traits, and error definitions for the skillweave backend:
//! a graph of learning skills and resources, fronted by an LLM chat that can
//! search the graph and queue requests for missing material.
//!
//! ## Design Philosophy
//!
//! Every external collaborator is a trait here. Implementations live in their
//! respective crates:
//! - `Provider` (LLM completions) and the OpenAI-compatible client in `skillweave-providers`
//! - `Embedder` (text → unit vector) in `skillweave-providers`
//! - `KnowledgeStore` (skill/URL graph) in `skillweave-graph`
//! - `Tool` implementations in `skillweave-tools`
//!
//! The orchestrator and its tests take these as injected `Arc<dyn …>` values,
//! so fakes can be substituted anywhere.

pub mod chat;
pub mod decision;
pub mod embedding;
pub mod error;
pub mod event;
pub mod graph;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use chat::{ChatRequest, ChatResponse, ConversationState};
pub use decision::{FinalDecision, LlmDecision, MaterialRef, ToolCallDecision};
pub use embedding::Embedder;
pub use error::{ChatError, Error, Result};
pub use event::{DomainEvent, EventBus};
pub use graph::{EdgeKind, EmbeddedNode, GraphEdge, GraphNode, KnowledgeStore, NodeRef, NodeType};
pub use message::{ConversationTurn, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse};
pub use tool::{Tool, ToolRegistry, ToolResult};
