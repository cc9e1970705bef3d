//! JSON API handlers.
//!
//! - `POST /api/chat` — one orchestrated chat turn
//! - `GET /api/search?query=&limit=` — semantic search over the graph
//! - `GET /api/graph` — all nodes and edges, without vectors

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use skillweave_core::chat::{ChatRequest, ChatResponse};
use skillweave_core::error::{ChatError, SearchError};
use skillweave_core::graph::{GraphEdge, GraphNode};
use skillweave_graph::SearchOutcome;
use std::sync::Arc;
use tracing::{error, info};
use crate::services::Services;

pub type SharedState = Arc<Services>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn client_error(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
            details: None,
        }),
    )
}

fn server_error(summary: &str, details: impl std::fmt::Display) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: summary.into(),
            details: Some(details.to_string()),
        }),
    )
}

pub async fn chat_handler(
    State(state): State<SharedState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(body) = body.map_err(|e| client_error(format!("Invalid JSON body: {}", e.body_text())))?;
    let request = ChatRequest::from_value(body).map_err(|e| client_error(e.to_string()))?;

    match state.orchestrator.handle(&request).await {
        Ok(response) => Ok(Json(response)),
        Err(ChatError::InvalidRequest(message)) => Err(client_error(message)),
        Err(e) => {
            error!(error = %e, "Chat request failed");
            Err(server_error("Chat request failed", e))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

pub async fn search_handler(
    State(state): State<SharedState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchOutcome>, ApiError> {
    let query = params.query.unwrap_or_default();
    let limit = state.limits.resolve(params.limit);

    info!(query = %query, limit, "Search request");
    match state.search.search(&query, limit).await {
        Ok(outcome) => Ok(Json(outcome)),
        Err(SearchError::EmptyQuery) => Err(client_error("Query is required")),
        Err(e) => {
            error!(error = %e, "Search failed");
            Err(server_error("Search failed", e))
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GraphResponse {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

pub async fn graph_handler(State(state): State<SharedState>) -> Result<Json<GraphResponse>, ApiError> {
    let read = async {
        let nodes = state.store.nodes().await?;
        let edges = state.store.edges().await?;
        Ok::<_, skillweave_core::error::StoreError>(GraphResponse { nodes, edges })
    };

    read.await.map(Json).map_err(|e| {
        error!(error = %e, "Graph read failed");
        server_error("Graph read failed", e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_router;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use skillweave_config::{AppConfig, GatewayConfig};
    use skillweave_core::embedding::Embedder;
    use skillweave_core::error::{EmbeddingError, ProviderError};
    use skillweave_core::graph::{EdgeKind, KnowledgeStore};
    use skillweave_core::provider::{Provider, ProviderRequest, ProviderResponse};
    use skillweave_graph::InMemoryGraphStore;
    use skillweave_tools::LoggingSink;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    /// Lightweight mock provider for gateway tests.
    struct MockProvider {
        replies: Mutex<VecDeque<Result<String, ProviderError>>>,
        calls: AtomicUsize,
    }

    impl MockProvider {
        fn new(replies: Vec<Result<String, ProviderError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Provider for MockProvider {
        fn name(&self) -> &str {
            "gateway_mock"
        }

        async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(r#"{"type":"final","message":"default"}"#.into()));
            reply.map(|content| ProviderResponse {
                content,
                usage: None,
                model: "mock-model".into(),
            })
        }
    }

    struct UnitEmbedder;

    #[async_trait]
    impl Embedder for UnitEmbedder {
        fn model(&self) -> &str {
            "unit"
        }
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
            Ok(vec![1.0, 0.0])
        }
    }

    async fn test_state(provider: Arc<MockProvider>) -> SharedState {
        let store = InMemoryGraphStore::new();
        store
            .add_node(GraphNode::skill("hooks", "React hooks"), Some(vec![1.0, 0.0]))
            .await;
        store
            .add_node(GraphNode::skill("css", "CSS grid"), Some(vec![0.0, 1.0]))
            .await;
        store
            .add_edge(GraphEdge {
                from: "css".into(),
                to: "hooks".into(),
                kind: EdgeKind::Prerequisite,
            })
            .await;
        let store: Arc<dyn KnowledgeStore> = Arc::new(store);

        Arc::new(Services::assemble(
            &AppConfig::default(),
            provider,
            Arc::new(UnitEmbedder),
            store,
            Arc::new(LoggingSink),
        ))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_chat(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn chat_final_reply() {
        let provider = MockProvider::new(vec![Ok(
            r#"{"type":"final","message":"React hooks are great.","suggestedActions":["Learn useState"]}"#.into(),
        )]);
        let app = build_router(test_state(provider.clone()).await, &GatewayConfig::default());

        let response = app
            .oneshot(post_chat(r#"{"message":"I want to learn React hooks"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["message"], "React hooks are great.");
        assert_eq!(json["relatedMaterials"], serde_json::json!([]));
        assert_eq!(json["suggestedActions"], serde_json::json!(["Learn useState"]));
        assert!(json["conversationState"]["sessionId"].as_str().unwrap().starts_with("session_"));
        assert!(json["conversationState"]["lastUpdated"].is_string());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn chat_rejects_invalid_messages_without_llm_call() {
        let provider = MockProvider::new(vec![]);
        let state = test_state(provider.clone()).await;

        for body in [
            r#"{"message":""}"#,
            r#"{"message":"   "}"#,
            r#"{"message":null}"#,
            r#"{"message":42}"#,
            r#"{}"#,
            "not json",
        ] {
            let response = build_router(state.clone(), &GatewayConfig::default())
                .oneshot(post_chat(body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
            let json = body_json(response).await;
            assert!(json["error"].is_string());
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn chat_blank_message_has_actionable_error() {
        let app = build_router(test_state(MockProvider::new(vec![])).await, &GatewayConfig::default());
        let response = app.oneshot(post_chat(r#"{"message":"  "}"#)).await.unwrap();
        let json = body_json(response).await;
        assert_eq!(json["error"], skillweave_core::chat::INVALID_MESSAGE);
    }

    #[tokio::test]
    async fn chat_provider_failure_is_500() {
        let provider = MockProvider::new(vec![Err(ProviderError::Network("connection reset".into()))]);
        let app = build_router(test_state(provider).await, &GatewayConfig::default());

        let response = app.oneshot(post_chat(r#"{"message":"hello"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Chat request failed");
        assert!(json["details"].as_str().unwrap().contains("connection reset"));
    }

    #[tokio::test]
    async fn chat_search_round_trip() {
        let provider = MockProvider::new(vec![
            Ok(r#"{"type":"tool_call","tool":"search_materials","args":{"query":"React hooks","limit":5}}"#.into()),
            Ok(r#"{"type":"final","message":"Found it.","relatedMaterials":[{"nodeId":"hooks","name":"React hooks","type":"skill"}]}"#.into()),
        ]);
        let app = build_router(test_state(provider.clone()).await, &GatewayConfig::default());

        let response = app
            .oneshot(post_chat(r#"{"message":"I want to learn React hooks","sessionId":"session_7"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Found it.");
        assert_eq!(json["relatedMaterials"][0]["nodeId"], "hooks");
        assert_eq!(json["conversationState"]["sessionId"], "session_7");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn search_endpoint() {
        let app = build_router(test_state(MockProvider::new(vec![])).await, &GatewayConfig::default());
        let response = app.oneshot(get("/api/search?query=hooks&limit=1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let results = json["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["node"]["id"], "hooks");
    }

    #[tokio::test]
    async fn search_requires_query() {
        let state = test_state(MockProvider::new(vec![])).await;
        for uri in ["/api/search", "/api/search?query=%20%20"] {
            let response = build_router(state.clone(), &GatewayConfig::default()).oneshot(get(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn graph_endpoint() {
        let app = build_router(test_state(MockProvider::new(vec![])).await, &GatewayConfig::default());
        let response = app.oneshot(get("/api/graph")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["nodes"].as_array().unwrap().len(), 2);
        assert!(json["nodes"][0].get("embedding").is_none());
        assert_eq!(json["edges"][0]["kind"], "prerequisite");
    }

    #[tokio::test]
    async fn graph_store_failure_is_500() {
        let mut config = AppConfig::default();
        config.graph.path = Some("/nonexistent/skillweave/graph.json".into());
        let state = Arc::new(Services::from_config(&config).unwrap());

        let response = build_router(state, &GatewayConfig::default()).oneshot(get("/api/graph")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Graph read failed");
    }
}
