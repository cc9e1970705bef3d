//! HTTP API gateway for skillweave.
//!
//! Exposes the chat endpoint plus search, graph and health routes.
//! Built on Axum.

pub mod api;
pub mod services;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::{
    Router,
    response::Json,
    routing::{get, post},
};
use serde::Serialize;
use skillweave_config::{AppConfig, GatewayConfig};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

pub use api::SharedState;
pub use services::Services;

/// Build the router with all routes and layers.
///
/// Layers applied:
/// - CORS restricted to `allowed_origins` (none = same-origin only)
/// - Request body size limit
/// - HTTP trace logging
pub fn build_router(state: SharedState, gateway: &GatewayConfig) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/chat", post(api::chat_handler))
        .route("/api/search", get(api::search_handler))
        .route("/api/graph", get(api::graph_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(gateway.body_limit_bytes))
        .layer(cors_layer(&gateway.allowed_origins))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600));

    if allowed.is_empty() {
        layer
    } else {
        layer.allow_origin(AllowOrigin::list(allowed))
    }
}

/// Start the gateway HTTP server.
///
/// Builds provider, embedder, store and tools once and shares them via Arc.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let services = Services::from_config(&config)?;
    let _event_logger = services.spawn_event_logger();
    let app = build_router(Arc::new(services), &config.gateway);

    info!(addr = %addr, model = %config.llm.model, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_state() -> SharedState {
        let mut config = AppConfig::default();
        config.graph.backend = "memory".into();
        Arc::new(Services::from_config(&config).unwrap())
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = build_router(test_state(), &GatewayConfig::default());

        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let gateway = GatewayConfig {
            body_limit_bytes: 64,
            ..GatewayConfig::default()
        };
        let app = build_router(test_state(), &gateway);
        let body = format!(r#"{{"message":"{}"}}"#, "x".repeat(1024));

        let req = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("Content-Type", "application/json")
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn cors_allows_configured_origin() {
        let gateway = GatewayConfig {
            allowed_origins: vec!["http://localhost:5173".into()],
            ..GatewayConfig::default()
        };
        let app = build_router(test_state(), &gateway);

        let req = Request::builder()
            .uri("/health")
            .header("Origin", "http://localhost:5173")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "http://localhost:5173"
        );
    }
}
