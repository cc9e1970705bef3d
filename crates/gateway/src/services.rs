//! Builds every subsystem once from config and shares it.

use skillweave_chat::ChatOrchestrator;
use skillweave_config::AppConfig;
use skillweave_core::embedding::Embedder;
use skillweave_core::event::{DomainEvent, EventBus};
use skillweave_core::graph::KnowledgeStore;
use skillweave_core::provider::Provider;
use skillweave_graph::{InMemoryGraphStore, JsonGraphStore, SimilaritySearch};
use skillweave_tools::{LoggingSink, MaterialRequestSink, SearchLimits, WebhookSink, default_registry};
use std::sync::Arc;
use tracing::{debug, info};

/// Everything the HTTP handlers and CLI commands need.
pub struct Services {
    pub orchestrator: Arc<ChatOrchestrator>,
    pub search: SimilaritySearch,
    pub store: Arc<dyn KnowledgeStore>,
    pub event_bus: Arc<EventBus>,
    pub limits: SearchLimits,
}

impl Services {
    /// Build services from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, skillweave_core::Error> {
        let provider = skillweave_providers::build_chat_provider(config);
        let embedder = skillweave_providers::build_embedder(config);
        let store = build_store(config)?;
        let sink = build_sink(config);
        Ok(Self::assemble(config, provider, embedder, store, sink))
    }

    /// Wire pre-built collaborators together using the `[chat]` and `[llm]`
    /// settings of `config`.
    pub fn assemble(
        config: &AppConfig,
        provider: Arc<dyn Provider>,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn KnowledgeStore>,
        sink: Arc<dyn MaterialRequestSink>,
    ) -> Self {
        let event_bus = Arc::new(EventBus::default());
        let limits = SearchLimits {
            default: config.chat.default_search_limit,
            max: config.chat.max_search_limit,
        };
        let search = SimilaritySearch::new(store.clone(), embedder);
        let tools = Arc::new(default_registry(
            search.clone(),
            sink,
            limits,
            Some(event_bus.clone()),
        ));

        let orchestrator = ChatOrchestrator::new(provider, &config.llm.model, tools)
            .with_temperature(config.llm.temperature)
            .with_max_tokens(config.llm.max_tokens)
            .with_max_tool_rounds(config.chat.max_tool_rounds)
            .with_event_bus(event_bus.clone());

        Self {
            orchestrator: Arc::new(orchestrator),
            search,
            store,
            event_bus,
            limits,
        }
    }

    /// Log every domain event at debug level from a background task.
    pub fn spawn_event_logger(&self) -> tokio::task::JoinHandle<()> {
        let mut rx = self.event_bus.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => log_event(&event),
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "Event logger lagged");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

fn log_event(event: &DomainEvent) {
    match event {
        DomainEvent::ToolExecuted {
            tool_name,
            success,
            duration_ms,
            ..
        } => debug!(tool = %tool_name, success, duration_ms, "event: tool executed"),
        DomainEvent::MaterialRequested { request_id, topic, .. } => {
            debug!(request_id = %request_id, topic = %topic, "event: material requested")
        }
        DomainEvent::ResponseGenerated {
            session_id,
            model,
            llm_calls,
            fallback,
            ..
        } => debug!(
            session_id = %session_id,
            model = %model,
            llm_calls,
            fallback,
            "event: response generated"
        ),
    }
}

fn build_store(config: &AppConfig) -> Result<Arc<dyn KnowledgeStore>, skillweave_core::Error> {
    match config.graph.backend.as_str() {
        "json" => {
            let path = config.graph.resolved_path();
            info!(path = %path.display(), "Using JSON graph snapshot");
            Ok(Arc::new(JsonGraphStore::new(path)))
        }
        "memory" => {
            info!("Using empty in-memory graph");
            Ok(Arc::new(InMemoryGraphStore::new()))
        }
        other => Err(skillweave_core::Error::Config {
            message: format!("Unknown graph backend '{other}' (expected 'json' or 'memory')"),
        }),
    }
}

fn build_sink(config: &AppConfig) -> Arc<dyn MaterialRequestSink> {
    match &config.notifications.webhook_url {
        Some(url) if !url.trim().is_empty() => {
            info!("Material requests will be posted to the configured webhook");
            Arc::new(WebhookSink::new(url.trim()))
        }
        _ => Arc::new(LoggingSink),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds() {
        let services = Services::from_config(&AppConfig::default()).unwrap();
        assert_eq!(services.store.name(), "json");
        assert_eq!(services.limits.default, 5);
        assert_eq!(services.orchestrator.max_tool_rounds(), 1);
        assert_eq!(services.orchestrator.model(), "gpt-4o-mini");
    }

    #[test]
    fn memory_backend() {
        let mut config = AppConfig::default();
        config.graph.backend = "memory".into();
        let services = Services::from_config(&config).unwrap();
        assert_eq!(services.store.name(), "in_memory");
    }

    #[test]
    fn unknown_backend_is_config_error() {
        let mut config = AppConfig::default();
        config.graph.backend = "neo4j".into();
        assert!(matches!(
            Services::from_config(&config),
            Err(skillweave_core::Error::Config { .. })
        ));
    }

    #[test]
    fn webhook_sink_when_configured() {
        let mut config = AppConfig::default();
        assert_eq!(build_sink(&config).name(), "log");
        config.notifications.webhook_url = Some("https://discord.com/api/webhooks/1/x".into());
        assert_eq!(build_sink(&config).name(), "webhook");
    }
}
