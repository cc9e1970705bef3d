//! Where queued material requests go.
//!
//! `record` is synchronous and must not block: delivery is at-most-once and
//! the chat turn never waits on it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// A user's request for material the graph does not yet have.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRequest {
    pub request_id: String,
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_context: Option<String>,
    pub requested_at: DateTime<Utc>,
}

impl MaterialRequest {
    /// A new request with a fresh `req_<uuid>` identifier.
    pub fn new(topic: impl Into<String>, user_context: Option<String>) -> Self {
        Self {
            request_id: format!("req_{}", Uuid::new_v4().simple()),
            topic: topic.into(),
            user_context,
            requested_at: Utc::now(),
        }
    }

    /// Human-readable notification text.
    pub fn summary(&self) -> String {
        let mut text = format!(
            "New material request `{}`\nTopic: {}",
            self.request_id, self.topic
        );
        if let Some(ctx) = &self.user_context {
            text.push_str(&format!("\nContext: {ctx}"));
        }
        text
    }
}

/// Receives material requests. Implementations must return promptly.
pub trait MaterialRequestSink: Send + Sync {
    fn name(&self) -> &str;

    fn record(&self, request: &MaterialRequest);
}

/// Writes each request to the log.
pub struct LoggingSink;

impl MaterialRequestSink for LoggingSink {
    fn name(&self) -> &str {
        "log"
    }

    fn record(&self, request: &MaterialRequest) {
        info!(
            request_id = %request.request_id,
            topic = %request.topic,
            user_context = request.user_context.as_deref().unwrap_or(""),
            "Material addition requested"
        );
    }
}

/// Posts each request to a Discord-compatible webhook from a detached task.
pub struct WebhookSink {
    url: String,
    client: reqwest::Client,
}

impl WebhookSink {
    pub fn new(url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            url: url.into(),
            client,
        }
    }
}

impl MaterialRequestSink for WebhookSink {
    fn name(&self) -> &str {
        "webhook"
    }

    fn record(&self, request: &MaterialRequest) {
        LoggingSink.record(request);

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!(request_id = %request.request_id, "No async runtime, webhook notification dropped");
            return;
        };

        let client = self.client.clone();
        let url = self.url.clone();
        let request_id = request.request_id.clone();
        let body = serde_json::json!({ "content": request.summary() });

        handle.spawn(async move {
            match client.post(&url).json(&body).send().await {
                Ok(resp) if resp.status().is_success() => {
                    info!(request_id = %request_id, "Material request notification delivered");
                }
                Ok(resp) => {
                    warn!(request_id = %request_id, status = resp.status().as_u16(), "Webhook rejected material request");
                }
                Err(e) => {
                    warn!(request_id = %request_id, error = %e, "Webhook delivery failed");
                }
            }
        });
    }
}

/// Pushes requests onto an unbounded queue for an in-process consumer.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<MaterialRequest>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<MaterialRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl MaterialRequestSink for ChannelSink {
    fn name(&self) -> &str {
        "channel"
    }

    fn record(&self, request: &MaterialRequest) {
        if self.tx.send(request.clone()).is_err() {
            warn!(request_id = %request.request_id, "Material request consumer gone, request dropped");
        }
    }
}
