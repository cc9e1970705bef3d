//! Queues requests for content the graph lacks.

use async_trait::async_trait;
use chrono::Utc;
use skillweave_core::error::ToolError;
use skillweave_core::event::{DomainEvent, EventBus};
use skillweave_core::tool::Tool;
use std::sync::Arc;
use crate::sink::{MaterialRequest, MaterialRequestSink};

pub struct RequestMaterialTool {
    sink: Arc<dyn MaterialRequestSink>,
    events: Option<Arc<EventBus>>,
}

impl RequestMaterialTool {
    pub fn new(sink: Arc<dyn MaterialRequestSink>) -> Self {
        Self { sink, events: None }
    }

    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.events = Some(bus);
        self
    }
}

#[async_trait]
impl Tool for RequestMaterialTool {
    fn name(&self) -> &str {
        "request_material_addition"
    }

    fn description(&self) -> &str {
        "Ask the maintainers to add learning material on a topic the graph does not cover. \
         Returns a request ID immediately; the request is queued, not fulfilled."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "topic": {
                    "type": "string",
                    "description": "The skill or subject material is needed for"
                },
                "user_context": {
                    "type": "string",
                    "description": "Optional details: level, preferred format, goals"
                }
            },
            "required": ["topic"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let topic = arguments["topic"]
            .as_str()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'topic' argument".into()))?;

        let user_context = arguments["user_context"]
            .as_str()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from);

        let request = MaterialRequest::new(topic, user_context);
        self.sink.record(&request);

        if let Some(bus) = &self.events {
            bus.publish(DomainEvent::MaterialRequested {
                request_id: request.request_id.clone(),
                topic: request.topic.clone(),
                timestamp: Utc::now(),
            });
        }

        Ok(serde_json::json!({
            "requestId": request.request_id,
            "status": "queued",
        }))
    }
}
