//! Tools the chat model may call.
//!
//! - `search_materials`: semantic search over the skill/resource graph
//! - `request_material_addition`: queue a request for missing material
//!
//! Material requests are handed to a [`MaterialRequestSink`] and never
//! awaited; see [`sink`].

pub mod request_material;
pub mod search_materials;
pub mod sink;

use skillweave_core::event::EventBus;
use skillweave_core::tool::ToolRegistry;
use skillweave_graph::SimilaritySearch;
use std::sync::Arc;

pub use request_material::RequestMaterialTool;
pub use search_materials::{SearchLimits, SearchMaterialsTool};
pub use sink::{ChannelSink, LoggingSink, MaterialRequest, MaterialRequestSink, WebhookSink};

/// Create the registry with both built-in tools.
pub fn default_registry(
    search: SimilaritySearch,
    sink: Arc<dyn MaterialRequestSink>,
    limits: SearchLimits,
    events: Option<Arc<EventBus>>,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(SearchMaterialsTool::new(search, limits)));

    let mut request = RequestMaterialTool::new(sink);
    if let Some(bus) = events {
        request = request.with_event_bus(bus);
    }
    registry.register(Box::new(request));

    registry
}
