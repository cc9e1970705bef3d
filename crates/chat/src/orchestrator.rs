//! One bounded tool-calling turn per user message.

use chrono::Utc;
use skillweave_core::chat::{ChatRequest, ChatResponse, ConversationState};
use skillweave_core::decision::{FinalDecision, LlmDecision, ToolCallDecision};
use skillweave_core::error::ChatError;
use skillweave_core::event::{DomainEvent, EventBus};
use skillweave_core::provider::{Provider, ProviderRequest};
use skillweave_core::tool::{ToolRegistry, ToolResult};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use crate::message_builder::{InjectedToolResult, MessageBuilder};
use crate::parser::{ResponseParser, parse_fallback, round_cap_fallback};
use crate::prompt::render_policy_prompt;

/// Runs the decide → (tool → decide)* → respond protocol.
///
/// Holds no per-request state; one instance serves concurrent requests.
pub struct ChatOrchestrator {
    /// The LLM provider to use
    provider: Arc<dyn Provider>,

    /// The model to request
    model: String,

    temperature: f32,

    max_tokens: Option<u32>,

    /// Tools the model may call
    tools: Arc<ToolRegistry>,

    /// Transcript builder holding the rendered policy prompt
    builder: MessageBuilder,

    /// Tool executions allowed per user message
    max_tool_rounds: u32,

    event_bus: Option<Arc<EventBus>>,
}

/// How one turn ended, for logging and events.
struct TurnOutcome {
    decision: FinalDecision,
    llm_calls: u32,
    model: String,
    fallback: bool,
}

impl ChatOrchestrator {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>, tools: Arc<ToolRegistry>) -> Self {
        let builder = MessageBuilder::new(render_policy_prompt(&tools.definitions()));
        Self {
            provider,
            model: model.into(),
            temperature: 0.2,
            max_tokens: None,
            tools,
            builder,
            max_tool_rounds: 1,
            event_bus: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Set the number of tool executions allowed per user message.
    pub fn with_max_tool_rounds(mut self, rounds: u32) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(bus);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn max_tool_rounds(&self) -> u32 {
        self.max_tool_rounds
    }

    pub fn system_prompt(&self) -> &str {
        self.builder.system_prompt()
    }

    /// Handle one user message.
    ///
    /// Fails without any LLM call when `message` is blank. Provider and tool
    /// collaborator failures end the turn; nothing is retried.
    pub async fn handle(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        request.validate()?;

        let state = ConversationState::now(request.session());
        info!(
            session_id = %state.session_id,
            history = request.conversation_history.len(),
            "Processing chat message"
        );

        let outcome = self.run_turn(request, &state.session_id).await?;

        info!(
            session_id = %state.session_id,
            llm_calls = outcome.llm_calls,
            fallback = outcome.fallback,
            materials = outcome.decision.related_materials.len(),
            "Chat turn complete"
        );
        self.publish(DomainEvent::ResponseGenerated {
            session_id: state.session_id.clone(),
            model: outcome.model,
            llm_calls: outcome.llm_calls,
            fallback: outcome.fallback,
            timestamp: Utc::now(),
        });

        let FinalDecision {
            message,
            related_materials,
            suggested_actions,
        } = outcome.decision;

        Ok(ChatResponse {
            message,
            related_materials,
            suggested_actions,
            conversation_state: state,
        })
    }

    async fn run_turn(&self, request: &ChatRequest, session_id: &str) -> Result<TurnOutcome, ChatError> {
        let mut injected: Vec<InjectedToolResult> = Vec::new();
        let mut llm_calls = 0u32;

        loop {
            let messages = self.builder.build(
                &request.message,
                &request.conversation_history,
                request.custom_instructions.as_deref(),
                &injected,
            );

            debug!(
                session_id,
                round = injected.len(),
                turns = messages.len(),
                "Calling LLM"
            );

            let response = self
                .provider
                .complete(ProviderRequest {
                    model: self.model.clone(),
                    messages,
                    temperature: self.temperature,
                    max_tokens: self.max_tokens,
                })
                .await?;
            llm_calls += 1;

            let decision = match ResponseParser::try_parse(&response.content) {
                Ok(decision) => decision,
                Err(failure) => {
                    warn!(session_id, error = %failure, "Unparseable LLM reply, using fallback answer");
                    return Ok(TurnOutcome {
                        decision: parse_fallback(),
                        llm_calls,
                        model: response.model,
                        fallback: true,
                    });
                }
            };

            match decision {
                LlmDecision::Final(decision) => {
                    return Ok(TurnOutcome {
                        decision,
                        llm_calls,
                        model: response.model,
                        fallback: false,
                    });
                }
                LlmDecision::ToolCall(call) => {
                    if injected.len() as u32 >= self.max_tool_rounds {
                        warn!(
                            session_id,
                            tool = %call.tool,
                            rounds = self.max_tool_rounds,
                            "Tool round cap reached, overriding with fallback answer"
                        );
                        return Ok(TurnOutcome {
                            decision: round_cap_fallback(),
                            llm_calls,
                            model: response.model,
                            fallback: true,
                        });
                    }

                    let result = self.execute_tool(&call, session_id).await?;
                    injected.push(InjectedToolResult { call, result });
                }
            }
        }
    }

    async fn execute_tool(&self, call: &ToolCallDecision, session_id: &str) -> Result<ToolResult, ChatError> {
        let started = Instant::now();
        let result = self.tools.execute(&call.tool, call.args.clone()).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        let success = matches!(&result, Ok(r) if !r.is_error);
        self.publish(DomainEvent::ToolExecuted {
            tool_name: call.tool.clone(),
            success,
            duration_ms,
            timestamp: Utc::now(),
        });

        match &result {
            Ok(r) if r.is_error => warn!(
                session_id,
                tool = %call.tool,
                duration_ms,
                output = %r.output,
                "Tool returned an error payload"
            ),
            Ok(_) => info!(session_id, tool = %call.tool, duration_ms, "Tool executed"),
            Err(e) => warn!(session_id, tool = %call.tool, duration_ms, error = %e, "Tool failed"),
        }

        result.map_err(ChatError::from)
    }

    fn publish(&self, event: DomainEvent) {
        if let Some(bus) = &self.event_bus {
            bus.publish(event);
        }
    }
}
