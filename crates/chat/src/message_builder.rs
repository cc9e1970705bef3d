//! Transcript assembly.
//!
//! Turn order is fixed:
//!
//! 1. system: policy prompt
//! 2. system: `Additional instructions: …` (only if non-blank)
//! 3. history, unchanged
//! 4. user: the new message
//! 5. per executed tool: assistant (the tool-call JSON), then
//!    user (`Tool result for <tool>: <output JSON>`)

use skillweave_core::decision::ToolCallDecision;
use skillweave_core::message::ConversationTurn;
use skillweave_core::tool::ToolResult;

/// A tool call and the result it produced, replayed to the model.
#[derive(Debug, Clone)]
pub struct InjectedToolResult {
    pub call: ToolCallDecision,
    pub result: ToolResult,
}

#[derive(Debug, Clone)]
pub struct MessageBuilder {
    system_prompt: String,
}

impl MessageBuilder {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn build(
        &self,
        user_message: &str,
        history: &[ConversationTurn],
        custom_instructions: Option<&str>,
        injected: &[InjectedToolResult],
    ) -> Vec<ConversationTurn> {
        let mut turns = Vec::with_capacity(history.len() + 3 + injected.len() * 2);
        turns.push(ConversationTurn::system(&self.system_prompt));

        if let Some(ci) = custom_instructions.map(str::trim).filter(|ci| !ci.is_empty()) {
            turns.push(ConversationTurn::system(format!("Additional instructions: {ci}")));
        }

        turns.extend(history.iter().cloned());
        turns.push(ConversationTurn::user(user_message));

        for item in injected {
            turns.push(ConversationTurn::assistant(item.call.to_json().to_string()));
            turns.push(ConversationTurn::user(format!(
                "Tool result for {}: {}",
                item.call.tool, item.result.output
            )));
        }

        turns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillweave_core::message::Role;

    fn builder() -> MessageBuilder {
        MessageBuilder::new("POLICY")
    }

    fn shape(turns: &[ConversationTurn]) -> Vec<(Role, &str)> {
        turns.iter().map(|t| (t.role, t.content.as_str())).collect()
    }

    #[test]
    fn minimal_transcript() {
        let turns = builder().build("hello", &[], None, &[]);
        assert_eq!(shape(&turns), vec![(Role::System, "POLICY"), (Role::User, "hello")]);
    }

    #[test]
    fn full_order_is_preserved() {
        let history = vec![
            ConversationTurn::user("earlier question"),
            ConversationTurn::assistant("earlier answer"),
        ];
        let injected = vec![InjectedToolResult {
            call: ToolCallDecision::new("search_materials", serde_json::json!({"query": "hooks"})),
            result: ToolResult {
                tool: "search_materials".into(),
                output: serde_json::json!({"results": []}),
                is_error: false,
            },
        }];

        let turns = builder().build("new question", &history, Some("Be brief"), &injected);
        let roles: Vec<Role> = turns.iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![
                Role::System,
                Role::System,
                Role::User,
                Role::Assistant,
                Role::User,
                Role::Assistant,
                Role::User
            ]
        );
        assert_eq!(turns[1].content, "Additional instructions: Be brief");
        assert_eq!(turns[2].content, "earlier question");
        assert_eq!(turns[4].content, "new question");
        let replayed: serde_json::Value = serde_json::from_str(&turns[5].content).unwrap();
        assert_eq!(
            replayed,
            serde_json::json!({"type": "tool_call", "tool": "search_materials", "args": {"query": "hooks"}})
        );
        assert_eq!(turns[6].content, r#"Tool result for search_materials: {"results":[]}"#);
    }

    #[test]
    fn blank_instructions_are_skipped() {
        for ci in [Some(""), Some("   "), None] {
            let turns = builder().build("hi", &[], ci, &[]);
            assert_eq!(turns.len(), 2);
        }
    }

    #[test]
    fn replayed_call_parses_back_to_the_same_decision() {
        let call = ToolCallDecision::new("request_material_addition", serde_json::json!({"topic": "Zig"}));
        let injected = vec![InjectedToolResult {
            call: call.clone(),
            result: ToolResult {
                tool: call.tool.clone(),
                output: serde_json::json!({"requestId": "req_1", "status": "queued"}),
                is_error: false,
            },
        }];
        let turns = builder().build("hi", &[], None, &injected);
        let replayed: skillweave_core::LlmDecision = serde_json::from_str(&turns[2].content).unwrap();
        assert_eq!(replayed, skillweave_core::LlmDecision::ToolCall(call));
    }
}
