//! The system policy prompt sent as the first turn of every transcript.

use skillweave_core::tool::ToolDefinition;

const RULES: &str = "\
You are the learning assistant for a knowledge graph of skills and the resources that teach them.

Reply with exactly one JSON object and nothing else. It must have one of two shapes.

To answer the user:
{\"type\": \"final\", \"message\": \"<answer>\", \"relatedMaterials\": [{\"nodeId\": \"<id>\", \"name\": \"<name>\", \"type\": \"skill\" | \"url\"}], \"suggestedActions\": [\"<short next step>\"]}

To call a tool:
{\"type\": \"tool_call\", \"tool\": \"<tool name>\", \"args\": {<arguments>}}

Rules:
- Never invent node IDs. Every nodeId in relatedMaterials must come from a tool result in this conversation.
- If no tool result lists a suitable node, leave relatedMaterials empty.
- Search before recommending materials. If the search finds nothing relevant, you may request that material be added.
- You get at most one tool call per user message. After a tool result, answer with a final object.";

/// Render the policy prompt for the given tools.
///
/// Definitions are listed in name order, so the output is identical for any
/// registry holding the same tools.
pub fn render_policy_prompt(tools: &[ToolDefinition]) -> String {
    let mut defs: Vec<&ToolDefinition> = tools.iter().collect();
    defs.sort_by(|a, b| a.name.cmp(&b.name));

    let mut prompt = String::from(RULES);
    prompt.push_str("\n\nAvailable tools:");
    for def in defs {
        prompt.push_str(&format!(
            "\n- {}: {}\n  parameters: {}",
            def.name, def.description, def.parameters
        ));
    }
    prompt
}
