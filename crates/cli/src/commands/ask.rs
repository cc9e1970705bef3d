//! `skillweave ask` — Run one orchestrated turn from the command line.

use skillweave_config::AppConfig;
use skillweave_core::ChatRequest;
use skillweave_gateway::Services;
use tracing::debug;

pub async fn run(
    message: String,
    session: Option<String>,
    instructions: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if config.llm.api_key.is_none() && config.llm.provider != "ollama" {
        eprintln!("  No API key configured. Set SKILLWEAVE_API_KEY or OPENAI_API_KEY,");
        eprintln!("  or add api_key under [llm] in:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        return Err("No API key found".into());
    }

    let services = Services::from_config(&config)?;

    let mut request = ChatRequest::new(message);
    request.session_id = session;
    request.custom_instructions = instructions;

    debug!(model = %config.llm.model, rounds = config.chat.max_tool_rounds, "Asking");
    let response = services.orchestrator.handle(&request).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
