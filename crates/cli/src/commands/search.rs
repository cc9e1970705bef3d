//! `skillweave search` — Semantic search over the configured graph.

use skillweave_config::AppConfig;
use skillweave_gateway::Services;

pub async fn run(query: String, limit: Option<i64>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let services = Services::from_config(&config)?;

    let limit = services.limits.resolve(limit);
    let outcome = services.search.search(&query, limit).await?;

    if let Some(note) = &outcome.note {
        eprintln!("  note: {note}");
    }
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(())
}
