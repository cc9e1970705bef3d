//! skillweave CLI — the main entry point.
//!
//! Commands:
//! - `serve`   — Start the HTTP gateway
//! - `ask`     — Run one orchestrated chat turn and print the response
//! - `search`  — Semantic search over the graph
//! - `config`  — Print default, effective, or path of the configuration

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "skillweave",
    about = "skillweave — LLM chat and semantic search over a skill graph",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Send a single chat message through the orchestrator
    Ask {
        /// The user message
        #[arg(short, long)]
        message: String,

        /// Reuse an existing session id
        #[arg(short, long)]
        session: Option<String>,

        /// Custom instructions appended after the policy prompt
        #[arg(short, long)]
        instructions: Option<String>,
    },

    /// Search the graph for materials similar to a query
    Search {
        #[arg(short, long)]
        query: String,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<i64>,
    },

    /// Show configuration
    Config {
        /// Print the effective configuration instead of the defaults
        #[arg(long, conflicts_with = "path")]
        show: bool,

        /// Print the config file path
        #[arg(long)]
        path: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Ask {
            message,
            session,
            instructions,
        } => commands::ask::run(message, session, instructions).await?,
        Commands::Search { query, limit } => commands::search::run(query, limit).await?,
        Commands::Config { show, path } => {
            if path {
                commands::config_cmd::path()?
            } else if show {
                commands::config_cmd::show()?
            } else {
                commands::config_cmd::defaults()
            }
        }
    }

    Ok(())
}
