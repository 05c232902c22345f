//! Concierge CLI, the main entry point.
//!
//! Commands:
//! - `ask`     Ask a question, or chat interactively
//! - `route`   Show which agent would take a query, and why
//! - `agents`  List registered agents and their tools
//! - `status`  Show the configuration in effect
//! - `init`    Write a default config file

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "concierge",
    about = "Concierge, a personal assistant that routes each request to the right specialist",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true, env = "CONCIERGE_LOG_JSON")]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a question (interactive when no text is given)
    Ask {
        /// The question; omit to start an interactive session
        text: Vec<String>,

        /// Mark the input as transcribed speech
        #[arg(long)]
        voice: bool,

        /// Print the raw execution result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the routing decision for a query without executing it
    Route {
        /// The query to route
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// List registered agents in routing order
    Agents,

    /// Show configuration in effect
    Status,

    /// Write a default config file to ~/.concierge/config.toml
    Init,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so that answers (and --json output) stay clean on stdout
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }

    match cli.command {
        Commands::Ask { text, voice, json } => commands::ask::run(text, voice, json).await?,
        Commands::Route { text } => commands::route::run(text).await?,
        Commands::Agents => commands::agents::run().await?,
        Commands::Status => commands::status::run().await?,
        Commands::Init => commands::init::run().await?,
    }

    Ok(())
}
