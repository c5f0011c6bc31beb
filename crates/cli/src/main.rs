//! Sinapsi CLI
//!
//! Main entry point for the sinapsi command-line tool.
//! Serves the Q&A API and runs one-off questions against the pipeline.

mod app;
mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, RulesCommand, ServeCommand};
use sinapsi_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Sinapsi - technical Q&A for Tecnaria construction products
#[derive(Parser, Debug)]
#[command(name = "sinapsi")]
#[command(about = "Technical Q&A for Tecnaria construction products", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "SINAPSI_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Web search provider (brave, bing)
    #[arg(short, long, global = true, env = "WEB_SEARCH_PROVIDER")]
    provider: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP API server
    Serve(ServeCommand),

    /// Ask a single question
    Ask(AskCommand),

    /// List loaded Sinapsi rules in priority order
    Rules(RulesCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from file and environment
    let config = AppConfig::load(cli.config.clone())?;

    let bind = match &cli.command {
        Commands::Serve(cmd) => cmd.bind.clone(),
        _ => None,
    };

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.provider,
        bind,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    config.validate()?;

    tracing::info!("Sinapsi CLI starting");
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Rule directories: {:?}", config.rules_dirs);

    let command_name = match &cli.command {
        Commands::Serve(_) => "serve",
        Commands::Ask(_) => "ask",
        Commands::Rules(_) => "rules",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Serve(cmd) => cmd.execute(&config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Rules(cmd) => cmd.execute(&config),
    };

    // Log completion
    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
