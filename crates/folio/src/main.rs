//! Folio - command-line client for the journal publishing platform.
//!
//! Main entry point for the Folio CLI.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{auth, journals, request, status};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Folio - command-line client for the journal publishing platform
#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// API base URL (overrides the config file)
    #[arg(long, global = true, env = "FOLIO_SERVER_URL")]
    pub server: Option<String>,

    /// Load configuration from this file instead of the discovered layers
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in, log out, and inspect the stored session
    Auth(auth::AuthArgs),

    /// Browse and submit journal articles
    Journals(journals::JournalsArgs),

    /// Send a raw request through the session pipeline
    Request(request::RequestArgs),

    /// Show backend status
    Status(status::StatusArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Tracing: human-readable on stderr, JSON to a daily log file
    let filter = if cli.verbose {
        "folio=debug,folio_client=debug,folio_config=debug,info"
    } else {
        "folio=info,folio_client=info,warn"
    };

    let log_dir = folio_config::config_dir()
        .map(|d| d.join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "folio.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "folio=trace,folio_client=trace,folio_config=trace,info",
                )),
        )
        .init();

    let ctx = commands::Context::load(commands::ContextOptions {
        server: cli.server,
        config_file: cli.config,
        json_output: cli.json,
        verbose: cli.verbose,
    })?;
    let mut events = ctx.client.subscribe();

    // Dispatch to command handlers
    let result = match cli.command {
        Commands::Auth(args) => auth::run(args, &ctx).await,
        Commands::Journals(args) => journals::run(args, &ctx).await,
        Commands::Request(args) => request::run(args, &ctx).await,
        Commands::Status(args) => status::run(args, &ctx).await,
    };

    commands::report_session_events(&mut events);
    result
}
