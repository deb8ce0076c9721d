//! sfx - SignalFx connection tool
//!
//! Main entry point for the `sfx` CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{ProviderArgs, check, config};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// sfx - resolve SignalFx credentials and build a configured API client
#[derive(Parser)]
#[command(name = "sfx")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    #[command(flatten)]
    pub provider: ProviderArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect resolved configuration
    Config(config::ConfigArgs),

    /// Resolve configuration and build the API client (no network calls)
    Check(check::CheckArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so `--json` output on stdout stays parseable
    let filter = if cli.verbose {
        "sfx=debug,sfx_config=debug,sfx_client=debug,info"
    } else {
        "sfx=info,sfx_config=info,sfx_client=warn,warn"
    };

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    let ctx = commands::Context::new(&cli.provider, cli.json, cli.verbose)?;

    match cli.command {
        Commands::Config(args) => config::run(args, &ctx),
        Commands::Check(args) => check::run(args, &ctx),
    }
}
