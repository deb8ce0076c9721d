//! Config command - inspect resolved configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{Style, style};
use serde::Serialize;

use sfx_config::{SourceKind, SourceReport, redact};

use super::Context;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the resolved configuration (token redacted)
    Show,

    /// Show which config sources are consulted and their precedence
    Which,

    /// Show the user config file path
    Path,
}

/// Resolved configuration for JSON output.
#[derive(Debug, Serialize)]
struct ShowOutput<'a> {
    auth_token: &'static str,
    auth_token_source: Option<SourceKind>,
    api_url: &'a str,
    custom_app_url: &'a str,
    sources: &'a [SourceReport],
}

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => cmd_show(ctx),
        ConfigCommand::Which => cmd_which(ctx),
        ConfigCommand::Path => cmd_path(ctx),
    }
}

fn cmd_show(ctx: &Context) -> Result<()> {
    let resolution = ctx.resolver.resolve(&ctx.options)?;
    let record = &resolution.record;

    if ctx.json_output {
        let output = ShowOutput {
            auth_token: redact(&record.auth_token),
            auth_token_source: resolution.auth_token_source,
            api_url: &record.api_url,
            custom_app_url: &record.custom_app_url,
            sources: &resolution.sources,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let dim = Style::new().dim();

    println!("{}\n", style("# SignalFx Configuration").bold());

    let token_origin = resolution
        .auth_token_source
        .map(|kind| format!("  (from {})", kind))
        .unwrap_or_default();
    println!(
        "  {:<16}{}{}",
        "auth_token",
        redact(&record.auth_token),
        dim.apply_to(token_origin)
    );
    println!("  {:<16}{}", "api_url", record.api_url);
    println!("  {:<16}{}", "custom_app_url", record.custom_app_url);
    println!();

    let applied: Vec<_> = resolution.applied().collect();
    if applied.is_empty() {
        println!("No sources contributed (using defaults)");
    } else {
        println!("Applied sources (lowest priority first):");
        for source in applied {
            print_source(source, &dim);
        }
    }

    if ctx.verbose {
        println!();
        println!("Timeout: {}s", ctx.options.timeout()?.as_secs());
    }

    Ok(())
}

fn cmd_which(ctx: &Context) -> Result<()> {
    let reports = ctx.resolver.describe();

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    println!("Config source search order (later overrides earlier):\n");

    for source in &reports {
        let status = if source.applied {
            "✓ found    "
        } else {
            "· not found"
        };
        let path = source
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<home directory unavailable>".to_string());
        println!("  {} {:<14} {}", status, source.kind.to_string(), path);
    }
    println!(
        "  {} {:<14} flags or SFX_* env",
        "✓ always   ",
        SourceKind::Caller.to_string()
    );

    Ok(())
}

fn cmd_path(ctx: &Context) -> Result<()> {
    let path = ctx.resolver.paths().home_config()?;
    println!("{}", path.display());
    Ok(())
}

fn print_source(source: &SourceReport, dim: &Style) {
    match &source.path {
        Some(path) => println!(
            "  {:<18}{}",
            source.kind.to_string(),
            dim.apply_to(path.display())
        ),
        None => println!("  {}", source.kind),
    }
}
