//! Check command - resolve configuration and construct the client.
//!
//! Never contacts the API; a bad token only shows up on first real use.

use anyhow::Result;
use clap::Args;
use console::{Style, style};
use serde::Serialize;

use super::Context;

/// Arguments for the check command.
#[derive(Args, Debug)]
pub struct CheckArgs {}

/// Client summary for JSON output.
#[derive(Debug, Serialize)]
struct CheckOutput<'a> {
    ready: bool,
    base_url: &'a str,
    app_url: &'a str,
    user_agent: &'a str,
    timeout_seconds: u64,
}

/// Run the check command.
pub fn run(_args: CheckArgs, ctx: &Context) -> Result<()> {
    let host = ctx.host();
    let configured = sfx_client::configure(&ctx.resolver, &ctx.options, Some(&host))?;
    let client = &configured.client;

    if ctx.json_output {
        let output = CheckOutput {
            ready: true,
            base_url: client.base_url().as_str(),
            app_url: &configured.config.custom_app_url,
            user_agent: client.user_agent(),
            timeout_seconds: client.timeout().as_secs(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let green = Style::new().green();
    let dim = Style::new().dim();

    println!();
    println!("{}", style("SignalFx Client").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!();
    println!("  {} {}", dim.apply_to("Status:"), green.apply_to("● ready"));
    println!("  {} {}", dim.apply_to("API:"), client.base_url());
    println!("  {} {}", dim.apply_to("App:"), configured.config.custom_app_url);
    println!("  {} {}s", dim.apply_to("Timeout:"), client.timeout().as_secs());
    println!("  {} {}", dim.apply_to("User-Agent:"), client.user_agent());
    println!();

    Ok(())
}
