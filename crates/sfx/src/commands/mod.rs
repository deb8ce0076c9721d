//! CLI command handlers.

use std::path::PathBuf;

use clap::Args;
use sfx_client::HostInfo;
use sfx_config::{ConfigPaths, ConfigResolver, ProviderOptions};

pub mod check;
pub mod config;

/// Provider options, mirroring what an embedding framework would pass in.
#[derive(Args, Debug)]
pub struct ProviderArgs {
    /// SignalFx auth token
    #[arg(long, global = true, env = "SFX_AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    /// API URL for your SignalFx org, may include a realm
    #[arg(long, global = true, env = "SFX_API_URL")]
    pub api_url: Option<String>,

    /// Application URL for your SignalFx org, often customized for SSO
    #[arg(long, global = true, env = "SFX_CUSTOM_APP_URL")]
    pub custom_app_url: Option<String>,

    /// Timeout for a single HTTP call in seconds [default: 120]
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_seconds: Option<u64>,

    /// Provider option as KEY=VALUE; the dedicated flags take precedence
    #[arg(short = 'o', long = "option", global = true, value_name = "KEY=VALUE",
          value_parser = parse_key_value)]
    pub options: Vec<(String, String)>,

    /// System config file (default: /etc/signalfx.conf)
    #[arg(long, global = true, value_name = "PATH")]
    pub system_config: Option<PathBuf>,

    /// User config file (default: ~/.signalfx.conf)
    #[arg(long, global = true, value_name = "PATH")]
    pub home_config: Option<PathBuf>,

    /// Netrc file (default: $NETRC or ~/.netrc)
    #[arg(long, global = true, value_name = "PATH")]
    pub netrc: Option<PathBuf>,
}

/// Shared context for all commands.
#[derive(Debug)]
pub struct Context {
    /// Resolver over the selected config paths.
    pub resolver: ConfigResolver,
    /// Caller-supplied options.
    pub options: ProviderOptions,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    Ok((key.trim().to_string(), value.to_string()))
}

impl Context {
    pub fn new(args: &ProviderArgs, json_output: bool, verbose: bool) -> anyhow::Result<Self> {
        let mut paths = ConfigPaths::new();
        if let Some(path) = &args.system_config {
            paths = paths.with_system_config(path);
        }
        if let Some(path) = &args.home_config {
            paths = paths.with_home_config(path);
        }
        if let Some(path) = &args.netrc {
            paths = paths.with_netrc(path);
        }

        let mut options = ProviderOptions::from_map(
            args.options
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_str())),
        )?;
        if let Some(token) = &args.auth_token {
            options.auth_token = Some(token.clone());
        }
        if let Some(url) = &args.api_url {
            options.api_url = Some(url.clone());
        }
        if let Some(url) = &args.custom_app_url {
            options.custom_app_url = Some(url.clone());
        }
        if let Some(seconds) = args.timeout_seconds {
            options.timeout_seconds = Some(seconds);
        }

        tracing::debug!(?paths, ?options, "command context");

        Ok(Self {
            resolver: ConfigResolver::new(paths),
            options,
            json_output,
            verbose,
        })
    }

    /// How this binary identifies itself to the API.
    pub fn host(&self) -> HostInfo {
        HostInfo::new("sfx").with_version(env!("CARGO_PKG_VERSION"))
    }
}
