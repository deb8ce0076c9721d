//! HTTP client for the SignalFx API.
//!
//! Builds a configured [`SfxClient`] from the layered settings resolved by
//! `sfx-config`.
//!
//! # Example
//!
//! ```no_run
//! use sfx_client::{HostInfo, configure};
//! use sfx_config::{ConfigPaths, ConfigResolver, ProviderOptions};
//!
//! # async fn example() -> sfx_client::Result<()> {
//! let resolver = ConfigResolver::new(ConfigPaths::new());
//! let options = ProviderOptions::new().with_env_defaults();
//! let host = HostInfo::new("my-tool").with_version("1.0.0");
//!
//! let configured = configure(&resolver, &options, Some(&host))?;
//! let detector: serde_json::Value = configured.client.get("v2/detector/abc123").await?;
//! println!("{}", detector["name"]);
//! # Ok(())
//! # }
//! ```
//!
//! # Transport
//!
//! Every client shares fixed transport limits (5s connect, 100 idle
//! connections per host) and sends the token in the `X-SF-Token` header.
//! Only the per-request timeout is configurable.

pub mod client;
pub mod configure;
pub mod error;

pub use client::{
    AUTH_HEADER, ClientBuilder, DEFAULT_TIMEOUT, HostInfo, SfxClient, TransportSettings,
    compose_user_agent,
};
pub use configure::{Configured, configure};
pub use error::{Error, Result};
