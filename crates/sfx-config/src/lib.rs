//! Connection configuration for the SignalFx API.
//!
//! Resolves the auth token and base URLs from layered sources, lowest
//! priority first:
//! - `/etc/signalfx.conf` (system-wide JSON config)
//! - `~/.signalfx.conf` (user JSON config)
//! - the `api.signalfx.com` entry of the netrc file (token only)
//! - options supplied by the caller, with `SFX_*` env defaults
//!
//! ```no_run
//! use sfx_config::{ConfigPaths, ConfigResolver, ProviderOptions};
//!
//! let resolver = ConfigResolver::new(ConfigPaths::new());
//! let options = ProviderOptions::new().with_env_defaults();
//! let resolution = resolver.resolve(&options)?;
//! println!("API: {}", resolution.record.api_url);
//! # Ok::<(), sfx_config::ConfigError>(())
//! ```

pub mod error;
pub mod file;
pub mod netrc;
pub mod options;
pub mod paths;
pub mod resolver;
pub mod types;

pub use error::{ConfigError, Result};
pub use file::{load_optional, read_config_file};
pub use netrc::{Machine, Netrc, NetrcError, read_netrc_token};
pub use options::{
    API_URL_ENV, AUTH_TOKEN_ENV, CUSTOM_APP_URL_ENV, DEFAULT_TIMEOUT_SECONDS, ProviderOptions,
};
pub use paths::{ConfigPaths, HOME_CONFIG_FILE, NETRC_ENV, NETRC_FILE, SYSTEM_CONFIG_PATH};
pub use resolver::{
    ConfigResolver, LayerSource, Resolution, SourceKind, SourceReport, resolve_layers,
};
pub use types::*;
