//! Caller-supplied options, the highest-priority configuration source.
//!
//! Options arrive from the embedding framework (or `sfx -o key=value`) as a
//! loose key/value bag:
//!
//! | key              | env default           | fallback                    |
//! |------------------|-----------------------|-----------------------------|
//! | `auth_token`     | `SFX_AUTH_TOKEN`      | none                        |
//! | `api_url`        | `SFX_API_URL`         | `https://api.signalfx.com`  |
//! | `custom_app_url` | `SFX_CUSTOM_APP_URL`  | `https://app.signalfx.com`  |
//! | `timeout_seconds`| none                  | `120`                       |
//!
//! The URL fallbacks live on [`ConfigRecord`](crate::ConfigRecord) rather
//! than here, so an unset option never masks a value from a config file.

use std::time::Duration;

use crate::{ConfigError, ConfigLayer, Result};

/// Env var supplying a default auth token.
pub const AUTH_TOKEN_ENV: &str = "SFX_AUTH_TOKEN";

/// Env var supplying a default API URL.
pub const API_URL_ENV: &str = "SFX_API_URL";

/// Env var supplying a default app URL.
pub const CUSTOM_APP_URL_ENV: &str = "SFX_CUSTOM_APP_URL";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 120;

/// Options supplied explicitly by the caller.
///
/// A field counts as provided only when it is `Some` and non-empty.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ProviderOptions {
    pub auth_token: Option<String>,
    pub api_url: Option<String>,
    pub custom_app_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl ProviderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    pub fn with_custom_app_url(mut self, url: impl Into<String>) -> Self {
        self.custom_app_url = Some(url.into());
        self
    }

    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Build options from a key/value bag.
    ///
    /// Unknown keys and malformed `timeout_seconds` values are rejected.
    pub fn from_map<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut options = Self::new();
        for (key, value) in pairs {
            let value = value.into();
            match key.as_ref() {
                "auth_token" => options.auth_token = Some(value),
                "api_url" => options.api_url = Some(value),
                "custom_app_url" => options.custom_app_url = Some(value),
                "timeout_seconds" => {
                    let seconds = value.trim().parse::<u64>().map_err(|_| {
                        ConfigError::invalid_option(
                            "timeout_seconds",
                            format!("expected a positive integer, got '{}'", value),
                        )
                    })?;
                    options.timeout_seconds = Some(seconds);
                }
                other => {
                    return Err(ConfigError::invalid_option(other, "unknown option"));
                }
            }
        }
        Ok(options)
    }

    /// Fill unset fields from the `SFX_*` environment variables.
    pub fn with_env_defaults(self) -> Self {
        self.with_env_defaults_from(|name| std::env::var(name).ok())
    }

    /// Fill unset fields using `lookup` in place of the process environment.
    pub fn with_env_defaults_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let fill = |slot: &mut Option<String>, var: &str| {
            if provided(slot.as_deref()).is_none()
                && let Some(value) = lookup(var).filter(|v| !v.is_empty())
            {
                *slot = Some(value);
            }
        };
        fill(&mut self.auth_token, AUTH_TOKEN_ENV);
        fill(&mut self.api_url, API_URL_ENV);
        fill(&mut self.custom_app_url, CUSTOM_APP_URL_ENV);
        self
    }

    /// The provided fields as a config layer.
    pub fn as_layer(&self) -> ConfigLayer {
        ConfigLayer {
            auth_token: provided(self.auth_token.as_deref()).map(str::to_string),
            api_url: provided(self.api_url.as_deref()).map(str::to_string),
            custom_app_url: provided(self.custom_app_url.as_deref()).map(str::to_string),
        }
    }

    /// Validated per-request timeout.
    pub fn timeout(&self) -> Result<Duration> {
        match self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS) {
            0 => Err(ConfigError::invalid_option(
                "timeout_seconds",
                "must be a positive integer",
            )),
            seconds => Ok(Duration::from_secs(seconds)),
        }
    }
}

fn provided(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

impl std::fmt::Debug for ProviderOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderOptions")
            .field("auth_token", &self.auth_token.as_deref().map(crate::redact))
            .field("api_url", &self.api_url)
            .field("custom_app_url", &self.custom_app_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}
