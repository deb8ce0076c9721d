//! Configuration types mapping to the JSON config file schema.
//!
//! Both `/etc/signalfx.conf` and `~/.signalfx.conf` share one shape:
//! ```json
//! {
//!   "auth_token": "...",
//!   "api_url": "https://api.us1.signalfx.com",
//!   "custom_app_url": "https://myorg.signalfx.com"
//! }
//! ```
//! Every key is optional.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://api.signalfx.com";

/// Default web application base URL.
pub const DEFAULT_CUSTOM_APP_URL: &str = "https://app.signalfx.com";

/// Host whose netrc entry supplies the auth token.
pub const NETRC_MACHINE: &str = "api.signalfx.com";

// ─────────────────────────────────────────────────────────────────────────────
// Resolved record
// ─────────────────────────────────────────────────────────────────────────────

/// Fully resolved connection settings.
///
/// An empty `auth_token` means "unset". `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq)]
pub struct ConfigRecord {
    /// Secret API token.
    pub auth_token: String,
    /// Base URL of the API.
    pub api_url: String,
    /// Base URL of the web application, often customized for SSO orgs.
    pub custom_app_url: String,
}

impl Default for ConfigRecord {
    fn default() -> Self {
        Self {
            auth_token: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
            custom_app_url: DEFAULT_CUSTOM_APP_URL.to_string(),
        }
    }
}

impl ConfigRecord {
    /// Whether an auth token has been resolved.
    pub fn has_auth_token(&self) -> bool {
        !self.auth_token.is_empty()
    }

    /// Overlay a partial layer on top of this record.
    ///
    /// Only present, non-empty fields overwrite; everything else is kept.
    pub fn overlay(&mut self, layer: &ConfigLayer) {
        overlay_field(&mut self.auth_token, layer.auth_token.as_deref());
        overlay_field(&mut self.api_url, layer.api_url.as_deref());
        overlay_field(&mut self.custom_app_url, layer.custom_app_url.as_deref());
    }
}

fn overlay_field(target: &mut String, value: Option<&str>) {
    if let Some(value) = value
        && !value.is_empty()
    {
        *target = value.to_string();
    }
}

impl fmt::Debug for ConfigRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigRecord")
            .field("auth_token", &redact(&self.auth_token))
            .field("api_url", &self.api_url)
            .field("custom_app_url", &self.custom_app_url)
            .finish()
    }
}

/// Redacted form of a secret for display: `<unset>` or `****`.
pub fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "****" }
}

// ─────────────────────────────────────────────────────────────────────────────
// Partial layer
// ─────────────────────────────────────────────────────────────────────────────

/// A partial configuration contributed by one source.
///
/// Unknown JSON keys are ignored; `null` reads as absent.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigLayer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_app_url: Option<String>,
}

impl ConfigLayer {
    /// A layer carrying only an auth token.
    pub fn with_auth_token(token: impl Into<String>) -> Self {
        Self {
            auth_token: Some(token.into()),
            ..Default::default()
        }
    }

    /// Whether this layer sets a non-empty auth token.
    pub fn sets_auth_token(&self) -> bool {
        self.auth_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Parse a layer from a JSON string, which must hold an object.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        // Decoding straight into the struct would also accept an array
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        serde_json::from_value(serde_json::Value::Object(object))
    }
}

impl fmt::Debug for ConfigLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigLayer")
            .field("auth_token", &self.auth_token.as_deref().map(redact))
            .field("api_url", &self.api_url)
            .field("custom_app_url", &self.custom_app_url)
            .finish()
    }
}
