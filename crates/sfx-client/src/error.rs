//! Errors surfaced by the SignalFx client.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Settings could not be resolved; carries the resolver error as is.
    #[error(transparent)]
    Resolve(#[from] sfx_config::ConfigError),

    /// Transport failure during a request, including timeouts.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Body was not the JSON the caller asked for.
    #[error("malformed response body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SignalFx API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// 401 from the API, usually a revoked or mistyped token.
    #[error("unauthorized: {0}")]
    Auth(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Parameters the client cannot be built from, or a transport the
    /// HTTP stack refused to build.
    #[error("cannot build client: {0}")]
    Config(String),
}

impl Error {
    /// HTTP status behind this error, when the API answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Auth(_) => Some(401),
            Error::NotFound(_) => Some(404),
            Error::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_auth_error(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }

    /// True when the failure happened while building the client, after
    /// settings resolved but before any request.
    pub fn is_client_init(&self) -> bool {
        matches!(self, Error::InvalidUrl(_) | Error::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Body of a failed API call; only `message` is used.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub message: String,
}
