//! Configuration error types.

use crate::netrc::NetrcError;
use crate::types::ConfigRecord;

/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur during configuration resolution.
///
/// A missing config file or a netrc file without an entry for the API host
/// is never an error; those sources simply contribute nothing.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A config file exists but could not be read.
    #[error("failed to open config file '{path}': {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    /// A config file was read but is not a valid JSON config object.
    #[error("failed to parse config file '{path}': {source}")]
    Decode {
        path: String,
        source: serde_json::Error,
    },

    /// The netrc file exists but is malformed.
    #[error("error parsing netrc file at '{path}': {source}")]
    Netrc { path: String, source: NetrcError },

    /// The user's home directory could not be determined.
    #[error("failed to get user environment: home directory not found")]
    HomeDir,

    /// A caller-supplied option was rejected.
    #[error("invalid option '{name}': {reason}")]
    InvalidOption { name: String, reason: String },

    /// No source supplied a required credential.
    ///
    /// Carries the otherwise-resolved record so callers can still inspect
    /// which URLs were picked up.
    #[error("{field}: required field is not set")]
    MissingCredential {
        field: &'static str,
        partial: Box<ConfigRecord>,
    },
}

impl ConfigError {
    /// The partially resolved record, if this is a missing-credential error.
    pub fn partial_record(&self) -> Option<&ConfigRecord> {
        match self {
            ConfigError::MissingCredential { partial, .. } => Some(partial),
            _ => None,
        }
    }

    pub(crate) fn invalid_option(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidOption {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
