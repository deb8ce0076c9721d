//! Locations of the file-based configuration sources.
//!
//! # Defaults
//!
//! - System config: `/etc/signalfx.conf`
//! - User config: `~/.signalfx.conf`
//! - Netrc: `$NETRC`, else `~/.netrc` (`~/_netrc` on Windows)
//!
//! Each location can be overridden on the [`ConfigPaths`] value handed to
//! the resolver, which is how tests point resolution at fixtures.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::{ConfigError, Result};

/// Fixed path of the system-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/signalfx.conf";

/// Filename of the user config file within the home directory.
pub const HOME_CONFIG_FILE: &str = ".signalfx.conf";

/// Environment variable naming an explicit netrc file.
pub const NETRC_ENV: &str = "NETRC";

/// Platform netrc filename.
#[cfg(windows)]
pub const NETRC_FILE: &str = "_netrc";

/// Platform netrc filename.
#[cfg(not(windows))]
pub const NETRC_FILE: &str = ".netrc";

/// Paths consulted during resolution.
///
/// The user config path is computed lazily from the home directory the
/// first time it is needed and then reused for the lifetime of this value.
#[derive(Debug, Default)]
pub struct ConfigPaths {
    system: Option<PathBuf>,
    home: OnceLock<PathBuf>,
    netrc: Option<PathBuf>,
    home_dir: Option<fn() -> Option<PathBuf>>,
}

impl ConfigPaths {
    /// Paths with platform defaults everywhere.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the system config path.
    pub fn with_system_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.system = Some(path.into());
        self
    }

    /// Override the user config path.
    pub fn with_home_config(self, path: impl Into<PathBuf>) -> Self {
        Self {
            home: OnceLock::from(path.into()),
            ..self
        }
    }

    /// Override the netrc path, bypassing `$NETRC` and the home directory.
    pub fn with_netrc(mut self, path: impl Into<PathBuf>) -> Self {
        self.netrc = Some(path.into());
        self
    }

    /// Replace the home directory lookup used for the user config and netrc
    /// defaults. The platform lookup is used otherwise.
    pub fn with_home_dir(mut self, lookup: fn() -> Option<PathBuf>) -> Self {
        self.home_dir = Some(lookup);
        self
    }

    fn home_dir(&self) -> Option<PathBuf> {
        self.home_dir.map_or_else(dirs::home_dir, |lookup| lookup())
    }

    /// Path of the system-wide config file.
    pub fn system_config(&self) -> &Path {
        self.system
            .as_deref()
            .unwrap_or_else(|| Path::new(SYSTEM_CONFIG_PATH))
    }

    /// Path of the user config file.
    ///
    /// Fails with [`ConfigError::HomeDir`] when no override is set and the
    /// home directory cannot be determined.
    pub fn home_config(&self) -> Result<PathBuf> {
        if let Some(path) = self.home.get() {
            return Ok(path.clone());
        }
        let computed = self
            .home_dir()
            .ok_or(ConfigError::HomeDir)?
            .join(HOME_CONFIG_FILE);
        // A concurrent caller may have won the race; both computed the same value.
        Ok(self.home.get_or_init(|| computed).clone())
    }

    /// Explicit netrc override, if any.
    pub fn netrc_override(&self) -> Option<&Path> {
        self.netrc.as_deref()
    }

    /// Path of the netrc file to consult.
    ///
    /// Resolution order: explicit override, `$NETRC`, then the platform
    /// dotfile in the home directory.
    pub fn netrc(&self) -> Result<PathBuf> {
        if let Some(path) = &self.netrc {
            return Ok(path.clone());
        }
        netrc_path_from(std::env::var(NETRC_ENV).ok(), self.home_dir())
    }
}

/// Pick the netrc path from an optional `$NETRC` value and home directory.
pub fn netrc_path_from(env_value: Option<String>, home: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(value) = env_value
        && !value.is_empty()
    {
        return Ok(PathBuf::from(value));
    }
    expand_tilde(&format!("~/{}", NETRC_FILE), home)
}

/// Expand a leading `~` to the given home directory.
pub fn expand_tilde(path: &str, home: Option<PathBuf>) -> Result<PathBuf> {
    let Some(rest) = path.strip_prefix('~') else {
        return Ok(PathBuf::from(path));
    };
    let home = home.ok_or(ConfigError::HomeDir)?;
    let rest = rest.trim_start_matches(['/', '\\']);
    if rest.is_empty() {
        Ok(home)
    } else {
        Ok(home.join(rest))
    }
}
