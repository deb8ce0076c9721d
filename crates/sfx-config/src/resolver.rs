//! Configuration resolution - folds the ordered sources into one record.
//!
//! Precedence (later overrides earlier):
//! 1. `/etc/signalfx.conf`
//! 2. `~/.signalfx.conf`
//! 3. netrc entry for `api.signalfx.com` (token only)
//! 4. caller-supplied options
//!
//! Each source yields `Ok(None)` when it has nothing to contribute, a layer
//! when it does, or an error that aborts the whole resolution. A broken
//! config file is fatal even though a missing netrc entry is not.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::file::load_optional;
use crate::netrc::read_netrc_token;
use crate::{
    ConfigError, ConfigLayer, ConfigPaths, ConfigRecord, NETRC_MACHINE, ProviderOptions, Result,
};

/// Where a configuration layer came from, in ascending priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    System,
    Home,
    Netrc,
    Caller,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::System => write!(f, "system config"),
            SourceKind::Home => write!(f, "user config"),
            SourceKind::Netrc => write!(f, "netrc"),
            SourceKind::Caller => write!(f, "provider options"),
        }
    }
}

/// A producer of one partial configuration layer.
pub trait LayerSource {
    /// Which source this is.
    fn kind(&self) -> SourceKind;

    /// File consulted by this source, if it is file-backed.
    fn origin(&self) -> Option<PathBuf>;

    /// Load the layer: `Ok(None)` means "nothing to contribute".
    fn load(&self) -> Result<Option<ConfigLayer>>;
}

/// Record of one source consulted during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub kind: SourceKind,
    pub path: Option<PathBuf>,
    /// Whether the source contributed a layer.
    pub applied: bool,
}

/// Successful resolution output.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The final record; `auth_token` is guaranteed non-empty.
    pub record: ConfigRecord,
    /// Every source consulted, lowest priority first.
    pub sources: Vec<SourceReport>,
    /// The source whose auth token won.
    pub auth_token_source: Option<SourceKind>,
}

impl Resolution {
    /// Sources that contributed a layer.
    pub fn applied(&self) -> impl Iterator<Item = &SourceReport> {
        self.sources.iter().filter(|s| s.applied)
    }
}

/// Resolves connection settings from files, netrc and caller options.
///
/// Holding one resolver across calls reuses its computed home config path.
#[derive(Debug, Default)]
pub struct ConfigResolver {
    paths: ConfigPaths,
}

impl ConfigResolver {
    pub fn new(paths: ConfigPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    /// Resolve the final record for the given caller options.
    pub fn resolve(&self, options: &ProviderOptions) -> Result<Resolution> {
        let system = FileSource::System(&self.paths);
        let home = FileSource::Home(&self.paths);
        let netrc = NetrcSource {
            paths: &self.paths,
        };
        let caller = CallerSource { options };

        let sources: [&dyn LayerSource; 4] = [&system, &home, &netrc, &caller];
        resolve_layers(&sources)
    }

    /// Report the file sources this resolver would consult, without loading
    /// any. `applied` is set for files that currently exist.
    pub fn describe(&self) -> Vec<SourceReport> {
        let system = FileSource::System(&self.paths);
        let home = FileSource::Home(&self.paths);
        let netrc = NetrcSource {
            paths: &self.paths,
        };
        let sources: [&dyn LayerSource; 3] = [&system, &home, &netrc];
        sources
            .iter()
            .map(|s| {
                let path = s.origin();
                let applied = path.as_deref().is_some_and(|p| p.is_file());
                SourceReport {
                    kind: s.kind(),
                    path,
                    applied,
                }
            })
            .collect()
    }
}

/// Fold sources in the given order, then require an auth token.
///
/// The first failing source aborts; later sources are never consulted.
pub fn resolve_layers(sources: &[&dyn LayerSource]) -> Result<Resolution> {
    let mut record = ConfigRecord::default();
    let mut reports = Vec::with_capacity(sources.len());
    let mut auth_token_source = None;

    for source in sources {
        let kind = source.kind();
        let layer = source.load()?;

        if let Some(layer) = &layer {
            if layer.sets_auth_token() {
                auth_token_source = Some(kind);
            }
            record.overlay(layer);
            tracing::debug!(source = %kind, layer = ?layer, "applied config layer");
        }

        reports.push(SourceReport {
            kind,
            path: source.origin(),
            applied: layer.is_some(),
        });
    }

    if !record.has_auth_token() {
        return Err(ConfigError::MissingCredential {
            field: "auth_token",
            partial: Box::new(record),
        });
    }

    tracing::debug!(
        token_source = ?auth_token_source,
        api_url = %record.api_url,
        "resolved configuration"
    );

    Ok(Resolution {
        record,
        sources: reports,
        auth_token_source,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Sources
// ─────────────────────────────────────────────────────────────────────────────

enum FileSource<'a> {
    System(&'a ConfigPaths),
    Home(&'a ConfigPaths),
}

impl LayerSource for FileSource<'_> {
    fn kind(&self) -> SourceKind {
        match self {
            FileSource::System(_) => SourceKind::System,
            FileSource::Home(_) => SourceKind::Home,
        }
    }

    fn origin(&self) -> Option<PathBuf> {
        match self {
            FileSource::System(paths) => Some(paths.system_config().to_path_buf()),
            FileSource::Home(paths) => paths.home_config().ok(),
        }
    }

    fn load(&self) -> Result<Option<ConfigLayer>> {
        match self {
            FileSource::System(paths) => load_optional(paths.system_config()),
            FileSource::Home(paths) => load_optional(&paths.home_config()?),
        }
    }
}

struct NetrcSource<'a> {
    paths: &'a ConfigPaths,
}

impl LayerSource for NetrcSource<'_> {
    fn kind(&self) -> SourceKind {
        SourceKind::Netrc
    }

    fn origin(&self) -> Option<PathBuf> {
        self.paths.netrc().ok()
    }

    fn load(&self) -> Result<Option<ConfigLayer>> {
        let path = self.paths.netrc()?;
        Ok(read_netrc_token(&path, NETRC_MACHINE)?.map(ConfigLayer::with_auth_token))
    }
}

struct CallerSource<'a> {
    options: &'a ProviderOptions,
}

impl LayerSource for CallerSource<'_> {
    fn kind(&self) -> SourceKind {
        SourceKind::Caller
    }

    fn origin(&self) -> Option<PathBuf> {
        None
    }

    fn load(&self) -> Result<Option<ConfigLayer>> {
        let layer = self.options.as_layer();
        Ok((layer != ConfigLayer::default()).then_some(layer))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
