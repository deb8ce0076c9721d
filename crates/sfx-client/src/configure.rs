//! One-call setup: resolve configuration, then build the client.

use sfx_config::{ConfigRecord, ConfigResolver, ProviderOptions, Resolution};

use crate::client::{HostInfo, SfxClient};
use crate::error::Result;

/// A resolved configuration together with the client built from it.
#[derive(Debug, Clone)]
pub struct Configured {
    /// Final configuration record.
    pub config: ConfigRecord,
    /// Ready-to-use API client.
    pub client: SfxClient,
    /// Sources consulted while resolving `config`.
    pub resolution: Resolution,
}

/// Resolve configuration for `options` and build a client from it.
///
/// Resolution errors are returned as [`Error::Resolve`](crate::Error::Resolve)
/// with the inner error untouched, so a missing token still carries the
/// partially resolved record.
pub fn configure(
    resolver: &ConfigResolver,
    options: &ProviderOptions,
    host: Option<&HostInfo>,
) -> Result<Configured> {
    let timeout = options.timeout()?;
    let resolution = resolver.resolve(options)?;

    tracing::debug!("HTTP timeout is {} seconds", timeout.as_secs());
    let client = SfxClient::from_config(&resolution.record, timeout, host)?;

    Ok(Configured {
        config: resolution.record.clone(),
        client,
        resolution,
    })
}
