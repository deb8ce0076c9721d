//! The SignalFx API client and its builder.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sfx_config::ConfigRecord;
use url::Url;

use crate::error::{Error, ErrorResponse, Result};

/// Header carrying the API token.
pub const AUTH_HEADER: &str = "X-SF-Token";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(sfx_config::DEFAULT_TIMEOUT_SECONDS);

/// Product token this library adds to the `User-Agent`.
const LIBRARY_NAME: &str = "sfx-client";

// ─────────────────────────────────────────────────────────────────────────────
// Transport settings
// ─────────────────────────────────────────────────────────────────────────────

/// Connection-level limits of the underlying transport.
///
/// These are fixed engineering defaults; callers only choose the
/// per-request timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportSettings {
    /// Time allowed to establish a TCP connection.
    pub connect_timeout: Duration,
    /// Time allowed for the TLS handshake.
    pub tls_handshake_timeout: Duration,
    /// Idle connections kept across all hosts.
    pub max_idle_conns: usize,
    /// Idle connections kept per host.
    pub max_idle_conns_per_host: usize,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            tls_handshake_timeout: Duration::from_secs(5),
            max_idle_conns: 100,
            max_idle_conns_per_host: 100,
        }
    }
}

impl TransportSettings {
    /// Bound for the whole connect phase.
    ///
    /// reqwest times the TCP connect and TLS handshake as one phase.
    pub fn connect_phase_timeout(&self) -> Duration {
        self.connect_timeout.max(self.tls_handshake_timeout)
    }

    /// Idle pool size per host, capped by the overall limit.
    pub fn pool_max_idle_per_host(&self) -> usize {
        self.max_idle_conns_per_host.min(self.max_idle_conns)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// User agent
// ─────────────────────────────────────────────────────────────────────────────

/// The tool hosting this library, reported in the `User-Agent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    /// Product name, e.g. `Terraform` or `sfx`.
    pub name: String,
    /// Declared version of the host, if it reports one.
    pub version: Option<String>,
}

impl HostInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into()).filter(|v: &String| !v.is_empty());
        self
    }
}

/// Compose the identification string sent with every request.
///
/// `"<host>/<host version> sfx-client/<library version>"`, with the host
/// segment shortened or dropped when that information is missing.
pub fn compose_user_agent(host: Option<&HostInfo>) -> String {
    let library = format!("{}/{}", LIBRARY_NAME, env!("CARGO_PKG_VERSION"));
    match host {
        Some(HostInfo {
            name,
            version: Some(version),
        }) => format!("{}/{} {}", name, version, library),
        Some(HostInfo {
            name,
            version: None,
        }) => format!("{} {}", name, library),
        None => library,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

/// SignalFx API client.
///
/// Cheap to clone; clones share one connection pool.
///
/// # Example
///
/// ```no_run
/// use sfx_client::SfxClient;
///
/// # fn example() -> sfx_client::Result<()> {
/// let client = SfxClient::builder()
///     .base_url("https://api.us1.signalfx.com")
///     .auth_token("secret")
///     .build()?;
///
/// assert_eq!(client.base_url().as_str(), "https://api.us1.signalfx.com/");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SfxClient {
    inner: Arc<ClientInner>,
}

/// State shared by every clone of a client.
struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    user_agent: String,
}

impl std::fmt::Debug for SfxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SfxClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("timeout", &self.inner.timeout)
            .field("user_agent", &self.inner.user_agent)
            .finish_non_exhaustive()
    }
}

impl SfxClient {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Build a client from a resolved configuration record.
    pub fn from_config(
        config: &ConfigRecord,
        timeout: Duration,
        host: Option<&HostInfo>,
    ) -> Result<Self> {
        let mut builder = Self::builder()
            .base_url(&config.api_url)
            .auth_token(&config.auth_token)
            .timeout(timeout);
        if let Some(host) = host {
            builder = builder.host(host.clone());
        }
        builder.build()
    }

    /// Base URL, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.inner.timeout
    }

    /// `User-Agent` sent with every request.
    pub fn user_agent(&self) -> &str {
        &self.inner.user_agent
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Requests
    // ─────────────────────────────────────────────────────────────────────────

    /// Resolve an API path such as `v2/detector` against the base URL.
    pub fn url(&self, path: &str) -> Result<Url> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(Method::GET, path, |req| req).await?;
        decode(response).await
    }

    /// GET with `query` encoded into the URL.
    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.send(Method::GET, path, |req| req.query(query)).await?;
        decode(response).await
    }

    /// POST `body` as JSON.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(Method::POST, path, |req| req.json(body)).await?;
        decode(response).await
    }

    /// PUT `body` as JSON.
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(Method::PUT, path, |req| req.json(body)).await?;
        decode(response).await
    }

    /// DELETE; any 2xx counts as success and the body is ignored.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send(Method::DELETE, path, |req| req).await?;
        Ok(())
    }

    /// Send one request and turn a non-2xx answer into an [`Error`].
    async fn send(
        &self,
        method: Method,
        path: &str,
        prepare: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<Response> {
        let url = self.url(path)?;
        tracing::debug!(%method, %url, "sending request");

        let request = self
            .inner
            .http
            .request(method, url)
            .timeout(self.inner.timeout);
        let response = prepare(request).send().await?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), url = %response.url(), "received response");
        if status.is_success() {
            Ok(response)
        } else {
            Err(error_from(response).await)
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Map a failed response to an error, preferring the API's own message.
async fn error_from(response: Response) -> Error {
    let status = response.status().as_u16();
    let message = response
        .json::<ErrorResponse>()
        .await
        .ok()
        .map(|body| body.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP {status}"));

    match status {
        401 => Error::Auth(message),
        404 => Error::NotFound(message),
        _ => Error::Api { status, message },
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for creating an [`SfxClient`].
pub struct ClientBuilder {
    base_url: Option<String>,
    auth_token: Option<String>,
    timeout: Duration,
    transport: TransportSettings,
    host: Option<HostInfo>,
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_url", &self.base_url)
            .field(
                "auth_token",
                &self.auth_token.as_deref().map(sfx_config::redact),
            )
            .field("timeout", &self.timeout)
            .field("transport", &self.transport)
            .field("host", &self.host)
            .finish()
    }
}

impl ClientBuilder {
    /// Builder with the default timeout and transport limits.
    pub fn new() -> Self {
        Self {
            base_url: None,
            auth_token: None,
            timeout: DEFAULT_TIMEOUT,
            transport: TransportSettings::default(),
            host: None,
        }
    }

    /// Set the API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the API token.
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Describe the hosting tool for the `User-Agent`.
    pub fn host(mut self, host: HostInfo) -> Self {
        self.host = Some(host);
        self
    }

    /// Build the client. No network I/O happens here.
    pub fn build(self) -> Result<SfxClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::Config("api_url is required".to_string()))?;

        let mut base_url = Url::parse(&base_url)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "api_url must use http or https, got '{}'",
                base_url.scheme()
            )));
        }
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let token = self
            .auth_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Config("auth token is required".to_string()))?;

        if self.timeout.is_zero() {
            return Err(Error::Config("timeout must be positive".to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut token_value = HeaderValue::from_str(&token)
            .map_err(|_| Error::Config("auth token is not a valid header value".to_string()))?;
        token_value.set_sensitive(true);
        headers.insert(AUTH_HEADER, token_value);

        let user_agent = compose_user_agent(self.host.as_ref());

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent.clone())
            .timeout(self.timeout)
            .connect_timeout(self.transport.connect_phase_timeout())
            .pool_max_idle_per_host(self.transport.pool_max_idle_per_host())
            .build()
            .map_err(|e| Error::Config(format!("HTTP transport: {e}")))?;

        tracing::info!(
            base_url = %base_url,
            timeout_secs = self.timeout.as_secs(),
            user_agent = %user_agent,
            "created SignalFx client"
        );

        Ok(SfxClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                timeout: self.timeout,
                user_agent,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
