//! Transport tuning and HTTP client building.
//!
//! [`TransportOptions`] is the only way to influence how requests travel.
//! It has no access to the method, the body or the auth header, so tuning a
//! timeout can never change what the service receives.

use std::time::Duration;

use reqwest::{Client, ClientBuilder, Proxy, redirect};
use tracing::warn;

use crate::error::{SignerError, SignerResult};

/// Transport-level options applied to every request.
#[derive(Debug, Clone)]
pub struct TransportOptions {
    /// Overall request timeout (default: none, calls wait for the service)
    pub timeout: Option<Duration>,
    /// Connection timeout (default: none)
    pub connect_timeout: Option<Duration>,
    /// Proxy URL applied to all schemes
    pub proxy: Option<String>,
    /// User agent string
    pub user_agent: String,
    /// Pool idle timeout (default: 90s)
    pub pool_idle_timeout: Duration,
    /// Maximum idle connections per host (default: 10)
    pub pool_max_idle_per_host: usize,
    /// Skip TLS certificate verification (default: false)
    pub accept_invalid_certs: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: None,
            proxy: None,
            user_agent: concat!("remote-signer-client/", env!("CARGO_PKG_VERSION")).to_string(),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 10,
            accept_invalid_certs: false,
        }
    }
}

impl TransportOptions {
    /// Set the overall request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Route all requests through a proxy.
    #[must_use]
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Set a custom user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set connection pool settings.
    #[must_use]
    pub const fn with_pool_config(mut self, idle_timeout: Duration, max_idle: usize) -> Self {
        self.pool_idle_timeout = idle_timeout;
        self.pool_max_idle_per_host = max_idle;
        self
    }

    /// Disable TLS certificate verification.
    ///
    /// Any certificate the server presents is trusted, which exposes the
    /// token and payloads to whoever can intercept the connection. Only for
    /// services behind self-signed certificates on a trusted network.
    #[must_use]
    pub const fn danger_accept_invalid_certs(mut self) -> Self {
        self.accept_invalid_certs = true;
        self
    }
}

/// Build the HTTP client for the given options.
///
/// Redirects are never followed: a 3xx answer is reported as an
/// unexpected status instead of silently replaying the request elsewhere.
///
/// # Errors
///
/// Returns [`SignerError::InvalidConfig`] if the proxy URL is invalid or the
/// TLS backend cannot be initialized.
pub fn build_http_client(options: &TransportOptions) -> SignerResult<Client> {
    let mut builder = ClientBuilder::new()
        .pool_idle_timeout(options.pool_idle_timeout)
        .pool_max_idle_per_host(options.pool_max_idle_per_host)
        .user_agent(&options.user_agent)
        .redirect(redirect::Policy::none())
        .use_rustls_tls();

    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(timeout) = options.connect_timeout {
        builder = builder.connect_timeout(timeout);
    }
    if let Some(proxy) = &options.proxy {
        let proxy = Proxy::all(proxy)
            .map_err(|e| SignerError::invalid_config(format!("Invalid proxy {proxy}: {e}")))?;
        builder = builder.proxy(proxy);
    }
    if options.accept_invalid_certs {
        warn!("TLS certificate verification disabled for signer transport");
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder
        .build()
        .map_err(|e| SignerError::invalid_config(format!("Failed to build HTTP client: {e}")))
}
