//! Signer client configuration.

use std::time::Duration;

use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::{SignerError, SignerResult};
use crate::transport::TransportOptions;

/// Signer client configuration.
///
/// Immutable once handed to a client. The token is kept in a
/// [`SecretString`] and is redacted from `Debug` output.
#[derive(Debug, Clone)]
pub struct SignerConfig {
    /// Base URL of the signing service
    pub base_url: String,
    /// Token sent in the `X-Token` header
    pub token: SecretString,
    /// Transport tuning
    pub transport: TransportOptions,
}

impl SignerConfig {
    /// Create a new configuration with default transport options.
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: SecretString::from(token.into()),
            transport: TransportOptions::default(),
        }
    }

    /// Replace the transport options.
    #[must_use]
    pub fn with_transport(mut self, transport: TransportOptions) -> Self {
        self.transport = transport;
        self
    }

    /// Set the overall request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.transport.timeout = Some(timeout);
        self
    }

    /// Load configuration from `SIGNER_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`SignerError::InvalidConfig`] if `SIGNER_URL` or
    /// `SIGNER_TOKEN` is missing, or an optional variable cannot be parsed.
    pub fn from_env() -> SignerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`SignerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> SignerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| SignerError::invalid_config(format!("{key} is not set")))
        };
        let seconds = |key: &str| -> SignerResult<Option<Duration>> {
            lookup(key)
                .map(|raw| {
                    raw.trim().parse::<u64>().map(Duration::from_secs).map_err(|e| {
                        SignerError::invalid_config(format!("{key} must be whole seconds: {e}"))
                    })
                })
                .transpose()
        };

        let accept_invalid_certs = match lookup("SIGNER_ACCEPT_INVALID_CERTS").as_deref() {
            None | Some("" | "0" | "false") => false,
            Some("1" | "true") => true,
            Some(other) => {
                return Err(SignerError::invalid_config(format!(
                    "SIGNER_ACCEPT_INVALID_CERTS must be true or false, got {other}"
                )));
            }
        };
        let defaults = TransportOptions::default();
        let transport = TransportOptions {
            timeout: seconds("SIGNER_TIMEOUT_SECS")?,
            connect_timeout: seconds("SIGNER_CONNECT_TIMEOUT_SECS")?,
            proxy: lookup("SIGNER_PROXY").filter(|p| !p.is_empty()),
            user_agent: lookup("SIGNER_USER_AGENT").unwrap_or(defaults.user_agent.clone()),
            accept_invalid_certs,
            ..defaults
        };

        Ok(Self::new(required("SIGNER_URL")?, required("SIGNER_TOKEN")?).with_transport(transport))
    }

    /// Check the configuration without contacting the service.
    ///
    /// # Errors
    ///
    /// Returns [`SignerError::InvalidConfig`] if the base URL is not an
    /// absolute `http`/`https` URL, or the token is empty or not a valid
    /// header value.
    pub fn validate(&self) -> SignerResult<()> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| SignerError::invalid_config(format!("Invalid base URL: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SignerError::invalid_config(format!(
                "Unsupported base URL scheme: {}",
                url.scheme()
            )));
        }
        self.token_header().map(|_| ())
    }

    /// Token as a sensitive header value.
    pub(crate) fn token_header(&self) -> SignerResult<HeaderValue> {
        let token = self.token.expose_secret();
        if token.is_empty() {
            return Err(SignerError::invalid_config("Token must not be empty"));
        }
        let mut value = HeaderValue::from_str(token)
            .map_err(|_| SignerError::invalid_config("Token is not a valid header value"))?;
        value.set_sensitive(true);
        Ok(value)
    }
}
