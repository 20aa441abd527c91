//! Signer HTTP client.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument, warn};

use crate::{
    config::SignerConfig,
    envelope::{Method, RequestBody, RequestEnvelope, decode_payload, is_signature_valid, target_url},
    error::{SignerError, SignerResult},
    operation::Operation,
    provider::SignerProvider,
    transport::build_http_client,
};

/// Header carrying the auth token on every request.
pub const TOKEN_HEADER: &str = "X-Token";

/// Statuses treated as success. Anything else, 2xx included, is an error.
const ACCEPTED_STATUSES: [StatusCode; 2] = [StatusCode::OK, StatusCode::NO_CONTENT];

/// Client for the remote signing service.
///
/// Cloning is cheap and clones share the connection pool. Each call builds
/// its own request, so one client can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct SignerClient {
    base_url: String,
    token: HeaderValue,
    http: Client,
}

impl SignerClient {
    /// Create a new signer client.
    ///
    /// The service is not contacted; an unreachable URL surfaces on the
    /// first call.
    ///
    /// # Errors
    ///
    /// Returns [`SignerError::InvalidConfig`] if the configuration does not
    /// validate or the HTTP client cannot be built.
    pub fn new(config: SignerConfig) -> SignerResult<Self> {
        config.validate()?;
        let token = config.token_header()?;
        let http = build_http_client(&config.transport)?;

        debug!(base_url = %config.base_url, "Signer client configured");

        Ok(Self {
            base_url: config.base_url,
            token,
            http,
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Encrypt `plain_data` server-side.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or decode error; see [`SignerError`].
    #[instrument(skip_all, fields(operation = %Operation::Encrypt, bytes = plain_data.len()))]
    pub async fn encrypt(&self, plain_data: &[u8]) -> SignerResult<Vec<u8>> {
        self.transform(Operation::Encrypt, plain_data).await
    }

    /// Decrypt `encrypted_data` server-side.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or decode error; see [`SignerError`].
    #[instrument(skip_all, fields(operation = %Operation::Decrypt, bytes = encrypted_data.len()))]
    pub async fn decrypt(&self, encrypted_data: &[u8]) -> SignerResult<Vec<u8>> {
        self.transform(Operation::Decrypt, encrypted_data).await
    }

    /// Sign `data` server-side, returning the raw signature.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or decode error; see [`SignerError`].
    #[instrument(skip_all, fields(operation = %Operation::Sign, bytes = data.len()))]
    pub async fn sign(&self, data: &[u8]) -> SignerResult<Vec<u8>> {
        self.transform(Operation::Sign, data).await
    }

    /// Verify `signature` over `data` server-side.
    ///
    /// The signature is valid only if the service answers exactly `true`.
    ///
    /// # Errors
    ///
    /// Returns a transport or status error; see [`SignerError`].
    #[instrument(skip_all, fields(operation = %Operation::CheckSign, bytes = data.len()))]
    pub async fn check_sign(&self, data: &[u8], signature: &[u8]) -> SignerResult<bool> {
        let envelope = RequestEnvelope::for_operation(Operation::CheckSign, &[data, signature]);
        let body = self.execute(envelope).await?;
        let valid = is_signature_valid(&body);
        debug!(valid, "Signature checked");
        Ok(valid)
    }

    async fn transform(&self, operation: Operation, payload: &[u8]) -> SignerResult<Vec<u8>> {
        let body = self
            .execute(RequestEnvelope::for_operation(operation, &[payload]))
            .await?;
        decode_payload(operation, &body).inspect_err(|e| warn!(error = %e, "Undecodable response"))
    }

    /// Send one envelope and return the raw response body.
    ///
    /// Single attempt. Only 200 and 204 are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`SignerError::Transport`] if the exchange does not complete
    /// and [`SignerError::HttpStatus`] for any other status.
    pub async fn execute(&self, envelope: RequestEnvelope) -> SignerResult<Vec<u8>> {
        let url = target_url(&self.base_url, &envelope)?;
        let start = Instant::now();

        let request = match envelope.method {
            Method::Get => self.http.get(url),
            Method::Post => {
                let request = self.http.post(url);
                match envelope.body {
                    Some(RequestBody::Form(fields)) => request.form(&fields),
                    Some(RequestBody::Raw(raw)) => request
                        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                        .body(raw),
                    None => request,
                }
            }
        };

        debug!(resource = envelope.resource, "Dispatching signer request");

        let response = request
            .header(TOKEN_HEADER, self.token.clone())
            .send()
            .await
            .map_err(|e| {
                let err = SignerError::from(e);
                warn!(resource = envelope.resource, error = %err, "Signer transport failed");
                err
            })?;

        let status = response.status();
        let body = response.bytes().await?;

        if !ACCEPTED_STATUSES.contains(&status) {
            let err = SignerError::http_status(status.as_u16(), String::from_utf8_lossy(&body));
            warn!(resource = envelope.resource, status = status.as_u16(), "Signer rejected request");
            return Err(err);
        }

        debug!(
            resource = envelope.resource,
            status = status.as_u16(),
            elapsed = ?start.elapsed(),
            "Signer request completed"
        );

        Ok(body.to_vec())
    }
}

#[async_trait]
impl SignerProvider for SignerClient {
    type Error = SignerError;

    async fn encrypt(&self, plain_data: &[u8]) -> SignerResult<Vec<u8>> {
        Self::encrypt(self, plain_data).await
    }

    async fn decrypt(&self, encrypted_data: &[u8]) -> SignerResult<Vec<u8>> {
        Self::decrypt(self, encrypted_data).await
    }

    async fn sign(&self, data: &[u8]) -> SignerResult<Vec<u8>> {
        Self::sign(self, data).await
    }

    async fn check_sign(&self, data: &[u8], signature: &[u8]) -> SignerResult<bool> {
        Self::check_sign(self, data, signature).await
    }
}
