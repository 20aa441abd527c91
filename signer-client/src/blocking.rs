//! Blocking signer client.
//!
//! Each call parks the calling thread until the service answers, the
//! transport fails or a configured timeout elapses.
//!
//! Must not be used from within an async runtime: the calls block the
//! thread, and starting a runtime inside another one panics. Use
//! [`crate::SignerClient`] there instead.

use std::future::Future;

use tokio::runtime::{Builder, Runtime};

use crate::{
    client::SignerClient,
    config::SignerConfig,
    error::SignerResult,
};

/// Synchronous counterpart of [`SignerClient`].
#[derive(Debug)]
pub struct BlockingSignerClient {
    inner: SignerClient,
    runtime: Runtime,
}

impl BlockingSignerClient {
    /// Create a new blocking signer client.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SignerError::InvalidConfig`] for a bad configuration
    /// and [`crate::SignerError::Runtime`] if the runtime cannot start.
    pub fn new(config: SignerConfig) -> SignerResult<Self> {
        let inner = SignerClient::new(config)?;
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self { inner, runtime })
    }

    /// The async client this one drives.
    #[must_use]
    pub const fn inner(&self) -> &SignerClient {
        &self.inner
    }

    /// Encrypt `plain_data` server-side.
    ///
    /// # Errors
    ///
    /// See [`SignerClient::encrypt`].
    pub fn encrypt(&self, plain_data: &[u8]) -> SignerResult<Vec<u8>> {
        self.block_on(self.inner.encrypt(plain_data))
    }

    /// Decrypt `encrypted_data` server-side.
    ///
    /// # Errors
    ///
    /// See [`SignerClient::decrypt`].
    pub fn decrypt(&self, encrypted_data: &[u8]) -> SignerResult<Vec<u8>> {
        self.block_on(self.inner.decrypt(encrypted_data))
    }

    /// Sign `data` server-side.
    ///
    /// # Errors
    ///
    /// See [`SignerClient::sign`].
    pub fn sign(&self, data: &[u8]) -> SignerResult<Vec<u8>> {
        self.block_on(self.inner.sign(data))
    }

    /// Verify `signature` over `data` server-side.
    ///
    /// # Errors
    ///
    /// See [`SignerClient::check_sign`].
    pub fn check_sign(&self, data: &[u8], signature: &[u8]) -> SignerResult<bool> {
        self.block_on(self.inner.check_sign(data, signature))
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}
