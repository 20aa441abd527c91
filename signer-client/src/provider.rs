//! Generic signer provider trait.

use async_trait::async_trait;

/// Cryptographic operations delegated to some provider.
///
/// Callers depend on this trait so a remote service, an in-memory double or
/// a local implementation can be swapped without touching their code.
#[async_trait]
pub trait SignerProvider: Send + Sync {
    /// Error returned by every operation.
    type Error: std::error::Error + Send + Sync;

    /// Encrypt `plain_data`.
    async fn encrypt(&self, plain_data: &[u8]) -> Result<Vec<u8>, Self::Error>;

    /// Decrypt `encrypted_data`.
    async fn decrypt(&self, encrypted_data: &[u8]) -> Result<Vec<u8>, Self::Error>;

    /// Produce a detached signature over `data`.
    async fn sign(&self, data: &[u8]) -> Result<Vec<u8>, Self::Error>;

    /// Verify `signature` over `data`.
    async fn check_sign(&self, data: &[u8], signature: &[u8]) -> Result<bool, Self::Error>;
}
