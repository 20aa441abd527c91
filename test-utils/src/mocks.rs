//! Mock implementations for testing.

use std::sync::Arc;

use async_trait::async_trait;
use signer_client::{Operation, SignerError, SignerProvider};
use tokio::sync::RwLock;

use crate::fixtures::FIXED_SIGNATURE;

/// In-memory [`SignerProvider`] for callers' unit tests.
///
/// Encryption is the identity, signing returns a fixed signature, and
/// every call is recorded. A status can be injected to make all calls
/// fail as if the service rejected them.
#[derive(Debug, Clone, Default)]
pub struct MockSignerProvider {
    calls: Arc<RwLock<Vec<Operation>>>,
    fail_with: Arc<RwLock<Option<u16>>>,
}

impl MockSignerProvider {
    /// Create a new mock provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail with `status`.
    pub async fn fail_with_status(&self, status: u16) {
        *self.fail_with.write().await = Some(status);
    }

    /// Operations called so far, in order.
    pub async fn calls(&self) -> Vec<Operation> {
        self.calls.read().await.clone()
    }

    async fn record(&self, operation: Operation) -> Result<(), SignerError> {
        self.calls.write().await.push(operation);
        match *self.fail_with.read().await {
            Some(status) => Err(SignerError::http_status(status, "injected failure")),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SignerProvider for MockSignerProvider {
    type Error = SignerError;

    async fn encrypt(&self, plain_data: &[u8]) -> Result<Vec<u8>, SignerError> {
        self.record(Operation::Encrypt).await?;
        Ok(plain_data.to_vec())
    }

    async fn decrypt(&self, encrypted_data: &[u8]) -> Result<Vec<u8>, SignerError> {
        self.record(Operation::Decrypt).await?;
        Ok(encrypted_data.to_vec())
    }

    async fn sign(&self, _data: &[u8]) -> Result<Vec<u8>, SignerError> {
        self.record(Operation::Sign).await?;
        Ok(FIXED_SIGNATURE.to_vec())
    }

    async fn check_sign(&self, _data: &[u8], signature: &[u8]) -> Result<bool, SignerError> {
        self.record(Operation::CheckSign).await?;
        Ok(signature == FIXED_SIGNATURE)
    }
}
