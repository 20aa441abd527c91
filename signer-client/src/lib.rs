//! Client for a remote signing and encryption service.
//!
//! Encryption, decryption, signing and signature verification all happen
//! server-side. This crate only moves bytes: payloads go out base64 encoded
//! in a form body with an `X-Token` header, and answers come back as base64
//! bytes or a literal `true`/`false` verdict.
//!
//! ```no_run
//! use signer_client::{BlockingSignerClient, SignerConfig};
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), signer_client::SignerError> {
//! let config = SignerConfig::new("https://signer.internal", "token")
//!     .with_timeout(Duration::from_secs(10));
//! let client = BlockingSignerClient::new(config)?;
//!
//! let signature = client.sign(b"invoice #42")?;
//! assert!(client.check_sign(b"invoice #42", &signature)?);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod blocking;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod operation;
pub mod provider;
pub mod tracing_config;
pub mod transport;

pub use blocking::BlockingSignerClient;
pub use client::{SignerClient, TOKEN_HEADER};
pub use config::SignerConfig;
pub use envelope::{Method, RequestBody, RequestEnvelope};
pub use error::{SignerError, SignerResult, TransportErrorKind};
pub use operation::Operation;
pub use provider::SignerProvider;
pub use tracing_config::{TracingConfig, init_tracing};
pub use transport::TransportOptions;
