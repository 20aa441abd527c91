//! Shared test utilities for the remote signer client.
//!
//! This crate provides:
//! - Proptest generators for payloads, tokens and statuses
//! - A stub signing service for `wiremock`
//! - An in-memory mock [`signer_client::SignerProvider`]

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod mocks;

pub use fixtures::{StubSigningService, closed_port_url, form_fields};
pub use generators::*;
pub use mocks::MockSignerProvider;
