//! Signer error types using thiserror 2.0.
//!
//! Failures are split the way the remote exchange can fail: the transport
//! never completed, the service answered with an unaccepted status, or the
//! answer could not be decoded. Every variant is terminal to the call.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

use crate::operation::Operation;

/// Status value reported when no HTTP status could be read.
pub const STATUS_UNREADABLE: u16 = 0;

/// Transport-level failure category, as reported by the HTTP stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection could not be established (refused, DNS, TLS handshake)
    Connect,
    /// Connect or overall request timeout elapsed
    Timeout,
    /// Request could not be sent
    Request,
    /// Response body could not be read
    Body,
    /// Anything the HTTP stack does not classify further
    Other,
}

impl TransportErrorKind {
    fn of(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connect
        } else if err.is_body() || err.is_decode() {
            Self::Body
        } else if err.is_request() {
            Self::Request
        } else {
            Self::Other
        }
    }
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connect => "connect",
            Self::Timeout => "timeout",
            Self::Request => "request",
            Self::Body => "body",
            Self::Other => "other",
        })
    }
}

/// Signer-specific errors.
#[derive(Error, Debug)]
pub enum SignerError {
    /// The network exchange could not complete
    #[error("Transport error ({kind}{}): {message}", fmt_code(.code))]
    Transport {
        /// Failure category
        kind: TransportErrorKind,
        /// OS-level error code from the transport, when one was reported
        code: Option<i32>,
        /// Transport error message
        message: String,
    },

    /// The exchange completed with a status other than 200 or 204
    #[error("Unexpected HTTP status ({status}): {body}")]
    HttpStatus {
        /// Status code, or [`STATUS_UNREADABLE`]
        status: u16,
        /// Raw response body, lossily decoded as UTF-8
        body: String,
    },

    /// The response body was not valid base64
    #[error("Malformed base64 in {operation} response: {source}")]
    Decode {
        /// Operation whose response failed to decode
        operation: Operation,
        /// Underlying decode failure
        #[source]
        source: base64::DecodeError,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The blocking runtime could not be started
    #[error("Runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Result type for signer operations.
pub type SignerResult<T> = Result<T, SignerError>;

fn fmt_code(code: &Option<i32>) -> String {
    code.map(|c| format!(", code {c}")).unwrap_or_default()
}

impl SignerError {
    /// Check if error is retryable.
    ///
    /// The client itself never retries; this only informs callers that
    /// want to.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { kind, .. } => {
                matches!(kind, TransportErrorKind::Connect | TransportErrorKind::Timeout)
            }
            Self::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// HTTP status carried by the error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Create an HTTP status error.
    #[must_use]
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a decode error for the given operation.
    #[must_use]
    pub const fn decode(operation: Operation, source: base64::DecodeError) -> Self {
        Self::Decode { operation, source }
    }
}

impl From<reqwest::Error> for SignerError {
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        Self::Transport {
            kind: TransportErrorKind::of(&err),
            code: os_error_code(&err),
            message: chain_message(&err),
        }
    }
}

/// Joins the message of every level of the source chain with `": "`.
///
/// The top level alone only says the request failed; the cause (refused,
/// DNS lookup, TLS handshake) sits further down.
fn chain_message(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut current = err.source();
    while let Some(e) = current {
        let part = e.to_string();
        if !message.ends_with(&part) {
            message.push_str(": ");
            message.push_str(&part);
        }
        current = e.source();
    }
    message
}

/// Walks the source chain for the OS error the transport failed with.
fn os_error_code(err: &(dyn StdError + 'static)) -> Option<i32> {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            if let Some(code) = io.raw_os_error() {
                return Some(code);
            }
        }
        current = e.source();
    }
    None
}
